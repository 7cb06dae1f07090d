//! Map fields: the two-field synthetic entry message.
//!
//! A map field is wire-equivalent to a repeated message with exactly two
//! fields, `1: key` and `2: value`. Generated code supplies the key and
//! value codecs as closures so that message-valued maps can thread
//! [`DecodeOptions`] into the nested parse; this is the runtime indirection
//! the schema compiler wires up per field.

use bytes::BufMut;

use crate::error::{DecodeError, DecodeErrorKind};
use crate::message::DecodeOptions;
use crate::varint::{encode_varint, varint_len};
use crate::wire::{self, FieldKey, WireType};

/// Decode one `Len`-framed map entry.
///
/// Only field numbers 1 and 2 are honored; anything else inside the entry is
/// silently skipped. A missing key or value decodes as the type's default.
pub fn decode_entry<K, V>(
    buf: &mut &[u8],
    options: DecodeOptions,
    key_wire: WireType,
    value_wire: WireType,
    decode_key: impl Fn(&mut &[u8]) -> Result<K, DecodeError>,
    decode_value: impl Fn(&mut &[u8], DecodeOptions) -> Result<V, DecodeError>,
) -> Result<(K, V), DecodeError>
where
    K: Default,
    V: Default,
{
    let len = wire::decode_len(buf)?;
    if buf.len() < len {
        return Err(DecodeErrorKind::UnexpectedEndOfBuffer.into());
    }
    let data = *buf;
    let (mut entry, rest) = data.split_at(len);
    *buf = rest;

    let mut key = K::default();
    let mut value = V::default();
    while !entry.is_empty() {
        let field_key = FieldKey::decode(&mut entry)?;
        match field_key.number() {
            1 => {
                if field_key.wire_type() != key_wire {
                    return Err(DecodeErrorKind::WireTypeMismatch {
                        expected: key_wire,
                        actual: field_key.wire_type(),
                    }
                    .into());
                }
                key = decode_key(&mut entry)?;
            }
            2 => {
                if field_key.wire_type() != value_wire {
                    return Err(DecodeErrorKind::WireTypeMismatch {
                        expected: value_wire,
                        actual: field_key.wire_type(),
                    }
                    .into());
                }
                value = decode_value(&mut entry, options)?;
            }
            _ => wire::skip_field(field_key.wire_type(), &mut entry)?,
        }
    }
    Ok((key, value))
}

/// Encode one map entry with its outer field key.
///
/// Both key and value are always written, even at their defaults.
pub fn encode_entry<B: BufMut>(
    number: u32,
    buf: &mut B,
    key_wire: WireType,
    value_wire: WireType,
    key_len: usize,
    value_len: usize,
    encode_key: impl FnOnce(&mut B),
    encode_value: impl FnOnce(&mut B),
) {
    FieldKey::new(WireType::Len, number).encode(buf);

    let key_tag = FieldKey::new(key_wire, 1);
    let value_tag = FieldKey::new(value_wire, 2);
    let body = key_tag.encoded_len() + key_len + value_tag.encoded_len() + value_len;
    encode_varint(body as u64, buf);

    key_tag.encode(buf);
    encode_key(buf);
    value_tag.encode(buf);
    encode_value(buf);
}

/// Encoded length of one entry, outer field key included.
pub fn entry_len(
    number: u32,
    key_wire: WireType,
    value_wire: WireType,
    key_len: usize,
    value_len: usize,
) -> usize {
    let body = FieldKey::new(key_wire, 1).encoded_len()
        + key_len
        + FieldKey::new(value_wire, 2).encoded_len()
        + value_len;
    FieldKey::new(WireType::Len, number).encoded_len() + varint_len(body as u64) + body
}
