//! The message engine: decode options, the [`Message`] trait, and the
//! helpers generated parse loops dispatch into.

use bytes::BufMut;

use crate::error::{DecodeError, DecodeErrorKind};
use crate::unknown::UnknownFields;
use crate::value::Value;
use crate::varint::{encode_varint, varint_len};
use crate::wire::{self, FieldKey, WireType};

/// Flags controlling parse behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Preserve unrecognized fields for lossless round-tripping.
    pub retain_unknown_fields: bool,
    /// Demote wire-type mismatches on known fields to unknown-field handling
    /// instead of failing the parse.
    pub ignore_incorrect_types: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            retain_unknown_fields: true,
            ignore_incorrect_types: false,
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn retain_unknown_fields(mut self, retain: bool) -> Self {
        self.retain_unknown_fields = retain;
        self
    }

    #[must_use]
    pub fn ignore_incorrect_types(mut self, ignore: bool) -> Self {
        self.ignore_incorrect_types = ignore;
        self
    }
}

/// A generated protobuf message.
///
/// Generated code implements [`merge_from_slice`](Message::merge_from_slice),
/// [`encode`](Message::encode), [`encoded_len`](Message::encoded_len), the
/// unknown-field accessors, and [`to_value`](Message::to_value); everything
/// else is derived from those.
///
/// Serialization is infallible: slots are typed and oneofs are tagged enums,
/// so there is no value/type mismatch left to detect at encode time.
pub trait Message: Default + Clone {
    /// Parse `data` into this message, merging with existing state: singular
    /// fields overwrite (last wins), repeated and map fields accumulate.
    ///
    /// On failure the message may hold partially-merged state; callers that
    /// need all-or-nothing semantics parse into a fresh instance via
    /// [`decode`](Message::decode), which discards the partial result.
    fn merge_from_slice(&mut self, data: &[u8], options: DecodeOptions) -> Result<(), DecodeError>;

    /// Encode the message body (no length prefix).
    fn encode<B: BufMut>(&self, buf: &mut B);

    /// Encoded length of the message body.
    fn encoded_len(&self) -> usize;

    fn unknown_fields(&self) -> &UnknownFields;

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields;

    /// Project the message into a generic [`Value`] tree: one entry per
    /// field group, sub-messages recursing through their own `to_value`.
    fn to_value(&self) -> Value;

    /// Parse a fresh message from `data`.
    fn decode(data: &[u8], options: DecodeOptions) -> Result<Self, DecodeError> {
        let mut message = Self::default();
        message.merge_from_slice(data, options)?;
        Ok(message)
    }

    /// Encode into a fresh byte vector.
    fn to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf
    }

    fn has_unknown_fields(&self) -> bool {
        !self.unknown_fields().is_empty()
    }

    fn clear_unknown_fields(&mut self) {
        self.unknown_fields_mut().clear();
    }
}

// Recursive submessage slots are boxed by the generator; the box delegates
// so boxed and unboxed fields share the encode/length helpers.
impl<M: Message> Message for Box<M> {
    fn merge_from_slice(&mut self, data: &[u8], options: DecodeOptions) -> Result<(), DecodeError> {
        (**self).merge_from_slice(data, options)
    }

    fn encode<B: BufMut>(&self, buf: &mut B) {
        (**self).encode(buf)
    }

    fn encoded_len(&self) -> usize {
        (**self).encoded_len()
    }

    fn unknown_fields(&self) -> &UnknownFields {
        (**self).unknown_fields()
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        (**self).unknown_fields_mut()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

/// Decode a length-prefixed submessage field into a fresh message.
pub fn decode_message_field<M: Message>(
    buf: &mut &[u8],
    options: DecodeOptions,
) -> Result<M, DecodeError> {
    let mut message = M::default();
    merge_message_field(&mut message, buf, options)?;
    Ok(message)
}

/// Decode a length-prefixed submessage field, merging into `message`.
pub fn merge_message_field<M: Message>(
    message: &mut M,
    buf: &mut &[u8],
    options: DecodeOptions,
) -> Result<(), DecodeError> {
    let len = wire::decode_len(buf)?;
    if buf.len() < len {
        return Err(DecodeErrorKind::UnexpectedEndOfBuffer.into());
    }
    let data = *buf;
    let (chunk, rest) = data.split_at(len);
    *buf = rest;
    message.merge_from_slice(chunk, options)
}

/// Encode a message as a length-prefixed field body.
pub fn encode_message_field<M: Message, B: BufMut>(message: &M, buf: &mut B) {
    let len = message.encoded_len();
    encode_varint(len as u64, buf);
    message.encode(buf);
}

/// Encoded length of a message as a length-prefixed field body.
pub fn message_field_len<M: Message>(message: &M) -> usize {
    let len = message.encoded_len();
    varint_len(len as u64) + len
}

/// Handle a field number that is not part of the schema: skip its value,
/// retaining the raw bytes when the options ask for it.
pub fn unknown_field(
    unknown: &mut UnknownFields,
    key: FieldKey,
    buf: &mut &[u8],
    options: DecodeOptions,
) -> Result<(), DecodeErrorKind> {
    if options.retain_unknown_fields {
        unknown.capture(key, buf)
    } else {
        wire::skip_field(key.wire_type(), buf)
    }
}

/// Handle a known field whose received wire type does not match the schema:
/// fatal by default, demoted to unknown-field handling by
/// [`DecodeOptions::ignore_incorrect_types`].
pub fn mismatched_field(
    unknown: &mut UnknownFields,
    key: FieldKey,
    expected: WireType,
    buf: &mut &[u8],
    options: DecodeOptions,
) -> Result<(), DecodeErrorKind> {
    if options.ignore_incorrect_types {
        unknown_field(unknown, key, buf, options)
    } else {
        Err(DecodeErrorKind::WireTypeMismatch {
            expected,
            actual: key.wire_type(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = DecodeOptions::default();
        assert!(options.retain_unknown_fields);
        assert!(!options.ignore_incorrect_types);
    }

    #[test]
    fn test_unknown_field_paths() {
        let data = [0x05, 99];
        let key = FieldKey::new(WireType::Varint, 9);

        let mut unknown = UnknownFields::new();
        let mut buf = &data[..];
        unknown_field(&mut unknown, key, &mut buf, DecodeOptions::default()).unwrap();
        assert_eq!(buf, &[99]);
        assert_eq!(unknown.len(), 1);

        let mut unknown = UnknownFields::new();
        let mut buf = &data[..];
        let options = DecodeOptions::default().retain_unknown_fields(false);
        unknown_field(&mut unknown, key, &mut buf, options).unwrap();
        assert_eq!(buf, &[99]);
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_mismatched_field_paths() {
        let data = [0x05, 99];
        let key = FieldKey::new(WireType::Varint, 3);

        // Fatal by default.
        let mut unknown = UnknownFields::new();
        let mut buf = &data[..];
        let result = mismatched_field(
            &mut unknown,
            key,
            WireType::Len,
            &mut buf,
            DecodeOptions::default(),
        );
        assert_eq!(
            result,
            Err(DecodeErrorKind::WireTypeMismatch {
                expected: WireType::Len,
                actual: WireType::Varint,
            })
        );

        // Demoted to unknown retention with the flag set.
        let mut unknown = UnknownFields::new();
        let mut buf = &data[..];
        let options = DecodeOptions::default().ignore_incorrect_types(true);
        mismatched_field(&mut unknown, key, WireType::Len, &mut buf, options).unwrap();
        assert_eq!(buf, &[99]);
        assert_eq!(unknown.len(), 1);
    }
}
