//! Repeated-field framing: packed and unpacked forms.
//!
//! Packable element types (everything but string/bytes/message/map) are
//! serialized packed: one `Len` record holding the concatenated element
//! bodies. On decode both forms are tolerated regardless of how the field
//! was written, and chunks appearing multiple times accumulate.

use bytes::BufMut;

use crate::codec::Scalar;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::varint::{encode_varint, varint_len};
use crate::wire::{self, FieldKey, WireType};

/// Decode one packed chunk, appending every element in it to `out`.
///
/// Element failures carry an `(Index:i)` frame counting from the start of
/// the list, not the chunk.
pub fn decode_packed<T: Scalar>(buf: &mut &[u8], out: &mut Vec<T>) -> Result<(), DecodeError> {
    let len = wire::decode_len(buf)?;
    if buf.len() < len {
        return Err(DecodeErrorKind::UnexpectedEndOfBuffer.into());
    }
    let data = *buf;
    let (mut chunk, rest) = data.split_at(len);
    *buf = rest;

    while !chunk.is_empty() {
        let index = out.len();
        let value =
            T::decode_value(&mut chunk).map_err(|e| DecodeError::from(e).at_index(index))?;
        out.push(value);
    }
    Ok(())
}

/// Decode one unpacked element and append it to `out`.
pub fn decode_unpacked<T: Scalar>(buf: &mut &[u8], out: &mut Vec<T>) -> Result<(), DecodeError> {
    let index = out.len();
    let value = T::decode_value(buf).map_err(|e| DecodeError::from(e).at_index(index))?;
    out.push(value);
    Ok(())
}

/// Encode a packable repeated field in packed form. Empty lists emit
/// nothing.
pub fn encode_packed<T: Scalar, B: BufMut>(number: u32, values: &[T], buf: &mut B) {
    if values.is_empty() {
        return;
    }
    FieldKey::new(WireType::Len, number).encode(buf);
    let body: usize = values.iter().map(Scalar::encoded_len).sum();
    encode_varint(body as u64, buf);
    for value in values {
        value.encode_value(buf);
    }
}

pub fn packed_len<T: Scalar>(number: u32, values: &[T]) -> usize {
    if values.is_empty() {
        return 0;
    }
    let body: usize = values.iter().map(Scalar::encoded_len).sum();
    FieldKey::new(WireType::Len, number).encoded_len() + varint_len(body as u64) + body
}

/// Encode a `Len`-typed repeated field (string/bytes), one tagged record per
/// element.
pub fn encode_unpacked<T: Scalar, B: BufMut>(number: u32, values: &[T], buf: &mut B) {
    let key = FieldKey::new(T::WIRE_TYPE, number);
    for value in values {
        key.encode(buf);
        value.encode_value(buf);
    }
}

pub fn unpacked_len<T: Scalar>(number: u32, values: &[T]) -> usize {
    let key_len = FieldKey::new(T::WIRE_TYPE, number).encoded_len();
    values.iter().map(|value| key_len + value.encoded_len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_roundtrip() {
        let values: Vec<u64> = vec![1, 2, 300];
        let mut buf = Vec::new();
        encode_packed(3, &values, &mut buf);
        assert_eq!(buf, [0x1A, 0x04, 0x01, 0x02, 0xAC, 0x02]);
        assert_eq!(buf.len(), packed_len(3, &values));

        let mut decoded: Vec<u64> = Vec::new();
        let mut slice = &buf[..];
        let key = FieldKey::decode(&mut slice).unwrap();
        assert_eq!(key.wire_type(), WireType::Len);
        decode_packed(&mut slice, &mut decoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_packed_empty_emits_nothing() {
        let values: Vec<u64> = Vec::new();
        let mut buf = Vec::new();
        encode_packed(3, &values, &mut buf);
        assert!(buf.is_empty());
        assert_eq!(packed_len(3, &values), 0);
    }

    #[test]
    fn test_packed_chunks_accumulate() {
        let mut out: Vec<u32> = Vec::new();

        let chunk_a = [0x02, 0x01, 0x02];
        let mut slice = &chunk_a[..];
        decode_packed(&mut slice, &mut out).unwrap();

        let chunk_b = [0x01, 0x03];
        let mut slice = &chunk_b[..];
        decode_packed(&mut slice, &mut out).unwrap();

        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn test_unpacked_append() {
        let mut out: Vec<u64> = Vec::new();
        let data = [0xAC, 0x02];
        let mut slice = &data[..];
        decode_unpacked(&mut slice, &mut out).unwrap();
        let data = [0x05];
        let mut slice = &data[..];
        decode_unpacked(&mut slice, &mut out).unwrap();
        assert_eq!(out, [300, 5]);
    }

    #[test]
    fn test_unpacked_strings() {
        let values = vec![String::from("a"), String::from("bc")];
        let mut buf = Vec::new();
        encode_unpacked(2, &values, &mut buf);
        assert_eq!(buf, [0x12, 0x01, b'a', 0x12, 0x02, b'b', b'c']);
        assert_eq!(buf.len(), unpacked_len(2, &values));
    }

    #[test]
    fn test_packed_element_error_carries_index() {
        // Chunk of two fixed32 values, second one truncated.
        let data = [0x06, 1, 0, 0, 0, 2, 0];
        let mut slice = &data[..];
        let mut out: Vec<crate::codec::Fixed32> = Vec::new();
        let error = decode_packed(&mut slice, &mut out).unwrap_err();
        assert_eq!(error.to_string(), "(Index:1) unexpected end of buffer");
    }

    #[test]
    fn test_packed_length_beyond_input() {
        let data = [0x05, 1, 2];
        let mut slice = &data[..];
        let mut out: Vec<u32> = Vec::new();
        let error = decode_packed(&mut slice, &mut out).unwrap_err();
        assert_eq!(error.kind(), DecodeErrorKind::UnexpectedEndOfBuffer);
    }
}
