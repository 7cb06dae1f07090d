//! Wire-format framing: field keys, wire types, and field skip/capture.

use bytes::{Buf, Bytes};

use crate::error::DecodeErrorKind;
use crate::varint::{decode_varint, encode_varint, varint_len};

/// Minimum valid field number.
pub const MIN_FIELD_NUMBER: u32 = 1;
/// Maximum valid field number.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// How a field's body is framed on the wire.
///
/// Each field record starts with a key packing `(field_number, wire_type)`;
/// the wire type says how large the following payload is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    /// Variable length integer: `int32`, `int64`, `uint32`, `uint64`,
    /// `sint32`, `sint64`, `bool`, `enum`.
    Varint = 0,
    /// 64-bit little-endian: `fixed64`, `sfixed64`, `double`.
    I64 = 1,
    /// Length-prefixed: `string`, `bytes`, messages, maps, packed repeated.
    Len = 2,
    /// Group start (deprecated, rejected).
    SGroup = 3,
    /// Group end (deprecated, rejected).
    EGroup = 4,
    /// 32-bit little-endian: `fixed32`, `sfixed32`, `float`.
    I32 = 5,
}

impl WireType {
    fn from_raw(value: u8) -> Result<Self, DecodeErrorKind> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::I64),
            2 => Ok(WireType::Len),
            3 => Ok(WireType::SGroup),
            4 => Ok(WireType::EGroup),
            5 => Ok(WireType::I32),
            _ => Err(DecodeErrorKind::InvalidWireType { value }),
        }
    }

    pub const fn raw(self) -> u8 {
        self as u8
    }
}

/// A decoded field key: `(field_number << 3) | wire_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKey {
    wire_type: WireType,
    number: u32,
}

impl FieldKey {
    /// Build a key from its parts. `number` must be in
    /// [`MIN_FIELD_NUMBER`]`..=`[`MAX_FIELD_NUMBER`]; generated code only
    /// constructs keys for schema-validated numbers.
    pub fn new(wire_type: WireType, number: u32) -> Self {
        debug_assert!((MIN_FIELD_NUMBER..=MAX_FIELD_NUMBER).contains(&number));
        FieldKey { wire_type, number }
    }

    /// Validate a raw key value decoded from the wire.
    pub fn from_raw(raw: u64) -> Result<Self, DecodeErrorKind> {
        let wire_type = WireType::from_raw((raw & 0b111) as u8)?;
        let number = raw >> 3;
        if number < u64::from(MIN_FIELD_NUMBER) || number > u64::from(MAX_FIELD_NUMBER) {
            return Err(DecodeErrorKind::FieldNumberOutOfRange { value: number });
        }
        Ok(FieldKey {
            wire_type,
            number: number as u32,
        })
    }

    pub const fn wire_type(self) -> WireType {
        self.wire_type
    }

    pub const fn number(self) -> u32 {
        self.number
    }

    pub const fn raw(self) -> u32 {
        (self.number << 3) | self.wire_type.raw() as u32
    }

    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        Self::from_raw(decode_varint(buf)?)
    }

    pub fn encode<B: bytes::BufMut>(self, buf: &mut B) {
        encode_varint(u64::from(self.raw()), buf);
    }

    pub fn encoded_len(self) -> usize {
        varint_len(u64::from(self.raw()))
    }
}

/// Decode the length prefix of a length-delimited field.
pub fn decode_len<B: Buf>(buf: &mut B) -> Result<usize, DecodeErrorKind> {
    let len = decode_varint(buf)?;
    usize::try_from(len).map_err(|_| DecodeErrorKind::LengthOverflow { value: len })
}

/// Advance past one field value based on its wire type.
pub fn skip_field<B: Buf>(wire_type: WireType, buf: &mut B) -> Result<(), DecodeErrorKind> {
    let skip_len = match wire_type {
        WireType::Varint => {
            decode_varint(buf)?;
            return Ok(());
        }
        WireType::I64 => 8,
        WireType::Len => decode_len(buf)?,
        WireType::I32 => 4,
        WireType::SGroup | WireType::EGroup => {
            return Err(DecodeErrorKind::DeprecatedGroupEncoding);
        }
    };

    if buf.remaining() < skip_len {
        return Err(DecodeErrorKind::UnexpectedEndOfBuffer);
    }
    buf.advance(skip_len);
    Ok(())
}

/// Skip one field value and return the skipped bytes verbatim, length prefix
/// included for `Len` fields. Used for unknown-field retention.
pub fn capture_field(wire_type: WireType, buf: &mut &[u8]) -> Result<Bytes, DecodeErrorKind> {
    let before = *buf;
    skip_field(wire_type, buf)?;
    let consumed = before.len() - buf.len();
    Ok(Bytes::copy_from_slice(&before[..consumed]))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn proptest_key_roundtrips() {
        fn arb_wire_type() -> impl Strategy<Value = WireType> {
            (0..=5u8).prop_map(|raw| WireType::from_raw(raw).expect("known valid"))
        }

        let strat = (MIN_FIELD_NUMBER..=MAX_FIELD_NUMBER, arb_wire_type());
        proptest!(|((number, wire_type) in strat)| {
            let mut buf = Vec::new();
            FieldKey::new(wire_type, number).encode(&mut buf);
            prop_assert_eq!(buf.len(), FieldKey::new(wire_type, number).encoded_len());

            let key = FieldKey::decode(&mut &buf[..]).unwrap();
            prop_assert_eq!(key.number(), number);
            prop_assert_eq!(key.wire_type(), wire_type);
        });
    }

    #[test]
    fn test_zero_field_number_rejected() {
        // Wire type alone, field number zero.
        assert_eq!(
            FieldKey::from_raw(0b000),
            Err(DecodeErrorKind::FieldNumberOutOfRange { value: 0 })
        );
    }

    #[test]
    fn test_invalid_wire_type_rejected() {
        assert_eq!(
            FieldKey::from_raw((1 << 3) | 6),
            Err(DecodeErrorKind::InvalidWireType { value: 6 })
        );
        assert_eq!(
            FieldKey::from_raw((1 << 3) | 7),
            Err(DecodeErrorKind::InvalidWireType { value: 7 })
        );
    }

    #[test]
    fn test_skip_field() {
        let mut buf: &[u8] = &[0xAC, 0x02, 99];
        skip_field(WireType::Varint, &mut buf).unwrap();
        assert_eq!(buf, &[99]);

        let mut buf: &[u8] = &[1, 2, 3, 4, 99];
        skip_field(WireType::I32, &mut buf).unwrap();
        assert_eq!(buf, &[99]);

        let mut buf: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8, 99];
        skip_field(WireType::I64, &mut buf).unwrap();
        assert_eq!(buf, &[99]);

        let mut buf: &[u8] = &[3, 1, 2, 3, 99];
        skip_field(WireType::Len, &mut buf).unwrap();
        assert_eq!(buf, &[99]);
    }

    #[test]
    fn test_skip_truncated_len_field() {
        let mut buf: &[u8] = &[5, 1, 2];
        assert_eq!(
            skip_field(WireType::Len, &mut buf),
            Err(DecodeErrorKind::UnexpectedEndOfBuffer)
        );
    }

    #[test]
    fn test_skip_groups_rejected() {
        let mut buf: &[u8] = &[0];
        assert_eq!(
            skip_field(WireType::SGroup, &mut buf),
            Err(DecodeErrorKind::DeprecatedGroupEncoding)
        );
        assert_eq!(
            skip_field(WireType::EGroup, &mut buf),
            Err(DecodeErrorKind::DeprecatedGroupEncoding)
        );
    }

    #[test]
    fn test_capture_field_keeps_bytes_verbatim() {
        // Len field: length prefix stays part of the captured bytes.
        let mut buf: &[u8] = &[3, 1, 2, 3, 99];
        let captured = capture_field(WireType::Len, &mut buf).unwrap();
        assert_eq!(&captured[..], &[3, 1, 2, 3]);
        assert_eq!(buf, &[99]);

        // Non-canonical varint survives capture untouched.
        let mut buf: &[u8] = &[0x80, 0x00, 99];
        let captured = capture_field(WireType::Varint, &mut buf).unwrap();
        assert_eq!(&captured[..], &[0x80, 0x00]);
        assert_eq!(buf, &[99]);
    }
}
