//! Per-type value codecs for the proto3 data types.
//!
//! One [`Scalar`] implementation exists per data type. Each knows its wire
//! type, how to decode one value from the front of a buffer, and how to
//! encode one value (field key excluded). Types whose encoding differs from
//! the host representation get a wrapper newtype ([`Sint32`], [`Fixed64`],
//! ...); the rest implement [`Scalar`] directly on the primitive.
//!
//! Generated enums also implement [`Scalar`]; message and map fields go
//! through [`crate::message`] and [`crate::map`] instead because they need
//! [`DecodeOptions`](crate::message::DecodeOptions) threaded through.

use bytes::{Buf, BufMut, Bytes};

use crate::error::DecodeErrorKind;
use crate::varint::{
    decode_varint, encode_varint, varint_len, zigzag_decode_32, zigzag_decode_64,
    zigzag_encode_32, zigzag_encode_64,
};
use crate::wire::WireType;

/// A single wire value of one proto3 data type.
pub trait Scalar: Sized {
    /// The wire type this data type is framed with.
    const WIRE_TYPE: WireType;

    /// Decode one value from the front of `buf`.
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind>;

    /// Encode one value, without its field key.
    fn encode_value<B: BufMut>(&self, buf: &mut B);

    /// Encoded length of the value body.
    fn encoded_len(&self) -> usize;
}

/// Default-value detection for serialize-time omission.
///
/// Cheaper than comparing against `Default::default()` for allocating types.
/// Message and map slots have no implementation: the serializer elides an
/// all-default submessage by checking whether its encoded body is empty, and
/// maps by emptiness.
pub trait IsDefault {
    fn is_default(&self) -> bool;
}

// uint64: plain varint.
impl Scalar for u64 {
    const WIRE_TYPE: WireType = WireType::Varint;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        decode_varint(buf)
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        encode_varint(*self, buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        varint_len(*self)
    }
}

// uint32: varint, values above u32::MAX are a range error.
impl Scalar for u32 {
    const WIRE_TYPE: WireType = WireType::Varint;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        let raw = decode_varint(buf)?;
        u32::try_from(raw).map_err(|_| DecodeErrorKind::IntegerOverflow { target_type: "u32" })
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        encode_varint(u64::from(*self), buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        varint_len(u64::from(*self))
    }
}

// int64: the varint is the two's-complement reinterpretation.
impl Scalar for i64 {
    const WIRE_TYPE: WireType = WireType::Varint;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        Ok(decode_varint(buf)? as i64)
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        encode_varint(*self as u64, buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        varint_len(*self as u64)
    }
}

// int32: decoded by truncating the 64-bit varint; negative values encode in
// the 64-bit sign-extended form (10 bytes), matching canonical behavior.
impl Scalar for i32 {
    const WIRE_TYPE: WireType = WireType::Varint;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        Ok(decode_varint(buf)? as i32)
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        encode_varint(*self as i64 as u64, buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        varint_len(*self as i64 as u64)
    }
}

impl Scalar for bool {
    const WIRE_TYPE: WireType = WireType::Varint;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        Ok(decode_varint(buf)? != 0)
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(u8::from(*self));
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        1
    }
}

impl Scalar for f32 {
    const WIRE_TYPE: WireType = WireType::I32;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        if buf.remaining() < 4 {
            return Err(DecodeErrorKind::UnexpectedEndOfBuffer);
        }
        Ok(buf.get_f32_le())
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        buf.put_f32_le(*self);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        4
    }
}

impl Scalar for f64 {
    const WIRE_TYPE: WireType = WireType::I64;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        if buf.remaining() < 8 {
            return Err(DecodeErrorKind::UnexpectedEndOfBuffer);
        }
        Ok(buf.get_f64_le())
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        buf.put_f64_le(*self);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        8
    }
}

macro_rules! wrapper_type {
    ($(#[$doc:meta])* $name:ident($inner:ty)) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(pub $inner);

        impl core::ops::Deref for $name {
            type Target = $inner;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                $name(value)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

wrapper_type! {
    /// Wrapper for proto3 `sint32` (zigzag-encoded signed 32-bit integer).
    Sint32(i32)
}

impl Scalar for Sint32 {
    const WIRE_TYPE: WireType = WireType::Varint;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        let raw = decode_varint(buf)?;
        let raw = u32::try_from(raw)
            .map_err(|_| DecodeErrorKind::IntegerOverflow { target_type: "u32" })?;
        Ok(Sint32(zigzag_decode_32(raw)))
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        encode_varint(u64::from(zigzag_encode_32(self.0)), buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        varint_len(u64::from(zigzag_encode_32(self.0)))
    }
}

wrapper_type! {
    /// Wrapper for proto3 `sint64` (zigzag-encoded signed 64-bit integer).
    Sint64(i64)
}

impl Scalar for Sint64 {
    const WIRE_TYPE: WireType = WireType::Varint;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        Ok(Sint64(zigzag_decode_64(decode_varint(buf)?)))
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        encode_varint(zigzag_encode_64(self.0), buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        varint_len(zigzag_encode_64(self.0))
    }
}

wrapper_type! {
    /// Wrapper for proto3 `fixed32` (little-endian unsigned 32-bit integer).
    Fixed32(u32)
}

impl Scalar for Fixed32 {
    const WIRE_TYPE: WireType = WireType::I32;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        if buf.remaining() < 4 {
            return Err(DecodeErrorKind::UnexpectedEndOfBuffer);
        }
        Ok(Fixed32(buf.get_u32_le()))
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.0);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        4
    }
}

wrapper_type! {
    /// Wrapper for proto3 `fixed64` (little-endian unsigned 64-bit integer).
    Fixed64(u64)
}

impl Scalar for Fixed64 {
    const WIRE_TYPE: WireType = WireType::I64;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        if buf.remaining() < 8 {
            return Err(DecodeErrorKind::UnexpectedEndOfBuffer);
        }
        Ok(Fixed64(buf.get_u64_le()))
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        buf.put_u64_le(self.0);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        8
    }
}

wrapper_type! {
    /// Wrapper for proto3 `sfixed32` (little-endian signed 32-bit integer).
    Sfixed32(i32)
}

impl Scalar for Sfixed32 {
    const WIRE_TYPE: WireType = WireType::I32;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        if buf.remaining() < 4 {
            return Err(DecodeErrorKind::UnexpectedEndOfBuffer);
        }
        Ok(Sfixed32(buf.get_i32_le()))
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        buf.put_i32_le(self.0);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        4
    }
}

wrapper_type! {
    /// Wrapper for proto3 `sfixed64` (little-endian signed 64-bit integer).
    Sfixed64(i64)
}

impl Scalar for Sfixed64 {
    const WIRE_TYPE: WireType = WireType::I64;

    #[inline]
    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        if buf.remaining() < 8 {
            return Err(DecodeErrorKind::UnexpectedEndOfBuffer);
        }
        Ok(Sfixed64(buf.get_i64_le()))
    }

    #[inline]
    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        buf.put_i64_le(self.0);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        8
    }
}

// string: length-prefixed UTF-8. Validity is checked here because a Rust
// `String` cannot carry invalid bytes.
impl Scalar for String {
    const WIRE_TYPE: WireType = WireType::Len;

    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        let len = crate::wire::decode_len(buf)?;
        if buf.remaining() < len {
            return Err(DecodeErrorKind::UnexpectedEndOfBuffer);
        }
        let mut data = vec![0u8; len];
        buf.copy_to_slice(&mut data);
        String::from_utf8(data).map_err(|_| DecodeErrorKind::InvalidUtf8)
    }

    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        encode_varint(self.len() as u64, buf);
        buf.put_slice(self.as_bytes());
    }

    fn encoded_len(&self) -> usize {
        varint_len(self.len() as u64) + self.len()
    }
}

impl Scalar for Bytes {
    const WIRE_TYPE: WireType = WireType::Len;

    fn decode_value<B: Buf>(buf: &mut B) -> Result<Self, DecodeErrorKind> {
        let len = crate::wire::decode_len(buf)?;
        if buf.remaining() < len {
            return Err(DecodeErrorKind::UnexpectedEndOfBuffer);
        }
        Ok(buf.copy_to_bytes(len))
    }

    fn encode_value<B: BufMut>(&self, buf: &mut B) {
        encode_varint(self.len() as u64, buf);
        buf.put_slice(self);
    }

    fn encoded_len(&self) -> usize {
        varint_len(self.len() as u64) + self.len()
    }
}

macro_rules! is_default_zero {
    ($($ty:ty),*) => {
        $(
            impl IsDefault for $ty {
                #[inline(always)]
                fn is_default(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

is_default_zero!(u32, u64, i32, i64);

impl IsDefault for bool {
    #[inline(always)]
    fn is_default(&self) -> bool {
        !*self
    }
}

impl IsDefault for f32 {
    #[inline(always)]
    fn is_default(&self) -> bool {
        *self == 0.0
    }
}

impl IsDefault for f64 {
    #[inline(always)]
    fn is_default(&self) -> bool {
        *self == 0.0
    }
}

macro_rules! is_default_inner_zero {
    ($($ty:ty),*) => {
        $(
            impl IsDefault for $ty {
                #[inline(always)]
                fn is_default(&self) -> bool {
                    self.0 == 0
                }
            }
        )*
    };
}

is_default_inner_zero!(Sint32, Sint64, Fixed32, Fixed64, Sfixed32, Sfixed64);

impl IsDefault for String {
    #[inline(always)]
    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

impl IsDefault for Bytes {
    #[inline(always)]
    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Scalar + PartialEq + std::fmt::Debug>(value: T) {
        let mut buf = Vec::new();
        value.encode_value(&mut buf);
        assert_eq!(buf.len(), value.encoded_len());
        let decoded = T::decode_value(&mut &buf[..]).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_varint_roundtrip() {
        roundtrip(0u32);
        roundtrip(127u32);
        roundtrip(128u32);
        roundtrip(u32::MAX);

        roundtrip(0u64);
        roundtrip(u64::MAX);

        roundtrip(0i32);
        roundtrip(-1i32);
        roundtrip(i32::MIN);
        roundtrip(i32::MAX);

        roundtrip(0i64);
        roundtrip(-1i64);
        roundtrip(i64::MIN);
        roundtrip(i64::MAX);

        roundtrip(true);
        roundtrip(false);
    }

    #[test]
    fn test_negative_int32_encodes_sign_extended() {
        let mut buf = Vec::new();
        (-1i32).encode_value(&mut buf);
        assert_eq!(buf.len(), 10);
        assert_eq!(
            buf,
            [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
        );
        assert_eq!(i32::decode_value(&mut &buf[..]).unwrap(), -1);
    }

    #[test]
    fn test_uint32_range_rejected() {
        let mut buf = Vec::new();
        encode_varint(u64::from(u32::MAX) + 1, &mut buf);
        assert_eq!(
            u32::decode_value(&mut &buf[..]),
            Err(DecodeErrorKind::IntegerOverflow { target_type: "u32" })
        );
    }

    #[test]
    fn test_zigzag_roundtrip() {
        roundtrip(Sint32(0));
        roundtrip(Sint32(-1));
        roundtrip(Sint32(i32::MIN));
        roundtrip(Sint32(i32::MAX));

        roundtrip(Sint64(0));
        roundtrip(Sint64(-1));
        roundtrip(Sint64(i64::MIN));
        roundtrip(Sint64(i64::MAX));

        // Small magnitudes stay short.
        let mut buf = Vec::new();
        Sint32(-1).encode_value(&mut buf);
        assert_eq!(buf, [0x01]);
    }

    #[test]
    fn test_fixed_roundtrip() {
        roundtrip(Fixed32(0));
        roundtrip(Fixed32(u32::MAX));
        roundtrip(Fixed64(u64::MAX));
        roundtrip(Sfixed32(i32::MIN));
        roundtrip(Sfixed64(i64::MIN));

        // Little-endian layout on the wire.
        let mut buf = Vec::new();
        Fixed32(0x01020304).encode_value(&mut buf);
        assert_eq!(buf, [0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_float_roundtrip() {
        roundtrip(0.0f32);
        roundtrip(-1.5f32);
        roundtrip(f32::MAX);
        roundtrip(0.0f64);
        roundtrip(-1.5f64);
        roundtrip(f64::MAX);

        let mut buf = Vec::new();
        1.5f32.encode_value(&mut buf);
        assert_eq!(buf, [0x00, 0x00, 0xC0, 0x3F]);
    }

    #[test]
    fn test_string_roundtrip() {
        roundtrip(String::new());
        roundtrip(String::from("hi"));
        roundtrip(String::from("hello world! \u{1F389}"));
    }

    #[test]
    fn test_string_invalid_utf8() {
        let data = [0x02, 0xFF, 0xFE];
        assert_eq!(
            String::decode_value(&mut &data[..]),
            Err(DecodeErrorKind::InvalidUtf8)
        );
    }

    #[test]
    fn test_bytes_roundtrip() {
        roundtrip(Bytes::new());
        roundtrip(Bytes::from_static(&[0, 1, 2, 255]));
    }

    #[test]
    fn test_truncated_fixed_fails() {
        let data = [1, 2, 3];
        assert_eq!(
            Fixed32::decode_value(&mut &data[..]),
            Err(DecodeErrorKind::UnexpectedEndOfBuffer)
        );
        assert_eq!(
            f64::decode_value(&mut &data[..]),
            Err(DecodeErrorKind::UnexpectedEndOfBuffer)
        );
    }

    #[test]
    fn test_is_default() {
        assert!(0i32.is_default());
        assert!(!1i32.is_default());
        assert!((-0.0f64).is_default()); // -0.0 == 0.0
        assert!(String::new().is_default());
        assert!(!String::from("x").is_default());
        assert!(Bytes::new().is_default());
        assert!(Sint64(0).is_default());
        assert!(!Fixed32(7).is_default());
    }
}
