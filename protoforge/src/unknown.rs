//! Retention of fields not present in the schema.

use bytes::{BufMut, Bytes};

use crate::error::DecodeErrorKind;
use crate::wire::{self, FieldKey};

/// Unknown fields preserved for lossless round-tripping.
///
/// Entries keep their original key and raw value bytes, in insertion order;
/// duplicate keys stay as separate entries. Serialization appends every
/// entry verbatim after all known field groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnknownFields {
    entries: Vec<(FieldKey, Bytes)>,
}

impl UnknownFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop every retained entry, freeing its byte storage.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, key: FieldKey, raw: Bytes) {
        self.entries.push((key, raw));
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &Bytes)> {
        self.entries.iter().map(|(key, raw)| (*key, raw))
    }

    /// Consume one field value from the front of `buf` and retain it.
    pub fn capture(&mut self, key: FieldKey, buf: &mut &[u8]) -> Result<(), DecodeErrorKind> {
        let raw = wire::capture_field(key.wire_type(), buf)?;
        self.entries.push((key, raw));
        Ok(())
    }

    /// Append every entry, original key included, byte-for-byte.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        for (key, raw) in &self.entries {
            key.encode(buf);
            buf.put_slice(raw);
        }
    }

    pub fn encoded_len(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, raw)| key.encoded_len() + raw.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::wire::WireType;

    use super::*;

    #[test]
    fn test_capture_and_reencode() {
        // Two fields: 7:varint(5) and 9:len("ab").
        let wire_data = [0x38, 0x05, 0x4A, 0x02, b'a', b'b'];
        let mut buf = &wire_data[..];

        let mut unknown = UnknownFields::new();
        while !buf.is_empty() {
            let key = FieldKey::decode(&mut buf).unwrap();
            unknown.capture(key, &mut buf).unwrap();
        }
        assert_eq!(unknown.len(), 2);

        let mut out = Vec::new();
        unknown.encode(&mut out);
        assert_eq!(out, wire_data);
        assert_eq!(unknown.encoded_len(), wire_data.len());
    }

    #[test]
    fn test_duplicate_keys_preserved_in_order() {
        let mut unknown = UnknownFields::new();
        let key = FieldKey::new(WireType::Varint, 3);
        unknown.push(key, Bytes::from_static(&[0x01]));
        unknown.push(key, Bytes::from_static(&[0x02]));

        let mut out = Vec::new();
        unknown.encode(&mut out);
        assert_eq!(out, [0x18, 0x01, 0x18, 0x02]);
    }

    #[test]
    fn test_clear() {
        let mut unknown = UnknownFields::new();
        unknown.push(FieldKey::new(WireType::Varint, 1), Bytes::from_static(&[0]));
        assert!(!unknown.is_empty());
        unknown.clear();
        assert!(unknown.is_empty());
        assert_eq!(unknown.encoded_len(), 0);
    }
}
