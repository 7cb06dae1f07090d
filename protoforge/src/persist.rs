//! Serde bridging for generated messages.
//!
//! The serialized form is the proto wire encoding itself; restore is
//! default-construct plus merge, so unknown fields survive a persistence
//! round-trip the same way they survive a wire round-trip.

use std::marker::PhantomData;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

use crate::message::{DecodeOptions, Message};

/// Serialize `message` as its proto wire bytes.
pub fn serialize<M: Message, S: Serializer>(
    message: &M,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_bytes(&message.to_vec())
}

/// Restore a message from its proto wire bytes.
pub fn deserialize<'de, M: Message, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<M, D::Error> {
    struct WireVisitor<M>(PhantomData<M>);

    impl<'de, M: Message> Visitor<'de> for WireVisitor<M> {
        type Value = M;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("proto-encoded bytes")
        }

        fn visit_bytes<E: de::Error>(self, data: &[u8]) -> Result<M, E> {
            M::decode(data, DecodeOptions::default()).map_err(E::custom)
        }

        // Formats without a native bytes type hand the payload over as a
        // sequence of integers.
        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<M, A::Error> {
            let mut data = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(byte) = seq.next_element::<u8>()? {
                data.push(byte);
            }
            M::decode(&data, DecodeOptions::default()).map_err(de::Error::custom)
        }
    }

    deserializer.deserialize_bytes(WireVisitor(PhantomData))
}
