//! Runtime support for `protoforge`-generated proto3 codecs.
//!
//! Generated modules (see the `protoforge-build` crate) contain one struct per
//! message and one enum per proto enum, with parse and serialize routines that
//! dispatch on field numbers hard-coded at generation time. This crate holds
//! everything those routines lean on: the wire-format primitives
//! ([`varint`], [`wire`]), the per-type value codecs ([`codec`]), the
//! repeated/map framing helpers ([`repeated`], [`map`]), unknown-field
//! retention ([`unknown`]), and the [`Message`] trait itself.
//!
//! The wire format follows <https://protobuf.dev/programming-guides/encoding>.
//! Groups (wire types 3 and 4) are rejected.

// Fixed-width I/O assumes a little-endian host throughout.
#[cfg(target_endian = "big")]
compile_error!("protoforge cannot be built for big-endian targets");

pub mod codec;
pub mod error;
pub mod map;
pub mod message;
#[cfg(feature = "serde")]
pub mod persist;
pub mod repeated;
pub mod unknown;
pub mod util;
pub mod value;
pub mod varint;
pub mod wire;

pub use error::{DecodeError, DecodeErrorKind};
pub use message::{DecodeOptions, Message};
pub use unknown::UnknownFields;
pub use value::Value;

// Re-exported so generated code can name these crates through a single
// dependency on `protoforge`.
pub use bytes;
#[cfg(feature = "serde")]
pub use serde;
