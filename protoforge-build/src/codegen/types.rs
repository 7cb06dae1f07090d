//! Mapping from schema field types to Rust types, wire types, and codecs.

use proc_macro2::TokenStream;
use quote::quote;

use crate::context::{GenerationContext, TypeKind};
use crate::schema::{FieldType, MapKeyType};
use crate::Error;

/// Wire type a field of this data type is framed with.
pub fn wire_type_tokens(ty: &FieldType) -> TokenStream {
    match ty {
        FieldType::Int32
        | FieldType::Uint32
        | FieldType::Sint32
        | FieldType::Int64
        | FieldType::Uint64
        | FieldType::Sint64
        | FieldType::Bool
        | FieldType::Enum(_) => quote!(protoforge::wire::WireType::Varint),
        FieldType::Fixed32 | FieldType::Sfixed32 | FieldType::Float => {
            quote!(protoforge::wire::WireType::I32)
        }
        FieldType::Fixed64 | FieldType::Sfixed64 | FieldType::Double => {
            quote!(protoforge::wire::WireType::I64)
        }
        FieldType::String | FieldType::Bytes | FieldType::Message(_) | FieldType::Map { .. } => {
            quote!(protoforge::wire::WireType::Len)
        }
    }
}

/// The Rust type one value of this data type occupies in a slot. Map fields
/// are handled by the caller; message references come back unboxed.
pub fn scalar_rust_type(
    ctx: &GenerationContext<'_>,
    module: &str,
    referrer: &str,
    ty: &FieldType,
) -> Result<TokenStream, Error> {
    Ok(match ty {
        FieldType::Float => quote!(f32),
        FieldType::Double => quote!(f64),
        FieldType::Int32 => quote!(i32),
        FieldType::Uint32 => quote!(u32),
        FieldType::Sint32 => quote!(protoforge::codec::Sint32),
        FieldType::Int64 => quote!(i64),
        FieldType::Uint64 => quote!(u64),
        FieldType::Sint64 => quote!(protoforge::codec::Sint64),
        FieldType::Fixed32 => quote!(protoforge::codec::Fixed32),
        FieldType::Sfixed32 => quote!(protoforge::codec::Sfixed32),
        FieldType::Fixed64 => quote!(protoforge::codec::Fixed64),
        FieldType::Sfixed64 => quote!(protoforge::codec::Sfixed64),
        FieldType::Bool => quote!(bool),
        FieldType::String => quote!(String),
        FieldType::Bytes => quote!(protoforge::bytes::Bytes),
        FieldType::Enum(type_ref) => ctx.resolve(module, referrer, type_ref, TypeKind::Enum)?,
        FieldType::Message(type_ref) => {
            ctx.resolve(module, referrer, type_ref, TypeKind::Message)?
        }
        FieldType::Map { .. } => unreachable!("map fields are framed by the caller"),
    })
}

pub fn map_key_rust_type(key: MapKeyType) -> TokenStream {
    match key {
        MapKeyType::Int32 => quote!(i32),
        MapKeyType::Int64 => quote!(i64),
        MapKeyType::Uint32 => quote!(u32),
        MapKeyType::Uint64 => quote!(u64),
        MapKeyType::Sint32 => quote!(protoforge::codec::Sint32),
        MapKeyType::Sint64 => quote!(protoforge::codec::Sint64),
        MapKeyType::Fixed32 => quote!(protoforge::codec::Fixed32),
        MapKeyType::Fixed64 => quote!(protoforge::codec::Fixed64),
        MapKeyType::Sfixed32 => quote!(protoforge::codec::Sfixed32),
        MapKeyType::Sfixed64 => quote!(protoforge::codec::Sfixed64),
        MapKeyType::Bool => quote!(bool),
        MapKeyType::String => quote!(String),
    }
}

pub fn map_key_wire_type(key: MapKeyType) -> TokenStream {
    match key {
        MapKeyType::Int32
        | MapKeyType::Int64
        | MapKeyType::Uint32
        | MapKeyType::Uint64
        | MapKeyType::Sint32
        | MapKeyType::Sint64
        | MapKeyType::Bool => quote!(protoforge::wire::WireType::Varint),
        MapKeyType::Fixed32 | MapKeyType::Sfixed32 => quote!(protoforge::wire::WireType::I32),
        MapKeyType::Fixed64 | MapKeyType::Sfixed64 => quote!(protoforge::wire::WireType::I64),
        MapKeyType::String => quote!(protoforge::wire::WireType::Len),
    }
}
