//! Enum code generation.
//!
//! A proto enum becomes a fieldless `#[repr(i32)]` enum with an int/member
//! lookup pair, defaulting to the mandatory zero member. The generated type
//! implements the runtime's `Scalar` so it can sit anywhere a scalar can,
//! including packed repeated fields and map values.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::schema::Enum;

use super::to_pascal_case;

pub fn generate_enum(enum_type: &Enum) -> TokenStream {
    let enum_ident = format_ident!("{}", enum_type.name);
    let enum_name = enum_type.name.clone();

    let variants: Vec<_> = enum_type
        .members
        .iter()
        .map(|(name, _)| format_ident!("{}", to_pascal_case(name)))
        .collect();
    let member_names: Vec<_> = enum_type.members.iter().map(|(name, _)| name.clone()).collect();
    let numbers: Vec<_> = enum_type
        .members
        .iter()
        .map(|(_, number)| proc_macro2::Literal::i32_unsuffixed(*number))
        .collect();

    // Validation guarantees the zero member exists.
    let default_variant = enum_type
        .members
        .iter()
        .position(|(_, number)| *number == 0)
        .map(|index| variants[index].clone())
        .expect("validated enum has a zero member");

    quote! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        pub enum #enum_ident {
            #(#variants = #numbers),*
        }

        impl #enum_ident {
            /// Convert from the wire integer, `None` for undeclared values.
            pub fn from_i32(value: i32) -> Option<Self> {
                match value {
                    #(#numbers => Some(Self::#variants),)*
                    _ => None,
                }
            }

            /// The declared member name.
            pub fn name(&self) -> &'static str {
                match self {
                    #(Self::#variants => #member_names,)*
                }
            }
        }

        impl From<#enum_ident> for i32 {
            fn from(value: #enum_ident) -> Self {
                value as i32
            }
        }

        impl Default for #enum_ident {
            fn default() -> Self {
                Self::#default_variant
            }
        }

        impl protoforge::codec::Scalar for #enum_ident {
            const WIRE_TYPE: protoforge::wire::WireType = protoforge::wire::WireType::Varint;

            fn decode_value<B: protoforge::bytes::Buf>(
                buf: &mut B,
            ) -> Result<Self, protoforge::DecodeErrorKind> {
                let raw = protoforge::varint::decode_varint(buf)? as i32;
                Self::from_i32(raw).ok_or(protoforge::DecodeErrorKind::UnknownEnumValue {
                    enum_name: #enum_name,
                    value: raw,
                })
            }

            fn encode_value<B: protoforge::bytes::BufMut>(&self, buf: &mut B) {
                protoforge::varint::encode_varint(*self as i32 as i64 as u64, buf);
            }

            fn encoded_len(&self) -> usize {
                protoforge::varint::varint_len(*self as i32 as i64 as u64)
            }
        }

        impl protoforge::codec::IsDefault for #enum_ident {
            fn is_default(&self) -> bool {
                *self as i32 == 0
            }
        }
    }
}
