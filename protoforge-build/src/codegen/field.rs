//! Per-field code generation: slot declarations, parse-dispatch arm bodies,
//! and the encode/length/value/debug fragments for non-oneof groups.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::context::{GenerationContext, TypeKind};
use crate::schema::{Cardinality, Field, FieldType};
use crate::Error;

use super::types::{map_key_rust_type, map_key_wire_type, scalar_rust_type, wire_type_tokens};

/// True for the types whose host representation is `Copy`.
fn is_copy(ty: &FieldType) -> bool {
    !matches!(
        ty,
        FieldType::String | FieldType::Bytes | FieldType::Message(_) | FieldType::Map { .. }
    )
}

fn referrer(message_name: &str, field: &Field) -> String {
    format!("{}.{}", message_name, field.name)
}

/// The slot type of a single (non-oneof) field group.
pub fn slot_type(
    ctx: &GenerationContext<'_>,
    module: &str,
    message_name: &str,
    field: &Field,
) -> Result<TokenStream, Error> {
    let referrer = referrer(message_name, field);
    Ok(match &field.ty {
        FieldType::Map { key, value } => {
            let key_ty = map_key_rust_type(*key);
            let value_ty = scalar_rust_type(ctx, module, &referrer, value)?;
            quote!(std::collections::BTreeMap<#key_ty, #value_ty>)
        }
        ty => {
            let base = scalar_rust_type(ctx, module, &referrer, ty)?;
            let base = if ctx.is_boxed(module, message_name, &field.name) {
                quote!(Box<#base>)
            } else {
                base
            };
            match (field.cardinality, ty) {
                (Cardinality::Repeated, _) => quote!(Vec<#base>),
                (Cardinality::Optional, _) => quote!(Option<#base>),
                // Singular submessages defer default materialization.
                (Cardinality::Singular, FieldType::Message(_)) => quote!(Option<#base>),
                (Cardinality::Singular, _) => base,
            }
        }
    })
}

pub fn slot_decl(
    ctx: &GenerationContext<'_>,
    module: &str,
    message_name: &str,
    field: &Field,
) -> Result<TokenStream, Error> {
    let name = format_ident!("{}", field.name);
    let ty = slot_type(ctx, module, message_name, field)?;
    Ok(quote! {
        pub #name: #ty,
    })
}

/// The assignment used by a plain singular/optional field's decode arm; the
/// decoded value is bound to `value`.
pub fn plain_assign(
    ctx: &GenerationContext<'_>,
    module: &str,
    message_name: &str,
    field: &Field,
) -> TokenStream {
    let name = format_ident!("{}", field.name);
    let boxed = ctx.is_boxed(module, message_name, &field.name);
    let value = if boxed {
        quote!(Box::new(value))
    } else {
        quote!(value)
    };
    let wrapped = match (field.cardinality, &field.ty) {
        (Cardinality::Optional, _) | (Cardinality::Singular, FieldType::Message(_)) => {
            quote!(Some(#value))
        }
        _ => value,
    };
    quote! { self.#name = #wrapped; }
}

/// The body of one parse-dispatch arm, as an expression of type
/// `Result<(), protoforge::DecodeError>`. `assign` consumes the decoded
/// `value` binding for the non-repeated shapes.
pub fn decode_arm_body(
    ctx: &GenerationContext<'_>,
    module: &str,
    message_name: &str,
    field: &Field,
    assign: &TokenStream,
) -> Result<TokenStream, Error> {
    let referrer = referrer(message_name, field);
    let name = format_ident!("{}", field.name);
    let mismatch = |expected: &TokenStream| {
        quote! {
            Ok(protoforge::message::mismatched_field(
                &mut self.unknown_fields,
                key,
                #expected,
                &mut rem,
                options,
            )?)
        }
    };

    Ok(match (&field.ty, field.cardinality) {
        (FieldType::Map { key, value }, _) => {
            let key_wt = map_key_wire_type(*key);
            let value_wt = wire_type_tokens(value);
            let key_ty = map_key_rust_type(*key);
            let key_closure = quote! {
                |buf| Ok(<#key_ty as protoforge::codec::Scalar>::decode_value(buf)?)
            };
            let value_closure = match value.as_ref() {
                FieldType::Message(type_ref) => {
                    let value_ty = ctx.resolve(module, &referrer, type_ref, TypeKind::Message)?;
                    quote! {
                        |buf, options| protoforge::message::decode_message_field::<#value_ty>(buf, options)
                    }
                }
                other => {
                    let value_ty = scalar_rust_type(ctx, module, &referrer, other)?;
                    quote! {
                        |buf, _options| Ok(<#value_ty as protoforge::codec::Scalar>::decode_value(buf)?)
                    }
                }
            };
            let fallback = mismatch(&quote!(protoforge::wire::WireType::Len));
            quote! {
                if key.wire_type() == protoforge::wire::WireType::Len {
                    let (entry_key, entry_value) = protoforge::map::decode_entry(
                        &mut rem,
                        options,
                        #key_wt,
                        #value_wt,
                        #key_closure,
                        #value_closure,
                    )?;
                    self.#name.insert(entry_key, entry_value);
                    Ok(())
                } else {
                    #fallback
                }
            }
        }
        (FieldType::Message(type_ref), Cardinality::Repeated) => {
            let ty = ctx.resolve(module, &referrer, type_ref, TypeKind::Message)?;
            let fallback = mismatch(&quote!(protoforge::wire::WireType::Len));
            quote! {
                if key.wire_type() == protoforge::wire::WireType::Len {
                    let index = self.#name.len();
                    match protoforge::message::decode_message_field::<#ty>(&mut rem, options) {
                        Ok(value) => {
                            self.#name.push(value);
                            Ok(())
                        }
                        Err(error) => Err(error.at_index(index)),
                    }
                } else {
                    #fallback
                }
            }
        }
        (FieldType::Message(type_ref), _) => {
            let ty = ctx.resolve(module, &referrer, type_ref, TypeKind::Message)?;
            let fallback = mismatch(&quote!(protoforge::wire::WireType::Len));
            quote! {
                if key.wire_type() == protoforge::wire::WireType::Len {
                    let value = protoforge::message::decode_message_field::<#ty>(&mut rem, options)?;
                    #assign
                    Ok(())
                } else {
                    #fallback
                }
            }
        }
        (ty, Cardinality::Repeated) if ty.is_packable() => {
            let wt = wire_type_tokens(ty);
            let fallback = mismatch(&wt);
            quote! {
                if key.wire_type() == protoforge::wire::WireType::Len {
                    protoforge::repeated::decode_packed(&mut rem, &mut self.#name)
                } else if key.wire_type() == #wt {
                    protoforge::repeated::decode_unpacked(&mut rem, &mut self.#name)
                } else {
                    #fallback
                }
            }
        }
        (_, Cardinality::Repeated) => {
            // string/bytes: Len-framed, never packed.
            let fallback = mismatch(&quote!(protoforge::wire::WireType::Len));
            quote! {
                if key.wire_type() == protoforge::wire::WireType::Len {
                    protoforge::repeated::decode_unpacked(&mut rem, &mut self.#name)
                } else {
                    #fallback
                }
            }
        }
        (ty, _) => {
            let wt = wire_type_tokens(ty);
            let rust_ty = scalar_rust_type(ctx, module, &referrer, ty)?;
            let fallback = mismatch(&wt);
            quote! {
                if key.wire_type() == #wt {
                    let value = <#rust_ty as protoforge::codec::Scalar>::decode_value(&mut rem)?;
                    #assign
                    Ok(())
                } else {
                    #fallback
                }
            }
        }
    })
}

/// Encode statements for a single (non-oneof) field group.
pub fn encode_stmts(field: &Field) -> TokenStream {
    let name = format_ident!("{}", field.name);
    let number = proc_macro2::Literal::u32_unsuffixed(field.number);

    match (&field.ty, field.cardinality) {
        (FieldType::Map { key, value }, _) => {
            let key_wt = map_key_wire_type(*key);
            let value_wt = wire_type_tokens(value);
            let (value_len, value_encode) = if matches!(value.as_ref(), FieldType::Message(_)) {
                (
                    quote!(protoforge::message::message_field_len(entry_value)),
                    quote!(protoforge::message::encode_message_field(entry_value, buf)),
                )
            } else {
                (
                    quote!(entry_value.encoded_len()),
                    quote!(entry_value.encode_value(buf)),
                )
            };
            quote! {
                for (entry_key, entry_value) in &self.#name {
                    protoforge::map::encode_entry(
                        #number,
                        buf,
                        #key_wt,
                        #value_wt,
                        entry_key.encoded_len(),
                        #value_len,
                        |buf| entry_key.encode_value(buf),
                        |buf| #value_encode,
                    );
                }
            }
        }
        (FieldType::Message(_), Cardinality::Repeated) => quote! {
            for item in &self.#name {
                protoforge::wire::FieldKey::new(protoforge::wire::WireType::Len, #number)
                    .encode(buf);
                protoforge::message::encode_message_field(item, buf);
            }
        },
        (FieldType::Message(_), Cardinality::Optional) => quote! {
            if let Some(value) = &self.#name {
                protoforge::wire::FieldKey::new(protoforge::wire::WireType::Len, #number)
                    .encode(buf);
                protoforge::message::encode_message_field(value, buf);
            }
        },
        (FieldType::Message(_), Cardinality::Singular) => quote! {
            if let Some(value) = &self.#name {
                if value.encoded_len() > 0 {
                    protoforge::wire::FieldKey::new(protoforge::wire::WireType::Len, #number)
                        .encode(buf);
                    protoforge::message::encode_message_field(value, buf);
                }
            }
        },
        (ty, Cardinality::Repeated) if ty.is_packable() => quote! {
            protoforge::repeated::encode_packed(#number, &self.#name, buf);
        },
        (_, Cardinality::Repeated) => quote! {
            protoforge::repeated::encode_unpacked(#number, &self.#name, buf);
        },
        (ty, Cardinality::Optional) => {
            let wt = wire_type_tokens(ty);
            quote! {
                if let Some(value) = &self.#name {
                    protoforge::wire::FieldKey::new(#wt, #number).encode(buf);
                    value.encode_value(buf);
                }
            }
        }
        (ty, Cardinality::Singular) => {
            let wt = wire_type_tokens(ty);
            quote! {
                if !self.#name.is_default() {
                    protoforge::wire::FieldKey::new(#wt, #number).encode(buf);
                    self.#name.encode_value(buf);
                }
            }
        }
    }
}

/// Length statements mirroring [`encode_stmts`]; accumulate into `len`.
pub fn len_stmts(field: &Field) -> TokenStream {
    let name = format_ident!("{}", field.name);
    let number = proc_macro2::Literal::u32_unsuffixed(field.number);

    match (&field.ty, field.cardinality) {
        (FieldType::Map { key, value }, _) => {
            let key_wt = map_key_wire_type(*key);
            let value_wt = wire_type_tokens(value);
            let value_len = if matches!(value.as_ref(), FieldType::Message(_)) {
                quote!(protoforge::message::message_field_len(entry_value))
            } else {
                quote!(entry_value.encoded_len())
            };
            quote! {
                for (entry_key, entry_value) in &self.#name {
                    len += protoforge::map::entry_len(
                        #number,
                        #key_wt,
                        #value_wt,
                        entry_key.encoded_len(),
                        #value_len,
                    );
                }
            }
        }
        (FieldType::Message(_), Cardinality::Repeated) => quote! {
            for item in &self.#name {
                len += protoforge::wire::FieldKey::new(protoforge::wire::WireType::Len, #number)
                    .encoded_len()
                    + protoforge::message::message_field_len(item);
            }
        },
        (FieldType::Message(_), Cardinality::Optional) => quote! {
            if let Some(value) = &self.#name {
                len += protoforge::wire::FieldKey::new(protoforge::wire::WireType::Len, #number)
                    .encoded_len()
                    + protoforge::message::message_field_len(value);
            }
        },
        (FieldType::Message(_), Cardinality::Singular) => quote! {
            if let Some(value) = &self.#name {
                if value.encoded_len() > 0 {
                    len += protoforge::wire::FieldKey::new(
                        protoforge::wire::WireType::Len,
                        #number,
                    )
                    .encoded_len()
                        + protoforge::message::message_field_len(value);
                }
            }
        },
        (ty, Cardinality::Repeated) if ty.is_packable() => quote! {
            len += protoforge::repeated::packed_len(#number, &self.#name);
        },
        (_, Cardinality::Repeated) => quote! {
            len += protoforge::repeated::unpacked_len(#number, &self.#name);
        },
        (ty, Cardinality::Optional) => {
            let wt = wire_type_tokens(ty);
            quote! {
                if let Some(value) = &self.#name {
                    len += protoforge::wire::FieldKey::new(#wt, #number).encoded_len()
                        + value.encoded_len();
                }
            }
        }
        (ty, Cardinality::Singular) => {
            let wt = wire_type_tokens(ty);
            quote! {
                if !self.#name.is_default() {
                    len += protoforge::wire::FieldKey::new(#wt, #number).encoded_len()
                        + self.#name.encoded_len();
                }
            }
        }
    }
}

/// The [`protoforge::Value`] projection of one value of `ty`, reached
/// through `access`. `deref` is set when `access` is a reference binding to
/// a `Copy` value.
pub fn scalar_value_expr(ty: &FieldType, access: TokenStream, deref: bool) -> TokenStream {
    let access_value = if deref && is_copy(ty) {
        quote!(*#access)
    } else {
        access.clone()
    };
    match ty {
        FieldType::Enum(_) => quote! {
            protoforge::Value::Enum {
                name: #access.name(),
                number: i32::from(#access_value),
            }
        },
        FieldType::Message(_) => quote!(#access.to_value()),
        FieldType::Map { .. } => unreachable!("map values cannot nest maps"),
        _ if is_copy(ty) => quote!(protoforge::Value::from(#access_value)),
        _ => quote!(protoforge::Value::from(#access.clone())),
    }
}

/// The value-projection expression for a single (non-oneof) field group.
pub fn value_expr(field: &Field) -> TokenStream {
    let name = format_ident!("{}", field.name);

    match (&field.ty, field.cardinality) {
        (FieldType::Map { value, .. }, _) => {
            let key_expr = quote!(protoforge::Value::from(entry_key.clone()));
            let value_expr = scalar_value_expr(value, quote!(entry_value), true);
            quote! {
                protoforge::Value::Map(
                    self.#name
                        .iter()
                        .map(|(entry_key, entry_value)| (#key_expr, #value_expr))
                        .collect(),
                )
            }
        }
        (ty, Cardinality::Repeated) => {
            let element = scalar_value_expr(ty, quote!(value), true);
            quote! {
                protoforge::Value::List(self.#name.iter().map(|value| #element).collect())
            }
        }
        (ty, Cardinality::Optional) => {
            let some = scalar_value_expr(ty, quote!(value), true);
            quote! {
                match &self.#name {
                    Some(value) => #some,
                    None => protoforge::Value::None,
                }
            }
        }
        (FieldType::Message(_), Cardinality::Singular) => quote! {
            match &self.#name {
                Some(value) => value.to_value(),
                None => protoforge::Value::None,
            }
        },
        (ty, Cardinality::Singular) => scalar_value_expr(ty, quote!(self.#name), false),
    }
}

/// Debug statement writing `name=<value>` for a single field group; string
/// and bytes slots go through the truncating adapters.
pub fn debug_stmt(field: &Field, prefix: &str) -> TokenStream {
    let name = format_ident!("{}", field.name);
    let label = format!("{prefix}{}=", field.name);

    match (&field.ty, field.cardinality) {
        (FieldType::String, Cardinality::Singular) => quote! {
            f.write_str(#label)?;
            write!(f, "{:?}", protoforge::util::TruncatedStr(&self.#name))?;
        },
        (FieldType::Bytes, Cardinality::Singular) => quote! {
            f.write_str(#label)?;
            write!(f, "{:?}", protoforge::util::TruncatedBytes(&self.#name))?;
        },
        (FieldType::String, Cardinality::Optional) => quote! {
            f.write_str(#label)?;
            match &self.#name {
                Some(value) => write!(f, "{:?}", protoforge::util::TruncatedStr(value))?,
                None => f.write_str("None")?,
            }
        },
        (FieldType::Bytes, Cardinality::Optional) => quote! {
            f.write_str(#label)?;
            match &self.#name {
                Some(value) => write!(f, "{:?}", protoforge::util::TruncatedBytes(value))?,
                None => f.write_str("None")?,
            }
        },
        _ => quote! {
            f.write_str(#label)?;
            write!(f, "{:?}", self.#name)?;
        },
    }
}
