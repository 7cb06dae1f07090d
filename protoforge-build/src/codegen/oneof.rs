//! Oneof code generation: one tagged enum per group, with parse dispatch on
//! the member field numbers and exhaustive matching at serialize time.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::context::GenerationContext;
use crate::schema::{Field, FieldType};
use crate::Error;

use super::field::scalar_value_expr;
use super::to_pascal_case;
use super::types::{scalar_rust_type, wire_type_tokens};

pub fn oneof_enum_ident(message_name: &str, group_name: &str) -> Ident {
    format_ident!("{}{}", message_name, to_pascal_case(group_name))
}

pub fn variant_ident(field: &Field) -> Ident {
    format_ident!("{}", to_pascal_case(&field.name))
}

fn member_type(
    ctx: &GenerationContext<'_>,
    module: &str,
    message_name: &str,
    field: &Field,
) -> Result<TokenStream, Error> {
    let referrer = format!("{}.{}", message_name, field.name);
    let base = scalar_rust_type(ctx, module, &referrer, &field.ty)?;
    Ok(if ctx.is_boxed(module, message_name, &field.name) {
        quote!(Box<#base>)
    } else {
        base
    })
}

/// The tagged sum for one oneof group. Non-optional groups default to the
/// first declared member at its default value.
pub fn generate_oneof_enum(
    ctx: &GenerationContext<'_>,
    module: &str,
    message_name: &str,
    group_name: &str,
    optional: bool,
    fields: &[Field],
) -> Result<TokenStream, Error> {
    let enum_ident = oneof_enum_ident(message_name, group_name);

    let mut variants = Vec::new();
    for field in fields {
        let variant = variant_ident(field);
        let ty = member_type(ctx, module, message_name, field)?;
        variants.push(quote!(#variant(#ty)));
    }

    let default_impl = if optional {
        quote!()
    } else {
        let first = variant_ident(&fields[0]);
        quote! {
            impl Default for #enum_ident {
                fn default() -> Self {
                    #enum_ident::#first(Default::default())
                }
            }
        }
    };

    Ok(quote! {
        #[derive(Debug, Clone, PartialEq)]
        pub enum #enum_ident {
            #(#variants),*
        }

        #default_impl
    })
}

/// The decode-arm assignment for one oneof member; the decoded value is
/// bound to `value`.
pub fn member_assign(
    ctx: &GenerationContext<'_>,
    module: &str,
    message_name: &str,
    group_name: &str,
    optional: bool,
    field: &Field,
) -> TokenStream {
    let group = format_ident!("{}", group_name);
    let enum_ident = oneof_enum_ident(message_name, group_name);
    let variant = variant_ident(field);
    let value = if ctx.is_boxed(module, message_name, &field.name) {
        quote!(Box::new(value))
    } else {
        quote!(value)
    };
    if optional {
        quote! { self.#group = Some(#enum_ident::#variant(#value)); }
    } else {
        quote! { self.#group = #enum_ident::#variant(#value); }
    }
}

/// Per-variant encode arms. Non-optional groups elide a member at its
/// default (or a submessage with an empty body) the way a singular field
/// would; optional groups always write the active member.
fn member_arms(
    message_name: &str,
    group_name: &str,
    optional: bool,
    fields: &[Field],
    body: impl Fn(&Field, &TokenStream) -> TokenStream,
) -> TokenStream {
    let enum_ident = oneof_enum_ident(message_name, group_name);
    let arms = fields.iter().map(|field| {
        let variant = variant_ident(field);
        let write = body(field, &quote!(value));
        let guarded = if optional {
            write
        } else if matches!(field.ty, FieldType::Message(_)) {
            quote! {
                if value.encoded_len() > 0 {
                    #write
                }
            }
        } else {
            quote! {
                if !value.is_default() {
                    #write
                }
            }
        };
        quote! {
            #enum_ident::#variant(value) => {
                #guarded
            }
        }
    });
    quote!(#(#arms)*)
}

fn wrap_group_match(group_name: &str, optional: bool, arms: TokenStream) -> TokenStream {
    let group = format_ident!("{}", group_name);
    if optional {
        quote! {
            if let Some(active) = &self.#group {
                match active {
                    #arms
                }
            }
        }
    } else {
        quote! {
            match &self.#group {
                #arms
            }
        }
    }
}

pub fn encode_stmts(
    message_name: &str,
    group_name: &str,
    optional: bool,
    fields: &[Field],
) -> TokenStream {
    let arms = member_arms(message_name, group_name, optional, fields, |field, value| {
        let number = proc_macro2::Literal::u32_unsuffixed(field.number);
        match &field.ty {
            FieldType::Message(_) => quote! {
                protoforge::wire::FieldKey::new(protoforge::wire::WireType::Len, #number)
                    .encode(buf);
                protoforge::message::encode_message_field(#value, buf);
            },
            ty => {
                let wt = wire_type_tokens(ty);
                quote! {
                    protoforge::wire::FieldKey::new(#wt, #number).encode(buf);
                    #value.encode_value(buf);
                }
            }
        }
    });
    wrap_group_match(group_name, optional, arms)
}

pub fn len_stmts(
    message_name: &str,
    group_name: &str,
    optional: bool,
    fields: &[Field],
) -> TokenStream {
    let arms = member_arms(message_name, group_name, optional, fields, |field, value| {
        let number = proc_macro2::Literal::u32_unsuffixed(field.number);
        match &field.ty {
            FieldType::Message(_) => quote! {
                len += protoforge::wire::FieldKey::new(protoforge::wire::WireType::Len, #number)
                    .encoded_len()
                    + protoforge::message::message_field_len(#value);
            },
            ty => {
                let wt = wire_type_tokens(ty);
                quote! {
                    len += protoforge::wire::FieldKey::new(#wt, #number).encoded_len()
                        + #value.encoded_len();
                }
            }
        }
    });
    wrap_group_match(group_name, optional, arms)
}

/// The value-projection expression for a oneof group.
pub fn value_expr(
    message_name: &str,
    group_name: &str,
    optional: bool,
    fields: &[Field],
) -> TokenStream {
    let group = format_ident!("{}", group_name);
    let enum_ident = oneof_enum_ident(message_name, group_name);
    let arms = fields.iter().map(|field| {
        let variant = variant_ident(field);
        let expr = scalar_value_expr(&field.ty, quote!(value), true);
        quote! { #enum_ident::#variant(value) => #expr, }
    });

    if optional {
        let arms = arms.collect::<Vec<_>>();
        quote! {
            match &self.#group {
                Some(active) => match active {
                    #(#arms)*
                },
                None => protoforge::Value::None,
            }
        }
    } else {
        quote! {
            match &self.#group {
                #(#arms)*
            }
        }
    }
}
