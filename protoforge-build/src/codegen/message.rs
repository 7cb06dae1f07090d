//! Message code generation: the struct, its `Message` impl with the
//! field-number parse dispatch, the declaration-order serializer, the
//! truncating `Debug` rendering, and optional serde bridging.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::context::GenerationContext;
use crate::schema::{FieldGroup, Message, Module};
use crate::Error;

use super::{field, oneof};

pub fn generate_message(
    ctx: &GenerationContext<'_>,
    module: &Module,
    message: &Message,
) -> Result<TokenStream, Error> {
    let struct_ident = format_ident!("{}", message.name);

    let mut oneof_enums = TokenStream::new();
    let mut slot_decls = Vec::new();
    let mut decode_arms = Vec::new();
    let mut encode_stmts = Vec::new();
    let mut len_stmts = Vec::new();
    let mut value_entries = Vec::new();
    let mut debug_stmts = Vec::new();

    for (index, group) in message.groups.iter().enumerate() {
        let prefix = if index == 0 { "" } else { ", " };
        match group {
            FieldGroup::Single(single) => {
                slot_decls.push(field::slot_decl(ctx, &module.name, &message.name, single)?);

                let assign = field::plain_assign(ctx, &module.name, &message.name, single);
                let body =
                    field::decode_arm_body(ctx, &module.name, &message.name, single, &assign)?;
                decode_arms.push(dispatch_arm(single.number, &single.name, body));

                encode_stmts.push(field::encode_stmts(single));
                len_stmts.push(field::len_stmts(single));

                let group_name = single.name.clone();
                let value = field::value_expr(single);
                value_entries.push(quote!((#group_name, #value)));

                debug_stmts.push(field::debug_stmt(single, prefix));
            }
            FieldGroup::Oneof {
                name,
                optional,
                fields,
            } => {
                oneof_enums.extend(oneof::generate_oneof_enum(
                    ctx,
                    &module.name,
                    &message.name,
                    name,
                    *optional,
                    fields,
                )?);

                let slot = format_ident!("{}", name);
                let enum_ident = oneof::oneof_enum_ident(&message.name, name);
                if *optional {
                    slot_decls.push(quote! { pub #slot: Option<#enum_ident>, });
                } else {
                    slot_decls.push(quote! { pub #slot: #enum_ident, });
                }

                for member in fields {
                    let assign = oneof::member_assign(
                        ctx,
                        &module.name,
                        &message.name,
                        name,
                        *optional,
                        member,
                    );
                    let body =
                        field::decode_arm_body(ctx, &module.name, &message.name, member, &assign)?;
                    decode_arms.push(dispatch_arm(member.number, name, body));
                }

                encode_stmts.push(oneof::encode_stmts(&message.name, name, *optional, fields));
                len_stmts.push(oneof::len_stmts(&message.name, name, *optional, fields));

                let group_name = name.clone();
                let value = oneof::value_expr(&message.name, name, *optional, fields);
                value_entries.push(quote!((#group_name, #value)));

                let label = format!("{prefix}{name}=");
                debug_stmts.push(quote! {
                    f.write_str(#label)?;
                    write!(f, "{:?}", self.#slot)?;
                });
            }
        }
    }

    let full_name = format!("{}.{}(", module.name, message.name);

    let serde_impls = if ctx.config.emit_serde {
        quote! {
            impl protoforge::serde::Serialize for #struct_ident {
                fn serialize<S: protoforge::serde::Serializer>(
                    &self,
                    serializer: S,
                ) -> Result<S::Ok, S::Error> {
                    protoforge::persist::serialize(self, serializer)
                }
            }

            impl<'de> protoforge::serde::Deserialize<'de> for #struct_ident {
                fn deserialize<D: protoforge::serde::Deserializer<'de>>(
                    deserializer: D,
                ) -> Result<Self, D::Error> {
                    protoforge::persist::deserialize(deserializer)
                }
            }
        }
    } else {
        quote!()
    };

    Ok(quote! {
        #oneof_enums

        #[derive(Clone, Default, PartialEq)]
        pub struct #struct_ident {
            #(#slot_decls)*
            pub unknown_fields: protoforge::UnknownFields,
        }

        impl protoforge::Message for #struct_ident {
            fn merge_from_slice(
                &mut self,
                data: &[u8],
                options: protoforge::DecodeOptions,
            ) -> Result<(), protoforge::DecodeError> {
                let mut rem = data;
                while !rem.is_empty() {
                    let key = protoforge::wire::FieldKey::decode(&mut rem)?;
                    match key.number() {
                        #(#decode_arms)*
                        _ => {
                            protoforge::message::unknown_field(
                                &mut self.unknown_fields,
                                key,
                                &mut rem,
                                options,
                            )
                            .map_err(|error| {
                                protoforge::DecodeError::from(error)
                                    .in_unknown_field(data.len() - rem.len())
                            })?;
                        }
                    }
                }
                Ok(())
            }

            fn encode<B: protoforge::bytes::BufMut>(&self, buf: &mut B) {
                #(#encode_stmts)*
                self.unknown_fields.encode(buf);
            }

            fn encoded_len(&self) -> usize {
                let mut len = 0;
                #(#len_stmts)*
                len += self.unknown_fields.encoded_len();
                len
            }

            fn unknown_fields(&self) -> &protoforge::UnknownFields {
                &self.unknown_fields
            }

            fn unknown_fields_mut(&mut self) -> &mut protoforge::UnknownFields {
                &mut self.unknown_fields
            }

            fn to_value(&self) -> protoforge::Value {
                protoforge::Value::Message(vec![#(#value_entries),*])
            }
        }

        impl core::fmt::Debug for #struct_ident {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(#full_name)?;
                #(#debug_stmts)*
                f.write_str(")")
            }
        }

        #serde_impls
    })
}

fn dispatch_arm(number: u32, group_name: &str, body: TokenStream) -> TokenStream {
    let number_lit = proc_macro2::Literal::u32_unsuffixed(number);
    quote! {
        #number_lit => {
            let result = (|| -> Result<(), protoforge::DecodeError> { #body })();
            result.map_err(|error| {
                error.in_field(#group_name, #number_lit, data.len() - rem.len())
            })?;
        }
    }
}
