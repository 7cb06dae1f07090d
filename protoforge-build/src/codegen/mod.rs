//! Code generation from a validated schema model.

mod enumeration;
mod field;
mod message;
mod module;
mod oneof;
mod types;

use proc_macro2::TokenStream;
use quote::quote;

use crate::config::Config;
use crate::context::GenerationContext;
use crate::schema::{Module, ModuleSet};
use crate::Error;

/// Main entry point: validate `set` and write one Rust module per schema
/// module plus a `mod.rs` into the configured output directory.
pub fn compile(config: &Config, set: &ModuleSet) -> Result<(), Error> {
    let out_dir = config
        .out_dir
        .clone()
        .or_else(|| std::env::var_os("OUT_DIR").map(Into::into))
        .ok_or(Error::MissingOutDir)?;

    let ctx = GenerationContext::new(config, set)?;

    let mut modules = Vec::new();
    for module in &set.modules {
        tracing::info!(module = %module.name, "generating module");
        modules.push((module.name.clone(), generate_module(&ctx, module)?));
    }

    module::write_modules(&out_dir, &modules, &ctx)
}

fn generate_module(ctx: &GenerationContext<'_>, module: &Module) -> Result<TokenStream, Error> {
    let mut tokens = quote! {
        #[allow(unused_imports)]
        use protoforge::codec::{IsDefault as _, Scalar as _};
        #[allow(unused_imports)]
        use protoforge::Message as _;
    };

    for enum_type in &module.enums {
        tracing::debug!(module = %module.name, name = %enum_type.name, "generating enum");
        tokens.extend(enumeration::generate_enum(enum_type));
    }

    for msg in &module.messages {
        tracing::debug!(module = %module.name, name = %msg.name, "generating message");
        tokens.extend(message::generate_message(ctx, module, msg)?);
    }

    Ok(tokens)
}

/// Convert a schema name (snake_case or SCREAMING_SNAKE_CASE) to PascalCase.
pub(crate) fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.map(|c| c.to_ascii_lowercase()))
                    .collect(),
            }
        })
        .collect()
}
