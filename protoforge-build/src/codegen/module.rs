//! Writing generated modules to disk.

use std::fs;
use std::path::Path;

use proc_macro2::TokenStream;

use crate::context::GenerationContext;
use crate::Error;

const HEADER: &str = "// Generated by protoforge-build. Do not edit.\n\n";

/// Write each generated module as `<name>.rs` plus a `mod.rs` declaring
/// them all and re-exporting the unambiguous type aliases.
pub fn write_modules(
    out_dir: &Path,
    modules: &[(String, TokenStream)],
    ctx: &GenerationContext<'_>,
) -> Result<(), Error> {
    fs::create_dir_all(out_dir)?;

    let mut mod_rs = String::from(HEADER);
    for (name, tokens) in modules {
        let source = render(tokens, ctx.config.skip_format)?;
        let path = out_dir.join(format!("{name}.rs"));
        fs::write(&path, format!("{HEADER}{source}"))?;
        tracing::debug!(path = %path.display(), "wrote module");
        mod_rs.push_str(&format!("pub mod {name};\n"));
    }

    if ctx.config.emit_aliases {
        let mut wrote_separator = false;
        for (name, module) in ctx.aliases() {
            if !wrote_separator {
                mod_rs.push('\n');
                wrote_separator = true;
            }
            mod_rs.push_str(&format!("pub use {module}::{name};\n"));
        }
        for name in ctx.suppressed_aliases() {
            tracing::warn!(
                name,
                "multiple entities share this name; global alias suppressed"
            );
        }
    }

    fs::write(out_dir.join("mod.rs"), mod_rs)?;
    Ok(())
}

fn render(tokens: &TokenStream, skip_format: bool) -> Result<String, Error> {
    if skip_format {
        return Ok(tokens.to_string());
    }
    let file = syn::parse2::<syn::File>(tokens.clone()).map_err(|e| Error::SynParse(e.to_string()))?;
    Ok(prettyplease::unparse(&file))
}
