//! Configuration for code generation.

use std::path::{Path, PathBuf};

use crate::schema::ModuleSet;

/// Configuration for code generation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Output directory for generated files.
    pub(crate) out_dir: Option<PathBuf>,

    /// Disable formatting with prettyplease.
    pub(crate) skip_format: bool,

    /// Emit serde `Serialize`/`Deserialize` impls that round-trip through
    /// the wire encoding. Requires the runtime's `serde` feature.
    pub(crate) emit_serde: bool,

    /// Re-export unqualified aliases from `mod.rs` for type names unique
    /// across the whole module set.
    pub(crate) emit_aliases: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: None,
            skip_format: false,
            emit_serde: true,
            emit_aliases: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory for generated Rust files. Defaults to the
    /// `OUT_DIR` environment variable.
    pub fn out_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.out_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Skip formatting the generated code with prettyplease.
    pub fn skip_format(&mut self) -> &mut Self {
        self.skip_format = true;
        self
    }

    /// Control emission of serde impls on generated messages.
    pub fn emit_serde(&mut self, emit: bool) -> &mut Self {
        self.emit_serde = emit;
        self
    }

    /// Control emission of unqualified aliases in the generated `mod.rs`.
    pub fn emit_aliases(&mut self, emit: bool) -> &mut Self {
        self.emit_aliases = emit;
        self
    }

    /// Validate `set` and generate one Rust module per schema module, plus a
    /// `mod.rs` tying them together.
    pub fn compile(&self, set: &ModuleSet) -> Result<(), crate::Error> {
        crate::codegen::compile(self, set)
    }
}
