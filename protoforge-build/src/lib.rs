//! `protoforge-build` turns a parsed proto3 schema into generated Rust
//! modules for use with the `protoforge` runtime.
//!
//! The input is the [`schema::ModuleSet`] model (one [`schema::Module`] per
//! input schema file); a `.proto` front-end producing that model is an
//! external collaborator. For every message the generator emits a struct
//! whose parse loop dispatches on hard-coded field numbers and whose
//! serializer walks the field groups in declaration order, eliding
//! defaults. Enums become fieldless `#[repr(i32)]` enums, oneofs become
//! tagged sums sharing a single slot.
//!
//! # Example
//!
//! ```rust,no_run
//! use protoforge_build::schema::{Field, FieldType, Message, Module, ModuleSet};
//!
//! fn main() -> Result<(), protoforge_build::Error> {
//!     let set = ModuleSet::new().module(
//!         Module::new("telemetry").message(
//!             Message::new("Sample")
//!                 .field(Field::new("name", 1, FieldType::String))
//!                 .field(Field::new("value", 2, FieldType::Double)),
//!         ),
//!     );
//!     protoforge_build::Config::new()
//!         .out_dir("src/generated")
//!         .compile(&set)
//! }
//! ```
//!
//! The generated tree is included with `mod generated;` (the emitted
//! `mod.rs` declares each module and re-exports type names that are unique
//! across the whole set).

mod codegen;
mod config;
mod context;
mod error;
pub mod schema;

pub use config::Config;
pub use error::Error;

use schema::ModuleSet;

/// Compile `set` with default settings (output under `OUT_DIR`).
pub fn compile_modules(set: &ModuleSet) -> Result<(), Error> {
    Config::new().compile(set)
}
