//! Integration tests for protoforge-build: compile a module set into a temp
//! directory and check the emitted source. The emitted code itself is
//! compiled and exercised by the protoforge-conformance crate, whose build
//! script runs this generator over a recursive schema.

use std::fs;

use protoforge_build::schema::{
    Enum, Field, FieldType, MapKeyType, Message, Module, ModuleSet, TypeRef,
};
use protoforge_build::{Config, Error};
use tempfile::tempdir;

fn sample_set() -> ModuleSet {
    ModuleSet::new()
        .module(
            Module::new("test_module")
                .enum_type(Enum::new("MyEnum").member("VALUE0", 0).member("VALUE3", 3))
                .message(
                    Message::new("LongMessage")
                        .oneof(
                            "f_oneof",
                            vec![
                                Field::new(
                                    "f_enum",
                                    1,
                                    FieldType::Enum(TypeRef::new("test_module", "MyEnum")),
                                ),
                                Field::new("f_string", 2, FieldType::String),
                            ],
                        )
                        .field(Field::new("f_uint64", 3, FieldType::Uint64).repeated())
                        .field(Field::new("f_maybe_bytes", 4, FieldType::Bytes).optional())
                        .field(Field::new(
                            "f_map_str_float",
                            5,
                            FieldType::Map {
                                key: MapKeyType::String,
                                value: Box::new(FieldType::Float),
                            },
                        )),
                )
                .message(
                    Message::new("Tree")
                        .field(Field::new("value", 1, FieldType::Int32))
                        .field(
                            Field::new(
                                "left",
                                2,
                                FieldType::Message(TypeRef::new("test_module", "Tree")),
                            )
                            .optional(),
                        ),
                ),
        )
        .module(
            Module::new("other_module").message(Message::new("Wrapper").field(Field::new(
                "inner",
                1,
                FieldType::Message(TypeRef::new("test_module", "LongMessage")),
            ))),
        )
}

#[test]
fn test_compile_sample_set() {
    let out_dir = tempdir().expect("failed to create temp dir");

    Config::new()
        .out_dir(out_dir.path())
        .compile(&sample_set())
        .expect("failed to compile module set");

    let test_module = fs::read_to_string(out_dir.path().join("test_module.rs"))
        .expect("test_module.rs should be generated");

    // Enum with lookup pair and zero default.
    assert!(test_module.contains("pub enum MyEnum"));
    assert!(test_module.contains("Value0 = 0"));
    assert!(test_module.contains("Value3 = 3"));
    assert!(test_module.contains("pub fn from_i32"));
    assert!(test_module.contains("impl Default for MyEnum"));

    // Oneof becomes a tagged sum sharing one slot.
    assert!(test_module.contains("pub enum LongMessageFOneof"));
    assert!(test_module.contains("FEnum(MyEnum)"));
    assert!(test_module.contains("FString(String)"));
    assert!(test_module.contains("pub f_oneof: LongMessageFOneof"));

    // Slots per field shape.
    assert!(test_module.contains("pub f_uint64: Vec<u64>"));
    assert!(test_module.contains("pub f_maybe_bytes: Option<protoforge::bytes::Bytes>"));
    assert!(test_module
        .contains("pub f_map_str_float: std::collections::BTreeMap<String, f32>"));
    assert!(test_module.contains("pub unknown_fields: protoforge::UnknownFields"));

    // Parse dispatch on hard-coded field numbers, packed tolerance included.
    assert!(test_module.contains("impl protoforge::Message for LongMessage"));
    assert!(test_module.contains("match key.number()"));
    assert!(test_module.contains("protoforge::repeated::decode_packed"));
    assert!(test_module.contains("protoforge::map::decode_entry"));
    assert!(test_module.contains("protoforge::message::mismatched_field"));
    assert!(test_module.contains("in_field(\"f_oneof\", 1"));

    // Declaration-order serialize with default elision.
    assert!(test_module.contains("protoforge::repeated::encode_packed(3"));
    assert!(test_module.contains("is_default"));

    // Debug rendering carries the module-qualified name.
    assert!(test_module.contains("test_module.LongMessage("));

    // Recursive singular reference gets boxed.
    assert!(test_module.contains("pub left: Option<Box<Tree>>"));

    // serde bridging is on by default.
    assert!(test_module.contains("impl protoforge::serde::Serialize for LongMessage"));

    // Cross-module reference resolves through the sibling module.
    let other_module = fs::read_to_string(out_dir.path().join("other_module.rs"))
        .expect("other_module.rs should be generated");
    assert!(other_module.contains("pub inner: Option<super::test_module::LongMessage>"));

    // mod.rs declares both modules and aliases every unique name.
    let mod_rs =
        fs::read_to_string(out_dir.path().join("mod.rs")).expect("mod.rs should be generated");
    assert!(mod_rs.contains("pub mod test_module;"));
    assert!(mod_rs.contains("pub mod other_module;"));
    assert!(mod_rs.contains("pub use test_module::LongMessage;"));
    assert!(mod_rs.contains("pub use test_module::MyEnum;"));
    assert!(mod_rs.contains("pub use other_module::Wrapper;"));
}

#[test]
fn test_serde_emission_disabled() {
    let out_dir = tempdir().expect("failed to create temp dir");

    Config::new()
        .out_dir(out_dir.path())
        .emit_serde(false)
        .compile(&sample_set())
        .expect("failed to compile module set");

    let test_module = fs::read_to_string(out_dir.path().join("test_module.rs")).unwrap();
    assert!(!test_module.contains("serde"));
}

#[test]
fn test_alias_emission_disabled() {
    let out_dir = tempdir().expect("failed to create temp dir");

    Config::new()
        .out_dir(out_dir.path())
        .emit_aliases(false)
        .compile(&sample_set())
        .expect("failed to compile module set");

    let mod_rs = fs::read_to_string(out_dir.path().join("mod.rs")).unwrap();
    assert!(mod_rs.contains("pub mod test_module;"));
    assert!(!mod_rs.contains("pub use"));
}

#[test]
fn test_skip_format_still_emits() {
    let out_dir = tempdir().expect("failed to create temp dir");

    Config::new()
        .out_dir(out_dir.path())
        .skip_format()
        .compile(&sample_set())
        .expect("failed to compile module set");

    let test_module = fs::read_to_string(out_dir.path().join("test_module.rs")).unwrap();
    assert!(test_module.contains("pub struct LongMessage"));
}

#[test]
fn test_invalid_schema_reports_before_writing() {
    let out_dir = tempdir().expect("failed to create temp dir");

    let set = ModuleSet::new().module(
        Module::new("bad").enum_type(Enum::new("NoZero").member("ONE", 1)),
    );
    let error = Config::new()
        .out_dir(out_dir.path())
        .compile(&set)
        .unwrap_err();
    assert!(matches!(error, Error::MissingEnumZero { .. }));
    assert!(!out_dir.path().join("bad.rs").exists());
}

#[test]
fn test_duplicate_names_across_modules_suppress_alias() {
    let out_dir = tempdir().expect("failed to create temp dir");

    let set = ModuleSet::new()
        .module(Module::new("a").message(Message::new("Shared")))
        .module(Module::new("b").message(Message::new("Shared")));
    Config::new()
        .out_dir(out_dir.path())
        .compile(&set)
        .expect("failed to compile module set");

    let mod_rs = fs::read_to_string(out_dir.path().join("mod.rs")).unwrap();
    assert!(!mod_rs.contains("pub use"));
}
