use std::path::PathBuf;

use protoforge_build::schema::{
    Enum, Field, FieldType, MapKeyType, Message, Module, ModuleSet, TypeRef,
};

// A schema set leaning on the shapes that only show up in emitted code:
// self-recursive message fields (optional, singular, and through a oneof
// member, all of which get boxed), a cross-module reference, an enum slot,
// and a map.
fn schema() -> ModuleSet {
    ModuleSet::new()
        .module(
            Module::new("conformance")
                .enum_type(Enum::new("Mode").member("MODE_OFF", 0).member("MODE_ON", 1))
                .message(
                    Message::new("Tree")
                        .field(Field::new("value", 1, FieldType::Int32))
                        .field(
                            Field::new(
                                "left",
                                2,
                                FieldType::Message(TypeRef::new("conformance", "Tree")),
                            )
                            .optional(),
                        )
                        .field(Field::new(
                            "right",
                            3,
                            FieldType::Message(TypeRef::new("conformance", "Tree")),
                        ))
                        .field(Field::new("tags", 4, FieldType::Uint64).repeated())
                        .field(Field::new(
                            "mode",
                            5,
                            FieldType::Enum(TypeRef::new("conformance", "Mode")),
                        )),
                )
                .message(Message::new("Node").oneof(
                    "content",
                    vec![
                        Field::new("leaf", 1, FieldType::Int32),
                        Field::new(
                            "child",
                            2,
                            FieldType::Message(TypeRef::new("conformance", "Node")),
                        ),
                    ],
                )),
        )
        .module(
            Module::new("extras").message(
                Message::new("Wrapper")
                    .field(Field::new(
                        "tree",
                        1,
                        FieldType::Message(TypeRef::new("conformance", "Tree")),
                    ))
                    .field(Field::new(
                        "labels",
                        2,
                        FieldType::Map {
                            key: MapKeyType::String,
                            value: Box::new(FieldType::String),
                        },
                    )),
            ),
        )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or("OUT_DIR not set")?);
    protoforge_build::Config::new()
        .out_dir(out_dir.join("generated"))
        .compile(&schema())?;
    Ok(())
}
