//! The parsed schema model consumed by code generation.
//!
//! A `.proto` front-end (an external collaborator) produces this model;
//! build scripts and tests can also assemble it directly through the builder
//! methods. One [`Module`] corresponds to one input schema file and becomes
//! one generated Rust module.

/// Data type of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Float,
    Double,
    Int32,
    Uint32,
    Sint32,
    Int64,
    Uint64,
    Sint64,
    Fixed32,
    Sfixed32,
    Fixed64,
    Sfixed64,
    Bool,
    String,
    Bytes,
    /// A reference to an enum declared somewhere in the compilation unit.
    Enum(TypeRef),
    /// A reference to a message declared somewhere in the compilation unit.
    Message(TypeRef),
    /// A map field; wire-equivalent to a repeated two-field entry message.
    Map {
        key: MapKeyType,
        value: Box<FieldType>,
    },
}

impl FieldType {
    /// Packed framing is permitted for everything except the `Len`-framed
    /// types.
    pub fn is_packable(&self) -> bool {
        !matches!(
            self,
            FieldType::String | FieldType::Bytes | FieldType::Message(_) | FieldType::Map { .. }
        )
    }
}

/// Legal map key types: integral types, bool, and string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKeyType {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
}

/// A reference to a message or enum by module and name.
///
/// Cross-module references resolve within the compilation unit;
/// cross-compilation-unit references are not supported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub module: String,
    pub name: String,
}

impl TypeRef {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef {
            module: module.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Singular,
    Optional,
    Repeated,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub number: u32,
    pub ty: FieldType,
    pub cardinality: Cardinality,
}

impl Field {
    pub fn new(name: impl Into<String>, number: u32, ty: FieldType) -> Self {
        Field {
            name: name.into(),
            number,
            ty,
            cardinality: Cardinality::Singular,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.cardinality = Cardinality::Optional;
        self
    }

    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }
}

/// The unit of host exposure: either one plain field or one whole oneof
/// clause sharing a single slot.
#[derive(Debug, Clone)]
pub enum FieldGroup {
    Single(Field),
    Oneof {
        name: String,
        /// Optional groups get an `Option` slot with a `None` default;
        /// otherwise the slot defaults to the first member at its default.
        optional: bool,
        fields: Vec<Field>,
    },
}

impl FieldGroup {
    pub fn name(&self) -> &str {
        match self {
            FieldGroup::Single(field) => &field.name,
            FieldGroup::Oneof { name, .. } => name,
        }
    }

    pub fn fields(&self) -> &[Field] {
        match self {
            FieldGroup::Single(field) => std::slice::from_ref(field),
            FieldGroup::Oneof { fields, .. } => fields,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub name: String,
    /// Field groups in declaration order, which is also serialization order.
    pub groups: Vec<FieldGroup>,
}

impl Message {
    pub fn new(name: impl Into<String>) -> Self {
        Message {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.groups.push(FieldGroup::Single(field));
        self
    }

    #[must_use]
    pub fn oneof(mut self, name: impl Into<String>, fields: Vec<Field>) -> Self {
        self.groups.push(FieldGroup::Oneof {
            name: name.into(),
            optional: false,
            fields,
        });
        self
    }

    #[must_use]
    pub fn optional_oneof(mut self, name: impl Into<String>, fields: Vec<Field>) -> Self {
        self.groups.push(FieldGroup::Oneof {
            name: name.into(),
            optional: true,
            fields,
        });
        self
    }
}

#[derive(Debug, Clone)]
pub struct Enum {
    pub name: String,
    pub members: Vec<(String, i32)>,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Enum {
            name: name.into(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn member(mut self, name: impl Into<String>, number: i32) -> Self {
        self.members.push((name.into(), number));
        self
    }
}

/// One input schema file: a namespace of enums and messages.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub enums: Vec<Enum>,
    pub messages: Vec<Message>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            enums: Vec::new(),
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn enum_type(mut self, enum_type: Enum) -> Self {
        self.enums.push(enum_type);
        self
    }

    #[must_use]
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// A whole compilation unit.
#[derive(Debug, Clone, Default)]
pub struct ModuleSet {
    pub modules: Vec<Module>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }
}
