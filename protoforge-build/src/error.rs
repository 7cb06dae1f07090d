//! Error types for protoforge-build.

use std::fmt;
use std::io;

/// Errors that can occur during schema validation and code generation.
#[derive(Debug)]
pub enum Error {
    /// IO error writing generated modules.
    Io(io::Error),
    /// No output directory configured and OUT_DIR unset.
    MissingOutDir,
    /// Two modules share a name.
    DuplicateModule { module: String },
    /// Two messages/enums in one module share a name.
    DuplicateTypeName { module: String, name: String },
    /// A field number appears twice within one message.
    DuplicateFieldNumber { message: String, number: u32 },
    /// A field number outside `1..=2^29-1`.
    FieldNumberOutOfRange {
        message: String,
        field: String,
        number: u32,
    },
    /// An enum with no members.
    EmptyEnum { enum_name: String },
    /// An enum without the mandatory zero member.
    MissingEnumZero { enum_name: String },
    /// Two enum members share a name or number.
    DuplicateEnumMember { enum_name: String, member: String },
    /// A oneof clause with no member fields.
    EmptyOneof { message: String, group: String },
    /// A oneof member that is repeated, optional, or a map.
    OneofFieldShape { message: String, field: String },
    /// A map field marked optional or repeated.
    MapFieldCardinality { message: String, field: String },
    /// A map whose value type is itself a map.
    NestedMap { message: String, field: String },
    /// A type reference that resolves to nothing in the compilation unit.
    UnresolvedTypeRef {
        referrer: String,
        module: String,
        name: String,
    },
    /// A type reference that resolves to the wrong kind of entity.
    TypeRefKind {
        referrer: String,
        module: String,
        name: String,
        expected: &'static str,
    },
    /// Generated tokens failed to parse back for formatting.
    SynParse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::MissingOutDir => {
                write!(f, "OUT_DIR not set. Run from build.rs or set out_dir().")
            }
            Self::DuplicateModule { module } => {
                write!(f, "duplicate module name: {module}")
            }
            Self::DuplicateTypeName { module, name } => {
                write!(f, "duplicate type name {name} in module {module}")
            }
            Self::DuplicateFieldNumber { message, number } => {
                write!(f, "field number {number} used twice in message {message}")
            }
            Self::FieldNumberOutOfRange {
                message,
                field,
                number,
            } => {
                write!(
                    f,
                    "field number {number} on {message}.{field} outside 1..=536870911"
                )
            }
            Self::EmptyEnum { enum_name } => {
                write!(f, "enum {enum_name} has no members")
            }
            Self::MissingEnumZero { enum_name } => {
                write!(f, "enum {enum_name} is missing the mandatory 0 member")
            }
            Self::DuplicateEnumMember { enum_name, member } => {
                write!(f, "enum {enum_name} declares member {member} twice")
            }
            Self::EmptyOneof { message, group } => {
                write!(f, "oneof {group} in message {message} has no fields")
            }
            Self::OneofFieldShape { message, field } => {
                write!(
                    f,
                    "oneof member {message}.{field} must be a singular non-map field"
                )
            }
            Self::MapFieldCardinality { message, field } => {
                write!(f, "map field {message}.{field} cannot be optional or repeated")
            }
            Self::NestedMap { message, field } => {
                write!(f, "map field {message}.{field} cannot have a map value type")
            }
            Self::UnresolvedTypeRef {
                referrer,
                module,
                name,
            } => {
                write!(f, "{referrer} references unknown type {module}.{name}")
            }
            Self::TypeRefKind {
                referrer,
                module,
                name,
                expected,
            } => {
                write!(
                    f,
                    "{referrer} references {module}.{name}, which is not {expected}"
                )
            }
            Self::SynParse(msg) => write!(f, "failed to parse generated code: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
