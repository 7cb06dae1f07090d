use std::fmt;

use crate::wire::WireType;

/// The cause of a decode failure, independent of where in the message it
/// happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    InvalidWireType { value: u8 },
    FieldNumberOutOfRange { value: u64 },
    VarintTooLong,
    UnexpectedEndOfBuffer,
    DeprecatedGroupEncoding,
    LengthOverflow { value: u64 },
    IntegerOverflow { target_type: &'static str },
    InvalidUtf8,
    UnknownEnumValue { enum_name: &'static str, value: i32 },
    WireTypeMismatch { expected: WireType, actual: WireType },
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::InvalidWireType { value } => {
                write!(f, "invalid 'wire type' value: {value}")
            }
            DecodeErrorKind::FieldNumberOutOfRange { value } => {
                write!(f, "field number {value} out of range")
            }
            DecodeErrorKind::VarintTooLong => {
                write!(f, "varint has more than 10 7-bit digits")
            }
            DecodeErrorKind::UnexpectedEndOfBuffer => {
                write!(f, "unexpected end of buffer")
            }
            DecodeErrorKind::DeprecatedGroupEncoding => {
                write!(f, "deprecated group encoding not supported")
            }
            DecodeErrorKind::LengthOverflow { value } => {
                write!(f, "length prefix {value} exceeds platform addressable memory")
            }
            DecodeErrorKind::IntegerOverflow { target_type } => {
                write!(f, "integer overflow: value does not fit in {target_type}")
            }
            DecodeErrorKind::InvalidUtf8 => {
                write!(f, "invalid UTF-8 in string field")
            }
            DecodeErrorKind::UnknownEnumValue { enum_name, value } => {
                write!(f, "unknown value {value} for enum {enum_name}")
            }
            DecodeErrorKind::WireTypeMismatch { expected, actual } => {
                write!(f, "incorrect wire type: expected {expected:?}, got {actual:?}")
            }
        }
    }
}

/// One frame of parse context, recorded as a failure propagates out of the
/// parse stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextFrame {
    /// A known field, identified by its group name and field number, with the
    /// byte offset at the point of failure.
    Field {
        group: &'static str,
        number: u32,
        offset: usize,
    },
    /// An unrecognized field, identified only by offset.
    Unknown { offset: usize },
    /// An element of a repeated field.
    Index { index: usize },
}

impl fmt::Display for ContextFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextFrame::Field {
                group,
                number,
                offset,
            } => write!(f, "(Field:{group}#{number}+0x{offset:X})"),
            ContextFrame::Unknown { offset } => write!(f, "(at 0x{offset:X})"),
            ContextFrame::Index { index } => write!(f, "(Index:{index})"),
        }
    }
}

/// A decode failure together with the chain of context frames describing
/// where in the message it occurred.
///
/// Frames are pushed innermost-first as the error bubbles out of nested
/// parses; [`fmt::Display`] renders them outermost-first, so an error inside
/// a submessage reads
/// `(Field:outer#5+0x10) (Field:inner#1+0x2) unexpected end of buffer`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    frames: Vec<ContextFrame>,
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    pub fn frames(&self) -> &[ContextFrame] {
        &self.frames
    }

    /// Record that this error happened while parsing the named field group.
    #[must_use]
    pub fn in_field(mut self, group: &'static str, number: u32, offset: usize) -> Self {
        self.frames.push(ContextFrame::Field {
            group,
            number,
            offset,
        });
        self
    }

    /// Record that this error happened while handling an unrecognized field.
    #[must_use]
    pub fn in_unknown_field(mut self, offset: usize) -> Self {
        self.frames.push(ContextFrame::Unknown { offset });
        self
    }

    /// Record that this error happened at element `index` of a repeated
    /// field.
    #[must_use]
    pub fn at_index(mut self, index: usize) -> Self {
        self.frames.push(ContextFrame::Index { index });
        self
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        DecodeError {
            kind,
            frames: Vec::new(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.frames.iter().rev() {
            write!(f, "{frame} ")?;
        }
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for DecodeError {}
