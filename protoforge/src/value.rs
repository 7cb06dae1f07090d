//! Generic projection of message contents.
//!
//! [`Message::to_value`](crate::message::Message::to_value) unwraps a message
//! into this tree: scalars pass through, enum members keep their declared
//! name and number, lists and maps preserve structure, and sub-messages
//! recurse. Map keys are themselves values because proto3 permits integral
//! and bool keys.

use bytes::Bytes;

use crate::codec::{Fixed32, Fixed64, Sfixed32, Sfixed64, Sint32, Sint64};

/// A dynamically-typed view of one field slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An absent optional group.
    None,
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Bytes),
    /// An enum member, by declared name and number.
    Enum {
        name: &'static str,
        number: i32,
    },
    List(Vec<Value>),
    /// Map entries in the map's iteration order.
    Map(Vec<(Value, Value)>),
    /// A nested message: one entry per field group, in declaration order.
    Message(Vec<(&'static str, Value)>),
}

macro_rules! value_from {
    ($($variant:ident($ty:ty)),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Bytes)
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<Sint32> for Value {
    fn from(value: Sint32) -> Self {
        Value::I32(value.0)
    }
}

impl From<Sint64> for Value {
    fn from(value: Sint64) -> Self {
        Value::I64(value.0)
    }
}

impl From<Fixed32> for Value {
    fn from(value: Fixed32) -> Self {
        Value::U32(value.0)
    }
}

impl From<Fixed64> for Value {
    fn from(value: Fixed64) -> Self {
        Value::U64(value.0)
    }
}

impl From<Sfixed32> for Value {
    fn from(value: Sfixed32) -> Self {
        Value::I32(value.0)
    }
}

impl From<Sfixed64> for Value {
    fn from(value: Sfixed64) -> Self {
        Value::I64(value.0)
    }
}

impl Value {
    /// Look up a group by name on a [`Value::Message`].
    pub fn get(&self, group: &str) -> Option<&Value> {
        match self {
            Value::Message(groups) => groups
                .iter()
                .find(|(name, _)| *name == group)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}
