use core::fmt;

use crate::Reflect;
use crate::reflection::{List, Map};

// -----------------------------------------------------------------------------
// ScalarRef

/// A borrowed scalar, the leaf of every marshalled value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(&'a str),
}

impl ScalarRef<'_> {
    /// Returns a short name of the scalar family, for error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::UInt(_) | Self::Float(_) => "number",
            Self::Char(_) | Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for ScalarRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => fmt::Display::fmt(value, f),
            Self::Int(value) => fmt::Display::fmt(value, f),
            Self::UInt(value) => fmt::Display::fmt(value, f),
            Self::Float(value) => fmt::Display::fmt(value, f),
            Self::Char(value) => fmt::Display::fmt(value, f),
            Self::Str(value) => f.write_str(value),
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable view of a value's shape.
pub enum ReflectRef<'a> {
    /// An empty nullable wrapper.
    Null,
    Scalar(ScalarRef<'a>),
    /// A unit enum variant, by declaration index.
    Enum(usize),
    /// Lists, sets and arrays.
    List(&'a dyn List),
    Map(&'a dyn Map),
    /// A record, read through the accessors of its `RecordInfo`.
    Record,
    /// A transparent wrapper: a filled `Option`, an `Arc`, a `Box<dyn Trait>`.
    Pointer(&'a dyn Reflect),
    Opaque,
}

impl ReflectRef<'_> {
    /// Returns a short name of the shape, for error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar(scalar) => scalar.kind_name(),
            Self::Enum(_) => "enum",
            Self::List(_) => "sequence",
            Self::Map(_) => "map",
            Self::Record => "record",
            Self::Pointer(_) => "pointer",
            Self::Opaque => "opaque",
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectMut

/// A mutable view of a container being filled.
pub enum ReflectMut<'a> {
    List(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Other,
}
