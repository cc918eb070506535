use core::cmp::Ordering;
use core::fmt;

use crate::ScalarRef;

// -----------------------------------------------------------------------------
// Number

/// A numeric scalar.
///
/// Non-negative integers are always stored as `PosInt`, so two equal integers
/// compare equal however they were produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    PosInt(u64),
    /// Always negative.
    NegInt(i64),
    Float(f64),
}

impl Number {
    #[inline]
    pub const fn from_i64(value: i64) -> Self {
        if value < 0 {
            Self::NegInt(value)
        } else {
            Self::PosInt(value as u64)
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::PosInt(value) => i64::try_from(value).ok(),
            Self::NegInt(value) => Some(value),
            Self::Float(_) => None,
        }
    }

    pub const fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::PosInt(value) => Some(value),
            _ => None,
        }
    }

    pub const fn as_f64(&self) -> f64 {
        match *self {
            Self::PosInt(value) => value as f64,
            Self::NegInt(value) => value as f64,
            Self::Float(value) => value,
        }
    }

    #[inline]
    pub const fn is_f64(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// Returns the number as a borrowed scalar.
    pub const fn as_scalar(&self) -> ScalarRef<'static> {
        match *self {
            Self::PosInt(value) => ScalarRef::UInt(value),
            Self::NegInt(value) => ScalarRef::Int(value),
            Self::Float(value) => ScalarRef::Float(value),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PosInt(value) => fmt::Display::fmt(value, f),
            Self::NegInt(value) => fmt::Display::fmt(value, f),
            Self::Float(value) => fmt::Display::fmt(value, f),
        }
    }
}

macro_rules! impl_from_number {
    ($($ty:ty => |$v:ident| $expr:expr),* $(,)?) => {$(
        impl From<$ty> for Number {
            #[inline]
            fn from($v: $ty) -> Self {
                $expr
            }
        }
    )*};
}

impl_from_number!(
    u8 => |v| Self::PosInt(u64::from(v)),
    u16 => |v| Self::PosInt(u64::from(v)),
    u32 => |v| Self::PosInt(u64::from(v)),
    u64 => |v| Self::PosInt(v),
    i8 => |v| Self::from_i64(i64::from(v)),
    i16 => |v| Self::from_i64(i64::from(v)),
    i32 => |v| Self::from_i64(i64::from(v)),
    i64 => |v| Self::from_i64(v),
    f32 => |v| Self::Float(f64::from(v)),
    f64 => |v| Self::Float(v),
);

// -----------------------------------------------------------------------------
// NodeMap

/// An insertion-ordered string-keyed map.
///
/// Keys are unique: inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeMap {
    entries: Vec<(String, Node)>,
}

impl NodeMap {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts an entry, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) -> Option<Node> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Removes an entry, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&String, &Node)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub(crate) fn entries(&self) -> &[(String, Node)] {
        &self.entries
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for NodeMap {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        let mut map = NodeMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for NodeMap {
    type Item = (String, Node);
    type IntoIter = alloc::vec::IntoIter<(String, Node)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// -----------------------------------------------------------------------------
// Node

/// The notation-neutral tree every value is marshalled into and out of.
///
/// Concrete notations are front ends: they render a `Node` (or drive an
/// [`EventSink`]) on the way out and produce a `Node` on the way in.
///
/// [`EventSink`]: crate::node::EventSink
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Seq(Vec<Node>),
    Map(NodeMap),
}

impl Node {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(number) => number.as_i64(),
            _ => None,
        }
    }

    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(number) => number.as_u64(),
            _ => None,
        }
    }

    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(number.as_f64()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Node]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub const fn as_map(&self) -> Option<&NodeMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the scalar view of a leaf node.
    pub fn as_scalar(&self) -> Option<ScalarRef<'_>> {
        match self {
            Self::Bool(value) => Some(ScalarRef::Bool(*value)),
            Self::Number(number) => Some(number.as_scalar()),
            Self::String(value) => Some(ScalarRef::Str(value)),
            _ => None,
        }
    }

    /// Returns a short name of the node kind, for error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "map",
        }
    }

    /// Total order used when sorting collections.
    ///
    /// Kinds order as null, boolean, number, string, sequence, map; values of
    /// one kind compare naturally, containers lexicographically.
    pub fn total_cmp(&self, other: &Node) -> Ordering {
        fn rank(node: &Node) -> u8 {
            match node {
                Node::Null => 0,
                Node::Bool(_) => 1,
                Node::Number(_) => 2,
                Node::String(_) => 3,
                Node::Seq(_) => 4,
                Node::Map(_) => 5,
            }
        }

        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => match (a, b) {
                (Number::PosInt(a), Number::PosInt(b)) => a.cmp(b),
                (Number::NegInt(a), Number::NegInt(b)) => a.cmp(b),
                _ => a.as_f64().total_cmp(&b.as_f64()),
            },
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Seq(a), Self::Seq(b)) => a
                .iter()
                .zip(b)
                .map(|(a, b)| a.total_cmp(b))
                .find(|ord| ord.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (Self::Map(a), Self::Map(b)) => a
                .iter()
                .zip(b.iter())
                .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| va.total_cmp(vb)))
                .find(|ord| ord.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl From<bool> for Node {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Number> for Node {
    #[inline]
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Node {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(String::from(value))
    }
}

impl From<String> for Node {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Node>> for Node {
    #[inline]
    fn from(value: Vec<Node>) -> Self {
        Self::Seq(value)
    }
}

impl From<NodeMap> for Node {
    #[inline]
    fn from(value: NodeMap) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

macro_rules! impl_node_from_number {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Node {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::Number(Number::from(value))
            }
        }
    )*};
}

impl_node_from_number!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl From<ScalarRef<'_>> for Node {
    fn from(scalar: ScalarRef<'_>) -> Self {
        match scalar {
            ScalarRef::Bool(value) => Self::Bool(value),
            ScalarRef::Int(value) => Self::Number(Number::from_i64(value)),
            ScalarRef::UInt(value) => Self::Number(Number::PosInt(value)),
            ScalarRef::Float(value) => Self::Number(Number::Float(value)),
            ScalarRef::Char(value) => Self::String(value.to_string()),
            ScalarRef::Str(value) => Self::String(String::from(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Node, NodeMap, Number};
    use core::cmp::Ordering;

    #[test]
    fn integers_normalize_sign() {
        assert_eq!(Number::from(5_i32), Number::PosInt(5));
        assert_eq!(Number::from(-5_i32), Number::NegInt(-5));
        assert_eq!(Node::from(5_u8), Node::from(5_i64));
        assert_eq!(Node::from(-1_i8).as_i64(), Some(-1));
        assert_eq!(Node::from(u64::MAX).as_i64(), None);
    }

    #[test]
    fn map_insert_replaces_in_place() {
        let mut map = NodeMap::new();
        map.insert("a", Node::from(1_u8));
        map.insert("b", Node::from(2_u8));
        assert_eq!(map.insert("a", Node::from(3_u8)), Some(Node::from(1_u8)));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(map.remove("a"), Some(Node::from(3_u8)));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn total_order_ranks_kinds_first() {
        let mut nodes = vec![
            Node::from("b"),
            Node::from(2_u8),
            Node::Null,
            Node::from(-1_i8),
            Node::from("a"),
            Node::from(true),
        ];
        nodes.sort_by(Node::total_cmp);
        assert_eq!(
            nodes,
            [
                Node::Null,
                Node::from(true),
                Node::from(-1_i8),
                Node::from(2_u8),
                Node::from("a"),
                Node::from("b"),
            ]
        );
        assert_eq!(
            Node::Seq(vec![Node::from(1_u8)]).total_cmp(&Node::Seq(vec![Node::from(1_u8), Node::Null])),
            Ordering::Less
        );
    }
}
