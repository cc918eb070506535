use core::fmt;

use serde::de::value::{MapDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{self, DeserializeSeed, Deserializer, EnumAccess, IntoDeserializer};
use serde::de::{MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::{Deserialize, forward_to_deserialize_any};

use crate::node::{Node, NodeMap, Number};
use crate::serde::NodeError;

// -----------------------------------------------------------------------------
// Node as Deserialize

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any notation value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_char<E>(self, v: char) -> Result<Node, E> {
        Ok(Node::String(v.to_string()))
    }

    fn visit_str<E>(self, v: &str) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_string<E>(self, v: String) -> Result<Node, E> {
        Ok(Node::String(v))
    }

    fn visit_none<E>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_unit<E>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(item) = seq.next_element::<Node>()? {
            items.push(item);
        }
        Ok(Node::Seq(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Node, A::Error> {
        let mut map = NodeMap::with_capacity(access.size_hint().unwrap_or_default());
        while let Some((key, value)) = access.next_entry::<String, Node>()? {
            map.insert(key, value);
        }
        Ok(Node::Map(map))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

// -----------------------------------------------------------------------------
// Node as Deserializer

impl<'de> IntoDeserializer<'de, NodeError> for Node {
    type Deserializer = Node;

    #[inline]
    fn into_deserializer(self) -> Node {
        self
    }
}

/// A `Node` deserializes any serde type whose data model matches the tree.
///
/// Unit enum variants are read from strings, other variants from
/// single-entry maps.
///
/// ```
/// use serde::Deserialize;
/// use weft_marshal::node::Node;
///
/// let node: Node = serde_json::from_str(r#"[1, 2, 3]"#).unwrap();
/// let values = Vec::<u8>::deserialize(node).unwrap();
/// assert_eq!(values, [1, 2, 3]);
/// ```
impl<'de> Deserializer<'de> for Node {
    type Error = NodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, NodeError> {
        match self {
            Node::Null => visitor.visit_unit(),
            Node::Bool(value) => visitor.visit_bool(value),
            Node::Number(Number::PosInt(value)) => visitor.visit_u64(value),
            Node::Number(Number::NegInt(value)) => visitor.visit_i64(value),
            Node::Number(Number::Float(value)) => visitor.visit_f64(value),
            Node::String(value) => visitor.visit_string(value),
            Node::Seq(items) => {
                let mut seq = SeqDeserializer::new(items.into_iter());
                let value = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(value)
            }
            Node::Map(map) => {
                let mut access = MapDeserializer::new(map.into_iter());
                let value = visitor.visit_map(&mut access)?;
                access.end()?;
                Ok(value)
            }
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, NodeError> {
        match self {
            Node::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, NodeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, NodeError> {
        match self {
            Node::String(variant) => {
                let variant: StringDeserializer<NodeError> = variant.into_deserializer();
                visitor.visit_enum(variant)
            }
            Node::Map(map) if map.len() == 1 => {
                let mut entries = map.into_iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumNode { variant, value }),
                    None => Err(NodeError::new("empty enum map")),
                }
            }
            other => Err(de::Error::invalid_type(unexpected(&other), &"enum variant")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

fn unexpected(node: &Node) -> de::Unexpected<'_> {
    match node {
        Node::Null => de::Unexpected::Unit,
        Node::Bool(value) => de::Unexpected::Bool(*value),
        Node::Number(Number::PosInt(value)) => de::Unexpected::Unsigned(*value),
        Node::Number(Number::NegInt(value)) => de::Unexpected::Signed(*value),
        Node::Number(Number::Float(value)) => de::Unexpected::Float(*value),
        Node::String(value) => de::Unexpected::Str(value),
        Node::Seq(_) => de::Unexpected::Seq,
        Node::Map(_) => de::Unexpected::Map,
    }
}

// -----------------------------------------------------------------------------
// Enum access

struct EnumNode {
    variant: String,
    value: Node,
}

impl<'de> EnumAccess<'de> for EnumNode {
    type Error = NodeError;
    type Variant = VariantNode;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, VariantNode), NodeError> {
        let variant: StringDeserializer<NodeError> = self.variant.into_deserializer();
        let variant = seed.deserialize(variant)?;
        Ok((variant, VariantNode(self.value)))
    }
}

struct VariantNode(Node);

impl<'de> VariantAccess<'de> for VariantNode {
    type Error = NodeError;

    fn unit_variant(self) -> Result<(), NodeError> {
        match self.0 {
            Node::Null => Ok(()),
            other => Err(de::Error::invalid_type(unexpected(&other), &"unit variant")),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, NodeError> {
        seed.deserialize(self.0)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, NodeError> {
        self.0.deserialize_seq(visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, NodeError> {
        self.0.deserialize_map(visitor)
    }
}

#[cfg(test)]
mod tests {
    use crate::node::Node;
    use alloc::collections::BTreeMap;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    enum Event {
        Start,
        Move { x: i32 },
        Pair(u8, u8),
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Settings {
        name: String,
        level: Option<u8>,
        tags: Vec<String>,
    }

    #[test]
    fn structs_and_options_from_json_tree() {
        let node: Node =
            serde_json::from_str(r#"{"name": "x", "level": null, "tags": ["a"]}"#).unwrap();
        let settings = Settings::deserialize(node).unwrap();
        assert_eq!(
            settings,
            Settings {
                name: "x".into(),
                level: None,
                tags: vec!["a".into()],
            }
        );
    }

    #[test]
    fn externally_tagged_enums() {
        let node: Node =
            serde_json::from_str(r#"["Start", {"Move": {"x": -1}}, {"Pair": [1, 2]}]"#).unwrap();
        let events = Vec::<Event>::deserialize(node).unwrap();
        assert_eq!(events, [Event::Start, Event::Move { x: -1 }, Event::Pair(1, 2)]);
    }

    #[test]
    fn wrong_shape_is_an_error() {
        let node = Node::from(true);
        assert!(Vec::<u8>::deserialize(node.clone()).is_err());
        assert!(Event::deserialize(node).is_err());
    }

    #[test]
    fn ron_front_end_produces_the_same_tree() {
        let from_ron: Node = ron::from_str(r#"{"b": [1, 2], "a": "x"}"#).unwrap();
        let from_json: Node = serde_json::from_str(r#"{"b": [1, 2], "a": "x"}"#).unwrap();
        assert_eq!(from_ron, from_json);

        let map = BTreeMap::<String, Vec<u8>>::deserialize(from_ron).unwrap();
        assert_eq!(map["b"], [1, 2]);
    }
}
