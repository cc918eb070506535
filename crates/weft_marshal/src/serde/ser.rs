use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::node::{Node, NodeMap, Number};
use crate::serde::NodeError;

// -----------------------------------------------------------------------------
// Node as Serialize

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Number::PosInt(value) => serializer.serialize_u64(value),
            Number::NegInt(value) => serializer.serialize_i64(value),
            Number::Float(value) => serializer.serialize_f64(value),
        }
    }
}

impl Serialize for NodeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(value) => serializer.serialize_bool(*value),
            Node::Number(number) => number.serialize(serializer),
            Node::String(value) => serializer.serialize_str(value),
            Node::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Map(map) => map.serialize(serializer),
        }
    }
}

// -----------------------------------------------------------------------------
// NodeSerializer

/// A serde [`Serializer`] producing a [`Node`].
///
/// Enum variants follow the externally tagged convention: unit variants
/// become strings, other variants single-entry maps.
///
/// ```
/// use serde::Serialize;
/// use weft_marshal::node::Node;
/// use weft_marshal::serde::NodeSerializer;
///
/// let node = (1_u8, "two").serialize(NodeSerializer).unwrap();
/// assert_eq!(node, Node::Seq(vec![Node::from(1_u8), Node::from("two")]));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeSerializer;

impl Serializer for NodeSerializer {
    type Ok = Node;
    type Error = NodeError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = VariantBuilder<SeqBuilder>;
    type SerializeMap = MapBuilder;
    type SerializeStruct = MapBuilder;
    type SerializeStructVariant = VariantBuilder<MapBuilder>;

    fn serialize_bool(self, v: bool) -> Result<Node, NodeError> {
        Ok(Node::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node, NodeError> {
        Ok(Node::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Node, NodeError> {
        Ok(Node::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Node, NodeError> {
        Ok(Node::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Node, NodeError> {
        Ok(Node::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Node, NodeError> {
        Ok(Node::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Node, NodeError> {
        Ok(Node::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Node, NodeError> {
        Ok(Node::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Node, NodeError> {
        Ok(Node::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Node, NodeError> {
        Ok(Node::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Node, NodeError> {
        Ok(Node::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Node, NodeError> {
        Ok(Node::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node, NodeError> {
        Ok(Node::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node, NodeError> {
        Ok(Node::Seq(v.iter().map(|byte| Node::from(*byte)).collect()))
    }

    fn serialize_none(self) -> Result<Node, NodeError> {
        Ok(Node::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Node, NodeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node, NodeError> {
        Ok(Node::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node, NodeError> {
        Ok(Node::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node, NodeError> {
        Ok(Node::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Node, NodeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node, NodeError> {
        let mut map = NodeMap::with_capacity(1);
        map.insert(variant, value.serialize(self)?);
        Ok(Node::Map(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, NodeError> {
        Ok(SeqBuilder(Vec::with_capacity(len.unwrap_or_default())))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, NodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqBuilder, NodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder<SeqBuilder>, NodeError> {
        Ok(VariantBuilder {
            variant,
            inner: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder, NodeError> {
        Ok(MapBuilder {
            map: NodeMap::with_capacity(len.unwrap_or_default()),
            key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapBuilder, NodeError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder<MapBuilder>, NodeError> {
        Ok(VariantBuilder {
            variant,
            inner: self.serialize_map(Some(len))?,
        })
    }
}

// -----------------------------------------------------------------------------
// Builders

#[doc(hidden)]
pub struct SeqBuilder(Vec<Node>);

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Node;
    type Error = NodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NodeError> {
        self.0.push(value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Node, NodeError> {
        Ok(Node::Seq(self.0))
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Node;
    type Error = NodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NodeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node, NodeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Node;
    type Error = NodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NodeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node, NodeError> {
        ser::SerializeSeq::end(self)
    }
}

#[doc(hidden)]
pub struct MapBuilder {
    map: NodeMap,
    key: Option<String>,
}

/// Map keys must render as strings; numbers and booleans are stringified.
fn key_string(key: Node) -> Result<String, NodeError> {
    match key {
        Node::String(key) => Ok(key),
        Node::Number(number) => Ok(number.to_string()),
        Node::Bool(value) => Ok(value.to_string()),
        other => Err(NodeError::new(format!(
            "map key must be a scalar, found {}",
            other.kind_name()
        ))),
    }
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Node;
    type Error = NodeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), NodeError> {
        self.key = Some(key_string(key.serialize(NodeSerializer)?)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NodeError> {
        let key = self
            .key
            .take()
            .ok_or_else(|| NodeError::new("map value serialized before its key"))?;
        self.map.insert(key, value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Node, NodeError> {
        Ok(Node::Map(self.map))
    }
}

impl ser::SerializeStruct for MapBuilder {
    type Ok = Node;
    type Error = NodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), NodeError> {
        self.map.insert(key, value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Node, NodeError> {
        Ok(Node::Map(self.map))
    }
}

#[doc(hidden)]
pub struct VariantBuilder<B> {
    variant: &'static str,
    inner: B,
}

impl VariantBuilder<SeqBuilder> {
    fn finish(self) -> Node {
        let mut map = NodeMap::with_capacity(1);
        map.insert(self.variant, Node::Seq(self.inner.0));
        Node::Map(map)
    }
}

impl VariantBuilder<MapBuilder> {
    fn finish(self) -> Node {
        let mut map = NodeMap::with_capacity(1);
        map.insert(self.variant, Node::Map(self.inner.map));
        Node::Map(map)
    }
}

impl ser::SerializeTupleVariant for VariantBuilder<SeqBuilder> {
    type Ok = Node;
    type Error = NodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NodeError> {
        ser::SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> Result<Node, NodeError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for VariantBuilder<MapBuilder> {
    type Ok = Node;
    type Error = NodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), NodeError> {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Node, NodeError> {
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::NodeSerializer;
    use crate::node::Node;
    use alloc::collections::BTreeMap;
    use serde::Serialize;

    #[derive(Serialize)]
    enum Event {
        Start,
        Move { x: i32 },
        Pair(u8, u8),
    }

    #[test]
    fn enums_are_externally_tagged() {
        let nodes = [Event::Start, Event::Move { x: -1 }, Event::Pair(1, 2)]
            .serialize(NodeSerializer)
            .unwrap();
        let expected: Node =
            serde_json::from_str(r#"["Start", {"Move": {"x": -1}}, {"Pair": [1, 2]}]"#).unwrap();
        assert_eq!(nodes, expected);
    }

    #[test]
    fn numeric_map_keys_become_strings() {
        let map = BTreeMap::from([(1_u8, "a"), (2_u8, "b")]);
        let node = map.serialize(NodeSerializer).unwrap();
        assert_eq!(node.as_map().unwrap().keys().collect::<Vec<_>>(), ["1", "2"]);
    }

    #[test]
    fn node_renders_through_serde_json() {
        let node: Node = serde_json::from_str(r#"{"b": 1, "a": [null, 2.5, "x"]}"#).unwrap();
        assert_eq!(
            serde_json::to_string(&node).unwrap(),
            r#"{"b":1,"a":[null,2.5,"x"]}"#
        );
    }
}
