use crate::impls::NonGenericTypeInfoCell;
use crate::info::{DynamicInfo, TypeInfo, Typed};
use crate::node::{Node, NodeMap};
use crate::{Map, Reflect, ReflectMut, ReflectRef, ScalarRef};

fn node_from_node(node: &Node) -> Box<dyn Reflect> {
    Box::new(node.clone())
}

impl Typed for Node {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Dynamic(DynamicInfo::new::<Self>(node_from_node)))
    }
}

impl Reflect for Node {
    fn reflect_ref(&self) -> ReflectRef<'_> {
        match self {
            Node::Null => ReflectRef::Null,
            Node::Bool(value) => ReflectRef::Scalar(ScalarRef::Bool(*value)),
            Node::Number(number) => ReflectRef::Scalar(number.as_scalar()),
            Node::String(value) => ReflectRef::Scalar(ScalarRef::Str(value)),
            Node::Seq(items) => ReflectRef::List(items),
            Node::Map(map) => ReflectRef::Map(map),
        }
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        match self {
            Node::Seq(items) => ReflectMut::List(items),
            Node::Map(map) => ReflectMut::Map(map),
            _ => ReflectMut::Other,
        }
    }

    fn reflect_debug(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

impl Map for NodeMap {
    #[inline]
    fn len(&self) -> usize {
        NodeMap::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(
            self.entries()
                .iter()
                .map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect)),
        )
    }

    fn insert(
        &mut self,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)> {
        if !key.is::<String>() || !value.is::<Node>() {
            return Err((key, value));
        }
        match (key.take::<String>(), value.take::<Node>()) {
            (Ok(key), Ok(value)) => {
                NodeMap::insert(self, key, value);
                Ok(())
            }
            _ => unreachable!("entry types were checked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::info::{ReflectKind, Typed};
    use crate::node::Node;
    use crate::{Reflect, ReflectRef, ScalarRef};

    #[test]
    fn node_reports_its_own_shape() {
        assert_eq!(Node::type_info().kind(), ReflectKind::Dynamic);

        let tree: Node = serde_json::from_str(r#"{"a": [1, "x"]}"#).unwrap();
        let ReflectRef::Map(map) = tree.reflect_ref() else {
            panic!("expected a map");
        };
        let (key, value) = map.iter().next().unwrap();
        assert_eq!(key.downcast_ref::<String>().unwrap(), "a");
        let ReflectRef::List(items) = value.reflect_ref() else {
            panic!("expected a list");
        };
        let second = items.iter().nth(1).unwrap();
        assert!(matches!(second.reflect_ref(), ReflectRef::Scalar(ScalarRef::Str("x"))));
    }

    #[test]
    fn dynamic_info_clones_the_tree() {
        let tree = Node::from("leaf");
        let info = Node::type_info().as_dynamic().unwrap();
        let value = info.from_node(&tree);
        assert_eq!(value.take::<Node>().unwrap(), tree);
    }
}
