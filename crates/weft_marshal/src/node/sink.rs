use crate::ScalarRef;
use crate::node::{Node, NodeMap};

// -----------------------------------------------------------------------------
// EventSink

/// The event stream a serialization session writes to.
///
/// Events are well nested: every `enter_map`/`enter_seq` is matched by one
/// `exit`, and inside a map every value is preceded by one `key`.
pub trait EventSink {
    fn null(&mut self);

    fn scalar(&mut self, value: ScalarRef<'_>);

    /// Opens a map, `len` is a hint.
    fn enter_map(&mut self, len: Option<usize>);

    fn key(&mut self, key: &str);

    /// Opens a sequence, `len` is a hint.
    fn enter_seq(&mut self, len: Option<usize>);

    /// Closes the innermost open map or sequence.
    fn exit(&mut self);

    /// Replays a whole tree as events.
    fn node(&mut self, node: &Node) {
        match node {
            Node::Null => self.null(),
            Node::Bool(value) => self.scalar(ScalarRef::Bool(*value)),
            Node::Number(number) => self.scalar(number.as_scalar()),
            Node::String(value) => self.scalar(ScalarRef::Str(value)),
            Node::Seq(items) => {
                self.enter_seq(Some(items.len()));
                for item in items {
                    self.node(item);
                }
                self.exit();
            }
            Node::Map(map) => {
                self.enter_map(Some(map.len()));
                for (key, value) in map.iter() {
                    self.key(key);
                    self.node(value);
                }
                self.exit();
            }
        }
    }
}

// -----------------------------------------------------------------------------
// TreeSink

enum Frame {
    Seq(Vec<Node>),
    Map { map: NodeMap, key: Option<String> },
}

/// An [`EventSink`] that builds a [`Node`].
///
/// ```
/// use weft_marshal::ScalarRef;
/// use weft_marshal::node::{EventSink, Node, TreeSink};
///
/// let mut sink = TreeSink::new();
/// sink.enter_map(None);
/// sink.key("a");
/// sink.scalar(ScalarRef::UInt(1));
/// sink.exit();
///
/// let node = sink.finish().unwrap();
/// assert_eq!(node.as_map().unwrap().get("a"), Some(&Node::from(1_u8)));
/// ```
#[derive(Default)]
pub struct TreeSink {
    stack: Vec<Frame>,
    root: Option<Node>,
}

impl TreeSink {
    #[inline]
    pub const fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
        }
    }

    /// Returns the finished tree, `None` if nothing complete was written.
    pub fn finish(self) -> Option<Node> {
        if self.stack.is_empty() { self.root } else { None }
    }

    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(Frame::Seq(items)) => items.push(node),
            Some(Frame::Map { map, key }) => {
                debug_assert!(key.is_some(), "map value without a key");
                map.insert(key.take().unwrap_or_default(), node);
            }
        }
    }
}

impl EventSink for TreeSink {
    #[inline]
    fn null(&mut self) {
        self.push(Node::Null);
    }

    #[inline]
    fn scalar(&mut self, value: ScalarRef<'_>) {
        self.push(Node::from(value));
    }

    fn enter_map(&mut self, len: Option<usize>) {
        self.stack.push(Frame::Map {
            map: NodeMap::with_capacity(len.unwrap_or_default()),
            key: None,
        });
    }

    fn key(&mut self, key: &str) {
        if let Some(Frame::Map { key: slot, .. }) = self.stack.last_mut() {
            *slot = Some(String::from(key));
        }
    }

    fn enter_seq(&mut self, len: Option<usize>) {
        self.stack
            .push(Frame::Seq(Vec::with_capacity(len.unwrap_or_default())));
    }

    fn exit(&mut self) {
        let node = match self.stack.pop() {
            Some(Frame::Seq(items)) => Node::Seq(items),
            Some(Frame::Map { map, .. }) => Node::Map(map),
            None => return,
        };
        self.push(node);
    }

    fn node(&mut self, node: &Node) {
        self.push(node.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::{EventSink, TreeSink};
    use crate::ScalarRef;
    use crate::node::Node;

    #[test]
    fn nested_events_build_a_tree() {
        let mut sink = TreeSink::new();
        sink.enter_seq(Some(2));
        sink.enter_map(None);
        sink.key("k");
        sink.null();
        sink.exit();
        sink.scalar(ScalarRef::Char('c'));
        sink.exit();

        let node = sink.finish().unwrap();
        let expected: Node = serde_json::from_str(r#"[{"k": null}, "c"]"#).unwrap();
        assert_eq!(node, expected);
    }

    #[test]
    fn unfinished_tree_is_none() {
        let mut sink = TreeSink::new();
        sink.enter_seq(None);
        assert!(sink.finish().is_none());
    }

    #[test]
    fn replay_round_trips() {
        let tree: Node = serde_json::from_str(r#"{"a": [1, -2, 3.5], "b": {"c": true}}"#).unwrap();
        let mut sink = TreeSink::new();
        EventSink::node(&mut sink, &tree);
        assert_eq!(sink.finish().unwrap(), tree);
    }
}
