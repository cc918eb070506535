//! The notation-neutral tree and the event stream that builds it.

mod reflect;
mod sink;
mod value;

pub use sink::{EventSink, TreeSink};
pub use value::{Node, NodeMap, Number};
