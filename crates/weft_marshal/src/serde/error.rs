use core::fmt::Display;

use thiserror::Error;

/// Error raised while converting between a [`Node`] and serde data.
///
/// [`Node`]: crate::node::Node
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct NodeError(String);

impl NodeError {
    #[inline]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl serde::ser::Error for NodeError {
    fn custom<T: Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

impl serde::de::Error for NodeError {
    fn custom<T: Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}
