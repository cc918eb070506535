use core::fmt;

use thiserror::Error;

use crate::registry::ConfigurationError;
use crate::session::TraversalPath;
use crate::transform::TransformError;

// -----------------------------------------------------------------------------
// SessionErrorKind

/// What went wrong in a session.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SessionErrorKind {
    #[error("value of type `{ty}` refers back to itself")]
    Recursion { ty: &'static str },

    #[error("unknown discriminator `{token}` for `{declared}`")]
    UnknownDiscriminator { token: String, declared: &'static str },

    #[error("no discriminator and no implementation for abstract type `{declared}`")]
    MissingDiscriminator { declared: &'static str },

    #[error("`{record}` has no writable property `{name}`")]
    UnknownProperty { record: &'static str, name: String },

    #[error("nesting exceeds the maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },

    #[error("`{ty}` has no transform and cannot be parsed")]
    UnsupportedRestore { ty: &'static str },

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: &'static str },

    #[error("expected {expected} items, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("`{ty}` has no default constructor")]
    NoConstructor { ty: &'static str },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

// -----------------------------------------------------------------------------
// SessionError

/// A failed serialization or parse, with the place it failed at.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionError {
    kind: SessionErrorKind,
    path: TraversalPath,
    #[cfg(all(debug_assertions, feature = "debug"))]
    type_stack: Vec<&'static str>,
}

impl SessionError {
    pub(crate) fn new(kind: SessionErrorKind, path: &TraversalPath) -> Self {
        Self {
            kind,
            path: path.clone(),
            #[cfg(all(debug_assertions, feature = "debug"))]
            type_stack: Vec::new(),
        }
    }

    #[cfg_attr(not(all(debug_assertions, feature = "debug")), inline(always))]
    pub(crate) fn with_type_stack(self, _stack: &[&'static str]) -> Self {
        #[cfg(all(debug_assertions, feature = "debug"))]
        {
            let mut this = self;
            this.type_stack = _stack.to_vec();
            this
        }
        #[cfg(not(all(debug_assertions, feature = "debug")))]
        {
            self
        }
    }

    #[inline]
    pub fn kind(&self) -> &SessionErrorKind {
        &self.kind
    }

    #[inline]
    pub fn path(&self) -> &TraversalPath {
        &self.path
    }

    #[inline]
    pub fn into_kind(self) -> SessionErrorKind {
        self.kind
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.path)?;
        #[cfg(all(debug_assertions, feature = "debug"))]
        if !self.type_stack.is_empty() {
            write!(f, " (in {})", self.type_stack.join(" > "))?;
        }
        Ok(())
    }
}

impl core::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.kind {
            SessionErrorKind::Transform(err) => Some(err),
            SessionErrorKind::Configuration(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionError, SessionErrorKind};
    use crate::session::TraversalPath;

    #[test]
    fn message_names_the_path() {
        let mut path = TraversalPath::root();
        path.push_key("items");
        path.push_index(2);
        let err = SessionError::new(SessionErrorKind::DepthExceeded { max_depth: 4 }, &path);
        assert!(
            err.to_string()
                .starts_with("nesting exceeds the maximum depth of 4 at $.items[2]")
        );
        assert_eq!(err.path().segments().len(), 2);
    }
}
