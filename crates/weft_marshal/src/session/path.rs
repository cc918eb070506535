use core::fmt;

/// One step of a [`TraversalPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A record property or map entry.
    Key(String),
    /// A sequence item.
    Index(usize),
}

/// Where in the value tree a session is, rendered like `$.zoo.animals[3]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalPath {
    segments: Vec<PathSegment>,
}

impl TraversalPath {
    #[inline]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub(crate) fn push_key(&mut self, key: &str) {
        self.segments.push(PathSegment::Key(String::from(key)));
    }

    #[inline]
    pub(crate) fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for TraversalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::TraversalPath;

    #[test]
    fn renders_keys_and_indices() {
        let mut path = TraversalPath::root();
        assert_eq!(path.to_string(), "$");
        path.push_key("zoo");
        path.push_key("animals");
        path.push_index(3);
        assert_eq!(path.to_string(), "$.zoo.animals[3]");
        path.pop();
        path.pop();
        assert_eq!(path.to_string(), "$.zoo");
    }
}
