use serde::{Deserialize, Serialize};

/// The property name that carries a discriminator by default.
pub const DEFAULT_DISCRIMINATOR: &str = "_type";

/// The nesting depth at which sessions give up by default.
pub const DEFAULT_MAX_DEPTH: usize = 100;

fn default_discriminator() -> String {
    String::from(DEFAULT_DISCRIMINATOR)
}

// -----------------------------------------------------------------------------
// SerializeConfig

/// Options of a serialization session.
///
/// Loadable from any serde format; missing fields take their defaults.
///
/// ```
/// use weft_marshal::SerializeConfig;
///
/// let config: SerializeConfig = serde_json::from_str(r#"{"suppress_empty": true}"#).unwrap();
/// assert!(config.suppress_empty);
/// assert_eq!(config.discriminator_property_name, "_type");
/// assert_eq!(config.max_depth, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeConfig {
    /// Skip properties whose value is null or an empty container.
    pub suppress_empty: bool,
    pub sort_map_keys: bool,
    /// Write sequence items in the total order of their trees.
    pub sort_collections: bool,
    pub emit_type_discriminators: bool,
    pub discriminator_property_name: String,
    pub max_depth: usize,
    /// Write a value already open on the current path as null instead of failing.
    pub ignore_recursions: bool,
    /// Dictionaries consulted after the scoped ones, by name.
    pub default_dictionary_scope: Vec<String>,
}

impl Default for SerializeConfig {
    fn default() -> Self {
        Self {
            suppress_empty: false,
            sort_map_keys: false,
            sort_collections: false,
            emit_type_discriminators: true,
            discriminator_property_name: default_discriminator(),
            max_depth: DEFAULT_MAX_DEPTH,
            ignore_recursions: false,
            default_dictionary_scope: Vec::new(),
        }
    }
}

impl SerializeConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suppress_empty(mut self, suppress: bool) -> Self {
        self.suppress_empty = suppress;
        self
    }

    pub fn with_sort_map_keys(mut self, sort: bool) -> Self {
        self.sort_map_keys = sort;
        self
    }

    pub fn with_sort_collections(mut self, sort: bool) -> Self {
        self.sort_collections = sort;
        self
    }

    pub fn with_type_discriminators(mut self, emit: bool) -> Self {
        self.emit_type_discriminators = emit;
        self
    }

    pub fn with_discriminator_property_name(mut self, name: impl Into<String>) -> Self {
        self.discriminator_property_name = name.into();
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_ignore_recursions(mut self, ignore: bool) -> Self {
        self.ignore_recursions = ignore;
        self
    }

    pub fn with_default_dictionary(mut self, name: impl Into<String>) -> Self {
        self.default_dictionary_scope.push(name.into());
        self
    }
}

// -----------------------------------------------------------------------------
// ParseConfig

/// Options of a parsing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Fail on names that match no writable property.
    pub strict_unknown_properties: bool,
    pub default_dictionary_scope: Vec<String>,
    pub discriminator_property_name: String,
    pub max_depth: usize,
    /// Trim string scalars before converting them.
    pub trim_strings: bool,
    /// Keep the default value of record properties given as null.
    pub trim_nulls: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            strict_unknown_properties: false,
            default_dictionary_scope: Vec::new(),
            discriminator_property_name: default_discriminator(),
            max_depth: DEFAULT_MAX_DEPTH,
            trim_strings: false,
            trim_nulls: false,
        }
    }
}

impl ParseConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict_unknown_properties(mut self, strict: bool) -> Self {
        self.strict_unknown_properties = strict;
        self
    }

    pub fn with_default_dictionary(mut self, name: impl Into<String>) -> Self {
        self.default_dictionary_scope.push(name.into());
        self
    }

    pub fn with_discriminator_property_name(mut self, name: impl Into<String>) -> Self {
        self.discriminator_property_name = name.into();
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_trim_strings(mut self, trim: bool) -> Self {
        self.trim_strings = trim;
        self
    }

    pub fn with_trim_nulls(mut self, trim: bool) -> Self {
        self.trim_nulls = trim;
        self
    }
}
