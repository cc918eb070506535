use alloc::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::info::Inclusion;

/// Per-property configuration applied on top of the derived property table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyOverride {
    /// Wire name replacing the declared one.
    pub rename: Option<String>,
    /// Extra names accepted when parsing.
    pub aliases: Vec<String>,
    pub inclusion: Option<Inclusion>,
}

impl PropertyOverride {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_inclusion(mut self, inclusion: Inclusion) -> Self {
        self.inclusion = Some(inclusion);
        self
    }
}

/// Type-level configuration of a record's properties.
///
/// Every list names properties by their logical (field) name. Naming a
/// property the record does not have is a configuration error.
///
/// ```
/// use weft_marshal::introspect::RecordOverride;
///
/// let config: RecordOverride = serde_json::from_str(
///     r#"{"exclude": ["secret"], "order": ["b", "a"], "properties": {"a": {"rename": "alpha"}}}"#,
/// ).unwrap();
/// assert_eq!(config.exclude, ["secret"]);
/// assert_eq!(config.properties["a"].rename.as_deref(), Some("alpha"));
/// assert!(config.include.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordOverride {
    /// Only these properties, in this order unless `order` is set.
    pub include: Option<Vec<String>>,
    pub exclude: Vec<String>,
    /// Written but never parsed.
    pub read_only: Vec<String>,
    /// Parsed but never written.
    pub write_only: Vec<String>,
    /// Listed properties first, in this order, then the rest.
    pub order: Option<Vec<String>>,
    /// Order by wire name, overriding the type's own setting.
    pub sort_properties: Option<bool>,
    /// Drop non-public properties unless their inclusion is `Always`.
    pub public_only: bool,
    pub properties: BTreeMap<String, PropertyOverride>,
}

fn names<I>(names: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}

impl RecordOverride {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include<I>(mut self, include: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.include = Some(names(include));
        self
    }

    pub fn with_exclude<I>(mut self, exclude: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.exclude.extend(names(exclude));
        self
    }

    pub fn with_read_only<I>(mut self, read_only: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.read_only.extend(names(read_only));
        self
    }

    pub fn with_write_only<I>(mut self, write_only: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.write_only.extend(names(write_only));
        self
    }

    pub fn with_order<I>(mut self, order: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.order = Some(names(order));
        self
    }

    pub fn with_sort_properties(mut self, sort: bool) -> Self {
        self.sort_properties = Some(sort);
        self
    }

    pub fn with_public_only(mut self, public_only: bool) -> Self {
        self.public_only = public_only;
        self
    }

    /// Sets the override of one property, replacing any previous one.
    pub fn with_property(mut self, name: impl Into<String>, property: PropertyOverride) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    /// Every property name the override refers to.
    pub(crate) fn referenced_names(&self) -> impl Iterator<Item = &str> {
        self.include
            .iter()
            .flatten()
            .chain(&self.exclude)
            .chain(&self.read_only)
            .chain(&self.write_only)
            .chain(self.order.iter().flatten())
            .chain(self.properties.keys())
            .map(String::as_str)
    }
}
