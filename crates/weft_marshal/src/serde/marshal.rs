use serde::de::{self, DeserializeSeed, Deserializer};
use serde::ser::{self, Serialize, Serializer};

use crate::Reflect;
use crate::info::{TypeInfo, Typed};
use crate::node::Node;
use crate::registry::Registry;
use crate::session::{ParseConfig, SerializeConfig};

// -----------------------------------------------------------------------------
// MarshalSerialize

/// A value marshalled through a [`Registry`], usable wherever serde expects
/// a `Serialize`.
///
/// ```
/// use weft_marshal::{Registry, SerializeConfig, serde::MarshalSerialize};
///
/// let registry = Registry::new();
/// let config = SerializeConfig::default();
/// let value = vec![Some(1_u8), None];
/// let json = serde_json::to_string(&MarshalSerialize::new(&registry, &value, &config)).unwrap();
/// assert_eq!(json, "[1,null]");
/// ```
pub struct MarshalSerialize<'a> {
    registry: &'a Registry,
    value: &'a dyn Reflect,
    declared: &'static TypeInfo,
    config: &'a SerializeConfig,
}

impl<'a> MarshalSerialize<'a> {
    /// Wraps a value of a statically known type.
    pub fn new<T: Reflect + Typed>(registry: &'a Registry, value: &'a T, config: &'a SerializeConfig) -> Self {
        Self {
            registry,
            value,
            declared: T::type_info(),
            config,
        }
    }

    /// Wraps an erased value, written as if declared as `declared`.
    pub fn with_declared(
        registry: &'a Registry,
        value: &'a dyn Reflect,
        declared: &'static TypeInfo,
        config: &'a SerializeConfig,
    ) -> Self {
        Self {
            registry,
            value,
            declared,
            config,
        }
    }
}

impl Serialize for MarshalSerialize<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = crate::session::serialize(self.registry, self.value, self.declared, self.config)
            .map_err(<S::Error as ser::Error>::custom)?;
        node.serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// ParseSeed

/// A [`DeserializeSeed`] that reads any serde input as a [`Node`] tree and
/// parses it into a value of the target type.
///
/// ```
/// use serde::de::DeserializeSeed;
/// use weft_marshal::{ParseConfig, Registry, info::Typed, serde::ParseSeed};
///
/// let registry = Registry::new();
/// let config = ParseConfig::default();
/// let seed = ParseSeed::new(&registry, <Vec<Option<u8>>>::type_info(), &config);
/// let mut input = serde_json::Deserializer::from_str("[1, null]");
/// let value = seed.deserialize(&mut input).unwrap();
/// assert_eq!(value.take::<Vec<Option<u8>>>().unwrap(), [Some(1), None]);
/// ```
pub struct ParseSeed<'a> {
    registry: &'a Registry,
    target: &'static TypeInfo,
    config: &'a ParseConfig,
}

impl<'a> ParseSeed<'a> {
    pub fn new(registry: &'a Registry, target: &'static TypeInfo, config: &'a ParseConfig) -> Self {
        Self {
            registry,
            target,
            config,
        }
    }
}

impl<'de> DeserializeSeed<'de> for ParseSeed<'_> {
    type Value = Box<dyn Reflect>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let node = <Node as serde::Deserialize>::deserialize(deserializer)?;
        crate::session::parse(self.registry, &node, self.target, self.config)
            .map_err(<D::Error as de::Error>::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{MarshalSerialize, ParseSeed};
    use crate::info::Typed;
    use crate::registry::Registry;
    use crate::session::{ParseConfig, SerializeConfig};
    use alloc::collections::BTreeMap;
    use core::time::Duration;
    use serde::de::DeserializeSeed;

    #[test]
    fn renders_through_ron() {
        let registry = Registry::new();
        let config = SerializeConfig::default();
        let value = BTreeMap::from([("a".to_owned(), Duration::from_millis(1500))]);
        let text = ron::to_string(&MarshalSerialize::new(&registry, &value, &config)).unwrap();
        assert_eq!(text, r#"{"a":"1.500000000s"}"#);
    }

    #[test]
    fn parse_errors_surface_as_format_errors() {
        let registry = Registry::new();
        let config = ParseConfig::default();
        let seed = ParseSeed::new(&registry, <Vec<u8>>::type_info(), &config);
        let mut input = serde_json::Deserializer::from_str(r#"["x"]"#);
        let err = seed.deserialize(&mut input).unwrap_err();
        assert!(err.to_string().contains("$[0]"), "{err}");
    }
}
