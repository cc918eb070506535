//! Serialization and parsing sessions.
//!
//! A session walks one value tree against a [`Registry`]:
//!
//! - [`serialize`] and [`serialize_into`] write a value as a [`Node`] tree or
//!   as events into any [`EventSink`].
//! - [`parse`] and [`parse_as`] build a value out of a `Node` tree.
//!
//! Sessions are cheap, single-threaded and independent: any number of them
//! may run against one registry at the same time.
//!
//! ## Nesting limit
//!
//! `max_depth` bounds the number of nested containers (sequences, maps and
//! records). Exceeding it fails with [`SessionErrorKind::DepthExceeded`].

// -----------------------------------------------------------------------------
// Modules

mod config;
mod de;
mod error;
mod path;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use config::{DEFAULT_DISCRIMINATOR, DEFAULT_MAX_DEPTH, ParseConfig, SerializeConfig};
pub use error::{SessionError, SessionErrorKind};
pub use path::{PathSegment, TraversalPath};

use crate::info::{TypeInfo, Typed};
use crate::node::{EventSink, Node, TreeSink};
use crate::registry::Registry;
use crate::session::de::ParseSession;
use crate::session::ser::SerializeSession;
use crate::Reflect;

// -----------------------------------------------------------------------------
// Entry points

/// Writes `value`, declared as `declared`, into `sink`.
///
/// On error the sink may hold a partial tree.
pub fn serialize_into<S: EventSink>(
    registry: &Registry,
    value: &dyn Reflect,
    declared: &'static TypeInfo,
    config: &SerializeConfig,
    sink: &mut S,
) -> Result<(), SessionError> {
    SerializeSession::new(registry, config).write(value, declared, None, sink)
}

/// Writes `value`, declared as `declared`, as a [`Node`] tree.
pub fn serialize(
    registry: &Registry,
    value: &dyn Reflect,
    declared: &'static TypeInfo,
    config: &SerializeConfig,
) -> Result<Node, SessionError> {
    let mut sink = TreeSink::new();
    serialize_into(registry, value, declared, config, &mut sink)?;
    Ok(sink.finish().unwrap_or_default())
}

/// Builds a value of type `target` out of `node`.
pub fn parse(
    registry: &Registry,
    node: &Node,
    target: &'static TypeInfo,
    config: &ParseConfig,
) -> Result<Box<dyn Reflect>, SessionError> {
    ParseSession::new(registry, config).read(node, target, None)
}

/// Builds a `T` out of `node`.
pub fn parse_as<T: Reflect + Typed>(
    registry: &Registry,
    node: &Node,
    config: &ParseConfig,
) -> Result<T, SessionError> {
    let value = parse(registry, node, T::type_info(), config)?;
    value.take::<T>().map_err(|value| {
        SessionError::new(
            SessionErrorKind::TypeMismatch {
                expected: format!("`{}`", T::type_info().type_path()),
                found: value.reflect_type_info().type_path(),
            },
            &TraversalPath::root(),
        )
    })
}

impl Registry {
    /// Writes a value of a statically known type as a [`Node`] tree.
    #[inline]
    pub fn serialize<T: Reflect + Typed>(&self, value: &T, config: &SerializeConfig) -> Result<Node, SessionError> {
        serialize(self, value, T::type_info(), config)
    }

    /// Builds a `T` out of `node`.
    #[inline]
    pub fn parse<T: Reflect + Typed>(&self, node: &Node, config: &ParseConfig) -> Result<T, SessionError> {
        parse_as::<T>(self, node, config)
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseConfig, SerializeConfig, SessionErrorKind};
    use crate::derive::Reflect;
    use crate::dictionary::Dictionary;
    use crate::info::Typed;
    use crate::introspect::{PropertyOverride, RecordOverride};
    use crate::node::Node;
    use crate::registry::{ConfigurationError, Registry};
    use crate::transform::FnTransform;
    use crate::{Reflect, impl_abstract};
    use alloc::collections::BTreeMap;
    use alloc::sync::Arc;
    use core::fmt;
    use core::str::FromStr;
    use std::collections::HashMap;
    use std::sync::OnceLock;

    // -------------------------------------------------------------------------
    // Fixtures

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Pair {
        a: i32,
        b: String,
    }

    #[derive(Reflect, Default, Debug, PartialEq, Clone, Copy)]
    enum Habitat {
        #[default]
        Land,
        #[weft(rename = "sea")]
        Water,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Bag {
        name: Option<String>,
        numbers: Vec<Option<i64>>,
        nested: Option<Vec<Vec<u8>>>,
        table: BTreeMap<String, Option<f64>>,
        empty: Vec<String>,
        empty_map: BTreeMap<String, u8>,
        flag: bool,
        letter: char,
        habitat: Habitat,
    }

    trait Animal: Reflect {
        fn sound(&self) -> &'static str;
    }

    impl_abstract!(dyn Animal);

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Cat {
        name: String,
        lives: u8,
    }

    impl Animal for Cat {
        fn sound(&self) -> &'static str {
            "meow"
        }
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Dog {
        name: String,
        #[weft(always)]
        tricks: Vec<String>,
    }

    impl Animal for Dog {
        fn sound(&self) -> &'static str {
            "woof"
        }
    }

    #[derive(Reflect, Default)]
    struct Zoo {
        animals: Vec<Box<dyn Animal>>,
        keeper: Option<Box<dyn Animal>>,
    }

    impl core::fmt::Debug for Zoo {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.debug_struct("Zoo").finish_non_exhaustive()
        }
    }

    #[derive(Reflect, Default)]
    struct Link {
        name: String,
        next: OnceLock<Arc<Link>>,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Account {
        #[weft(read_only)]
        id: u32,
        owner: String,
        #[weft(write_only)]
        password: String,
    }

    #[derive(Reflect, Debug, PartialEq, Clone, Copy)]
    #[weft(opaque, string_form)]
    struct Version {
        major: u16,
        minor: u16,
    }

    impl fmt::Display for Version {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}.{}", self.major, self.minor)
        }
    }

    impl FromStr for Version {
        type Err = String;

        fn from_str(text: &str) -> Result<Self, Self::Err> {
            let (major, minor) = text.split_once('.').ok_or("missing `.`")?;
            Ok(Self {
                major: major.parse().map_err(|_| "bad major")?,
                minor: minor.parse().map_err(|_| "bad minor")?,
            })
        }
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Release {
        version: Option<Version>,
        notes: Option<String>,
    }

    #[derive(Reflect, Debug, PartialEq, Clone, Copy)]
    #[weft(opaque)]
    struct Celsius(f64);

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Reading {
        place: String,
        temperature: Option<Celsius>,
    }

    #[derive(Reflect, Default)]
    #[weft(auto_register, type_path = "tests::Badge")]
    struct Badge {
        label: String,
    }

    fn json(node: &Node) -> String {
        serde_json::to_string(node).unwrap()
    }

    fn node(text: &str) -> Node {
        serde_json::from_str(text).unwrap()
    }

    fn animals() -> Dictionary {
        Dictionary::builder::<Box<dyn Animal>>("animals")
            .entry::<Cat>("Cat")
            .entry::<Dog>("Dog")
            .build()
    }

    fn zoo_registry() -> Registry {
        Registry::builder()
            .register::<Zoo>()
            .dictionary(animals())
            .build()
            .unwrap()
    }

    fn tom() -> Cat {
        Cat {
            name: "Tom".into(),
            lives: 9,
        }
    }

    // -------------------------------------------------------------------------
    // Tests

    #[test]
    fn record_scenario() {
        let registry = Registry::new();
        let pair = Pair {
            a: 1,
            b: "foo".into(),
        };
        let tree = registry.serialize(&pair, &SerializeConfig::default()).unwrap();
        assert_eq!(json(&tree), r#"{"a":1,"b":"foo"}"#);

        let back: Pair = registry.parse(&node(r#"{"a":1,"b":"foo"}"#), &ParseConfig::default()).unwrap();
        assert_eq!(back, pair);
    }

    #[test]
    fn three_dimensional_scenario() {
        type Cube = Vec<Option<Vec<Option<Vec<u8>>>>>;

        let registry = Registry::new();
        let cube: Cube = vec![Some(vec![Some(vec![1, 2]), None]), None];
        let tree = registry.serialize(&cube, &SerializeConfig::default()).unwrap();
        assert_eq!(json(&tree), "[[[1,2],null],null]");

        let descriptor = registry.classify_type::<Cube>().unwrap();
        let shape = descriptor.shape().unwrap();
        assert_eq!(shape.dimensions(), 3);
        assert!(shape.base().is::<u8>());

        let back: Cube = registry.parse(&node("[[[1,2],null],null]"), &ParseConfig::default()).unwrap();
        assert_eq!(back, cube);
    }

    #[test]
    fn structural_round_trip_keeps_nulls_and_empties() {
        let registry = Registry::new();
        let bag = Bag {
            name: None,
            numbers: vec![Some(1), None, Some(-3)],
            nested: Some(vec![vec![], vec![7]]),
            table: BTreeMap::from([("x".to_owned(), None), ("y".to_owned(), Some(0.5))]),
            empty: Vec::new(),
            empty_map: BTreeMap::new(),
            flag: true,
            letter: 'q',
            habitat: Habitat::Water,
        };

        let tree = registry.serialize(&bag, &SerializeConfig::default()).unwrap();
        let text = json(&tree);
        assert_eq!(
            text,
            r#"{"name":null,"numbers":[1,null,-3],"nested":[[],[7]],"table":{"x":null,"y":0.5},"empty":[],"empty_map":{},"flag":true,"letter":"q","habitat":"sea"}"#
        );
        let back: Bag = registry.parse(&node(&text), &ParseConfig::default()).unwrap();
        assert_eq!(back, bag);

        let suppressed = registry
            .serialize(&bag, &SerializeConfig::default().with_suppress_empty(true))
            .unwrap();
        assert_eq!(
            json(&suppressed),
            r#"{"numbers":[1,null,-3],"nested":[[],[7]],"table":{"x":null,"y":0.5},"flag":true,"letter":"q","habitat":"sea"}"#
        );
        let back: Bag = registry.parse(&suppressed, &ParseConfig::default()).unwrap();
        assert_eq!(back, bag);
    }

    #[test]
    fn polymorphic_values_carry_one_discriminator() {
        let registry = zoo_registry();
        let zoo = Zoo {
            animals: vec![
                Box::new(tom()),
                Box::new(Dog {
                    name: "Rex".into(),
                    tricks: vec!["sit".into()],
                }),
            ],
            keeper: None,
        };

        let tree = registry.serialize(&zoo, &SerializeConfig::default()).unwrap();
        assert_eq!(
            json(&tree),
            r#"{"animals":[{"_type":"Cat","name":"Tom","lives":9},{"_type":"Dog","name":"Rex","tricks":["sit"]}],"keeper":null}"#
        );

        let back: Zoo = registry.parse(&tree, &ParseConfig::default()).unwrap();
        assert_eq!(back.animals.len(), 2);
        assert!(back.keeper.is_none());
        let first: &dyn Reflect = &*back.animals[0];
        assert_eq!(first.downcast_ref::<Cat>(), Some(&tom()));
        assert_eq!(back.animals[1].sound(), "woof");

        let plain = registry
            .serialize(&zoo, &SerializeConfig::default().with_type_discriminators(false))
            .unwrap();
        assert!(!json(&plain).contains("_type"));
    }

    #[test]
    fn map_of_abstract_values() {
        let registry = Registry::builder()
            .dictionary(
                Dictionary::builder::<Box<dyn Animal>>("pets")
                    .entry::<Cat>("Impl")
                    .build(),
            )
            .build()
            .unwrap();

        let pets: BTreeMap<String, Box<dyn Animal>> = BTreeMap::from([("x".to_owned(), Box::new(tom()) as Box<dyn Animal>)]);
        let tree = registry.serialize(&pets, &SerializeConfig::default()).unwrap();
        assert_eq!(json(&tree), r#"{"x":{"_type":"Impl","name":"Tom","lives":9}}"#);

        let back: BTreeMap<String, Box<dyn Animal>> = registry
            .parse(&node(r#"{"x":{"_type":"Impl","name":"Tom","lives":9}}"#), &ParseConfig::default())
            .unwrap();
        assert_eq!(back["x"].sound(), "meow");
        let x: &dyn Reflect = &*back["x"];
        assert_eq!(x.downcast_ref::<Cat>(), Some(&tom()));
    }

    #[test]
    fn discriminator_failures() {
        let registry = zoo_registry();
        let config = ParseConfig::default();

        let err = registry
            .parse::<Zoo>(&node(r#"{"animals":[{"_type":"Cow"}]}"#), &config)
            .unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::UnknownDiscriminator { token, .. } if token == "Cow"));
        assert_eq!(err.path().to_string(), "$.animals[0]");

        let err = registry
            .parse::<Zoo>(&node(r#"{"animals":[{"name":"Tom"}]}"#), &config)
            .unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::MissingDiscriminator { .. }));

        // A registered implementation stands in for a missing discriminator.
        let registry = Registry::builder()
            .dictionary(animals())
            .implementation::<Box<dyn Animal>, Cat>()
            .build()
            .unwrap();
        let zoo: Zoo = registry
            .parse(&node(r#"{"animals":[{"name":"Tom","lives":9}]}"#), &config)
            .unwrap();
        assert_eq!(zoo.animals[0].sound(), "meow");
    }

    #[test]
    fn concrete_targets_check_their_discriminator() {
        let registry = zoo_registry();
        let config = ParseConfig::default();

        let cat: Cat = registry
            .parse(&node(r#"{"_type":"Cat","name":"Tom","lives":9}"#), &config)
            .unwrap();
        assert_eq!(cat, tom());

        let err = registry
            .parse::<Cat>(&node(r#"{"_type":"Dog","name":"Rex"}"#), &config)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            SessionErrorKind::TypeMismatch { found, .. } if found.ends_with("Dog")
        ));

        let err = registry
            .parse::<Cat>(&node(r#"{"_type":"Cow","name":"Tom"}"#), &config)
            .unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::UnknownDiscriminator { token, .. } if token == "Cow"));

        let err = registry
            .parse::<Cat>(&node(r#"{"_type":7,"name":"Tom"}"#), &config)
            .unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::TypeMismatch { found: "number", .. }));
    }

    #[test]
    fn self_reference_is_a_recursion() {
        let registry = Registry::new();
        let link = Arc::new(Link {
            name: "a".into(),
            next: OnceLock::new(),
        });
        assert!(link.next.set(link.clone()).is_ok());

        let err = registry.serialize(&*link, &SerializeConfig::default()).unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::Recursion { ty } if *ty == Link::type_info().type_path()));
        assert_eq!(err.path().to_string(), "$.next");

        let tree = registry
            .serialize(&*link, &SerializeConfig::default().with_ignore_recursions(true))
            .unwrap();
        assert_eq!(json(&tree), r#"{"name":"a","next":null}"#);

        // Shared but acyclic values are not recursions.
        let leaf = Arc::new(Link::default());
        let pair = vec![leaf.clone(), leaf];
        assert!(registry.serialize(&pair, &SerializeConfig::default()).is_ok());
    }

    #[test]
    fn depth_limit() {
        let registry = Registry::new();
        let deep = vec![vec![vec![1_u8]]];

        let err = registry
            .serialize(&deep, &SerializeConfig::default().with_max_depth(2))
            .unwrap_err();
        assert_eq!(*err.kind(), SessionErrorKind::DepthExceeded { max_depth: 2 });
        assert!(registry.serialize(&deep, &SerializeConfig::default().with_max_depth(3)).is_ok());

        let err = registry
            .parse::<Vec<Vec<Vec<u8>>>>(&node("[[[1]]]"), &ParseConfig::default().with_max_depth(2))
            .unwrap_err();
        assert_eq!(*err.kind(), SessionErrorKind::DepthExceeded { max_depth: 2 });
        assert_eq!(err.path().to_string(), "$[0][0]");
    }

    #[test]
    fn unknown_and_null_properties() {
        let registry = Registry::new();
        let input = node(r#"{"a":1,"b":"x","c":true}"#);

        let pair: Pair = registry.parse(&input, &ParseConfig::default()).unwrap();
        assert_eq!(pair, Pair { a: 1, b: "x".into() });

        let strict = ParseConfig::default().with_strict_unknown_properties(true);
        let err = registry.parse::<Pair>(&input, &strict).unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::UnknownProperty { name, .. } if name == "c"));
        assert_eq!(err.path().to_string(), "$.c");

        let nulls = node(r#"{"a":null,"b":"x"}"#);
        let err = registry.parse::<Pair>(&nulls, &ParseConfig::default()).unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::TypeMismatch { .. }));
        assert_eq!(err.path().to_string(), "$.a");
        let pair: Pair = registry
            .parse(&nulls, &ParseConfig::default().with_trim_nulls(true))
            .unwrap();
        assert_eq!(pair, Pair { a: 0, b: "x".into() });

        let padded: Pair = registry
            .parse(&node(r#"{"a":" 4 ","b":" y "}"#), &ParseConfig::default().with_trim_strings(true))
            .unwrap();
        assert_eq!(padded, Pair { a: 4, b: "y".into() });
    }

    #[test]
    fn read_only_properties_are_ignored_on_parse() {
        let registry = Registry::new();
        let account = Account {
            id: 7,
            owner: "ann".into(),
            password: "pw".into(),
        };
        let tree = registry.serialize(&account, &SerializeConfig::default()).unwrap();
        assert_eq!(json(&tree), r#"{"id":7,"owner":"ann"}"#);

        let input = node(r#"{"id":9,"owner":"bob","password":"x"}"#);
        let parsed: Account = registry.parse(&input, &ParseConfig::default()).unwrap();
        assert_eq!(
            parsed,
            Account {
                id: 0,
                owner: "bob".into(),
                password: "x".into(),
            }
        );

        let strict = ParseConfig::default().with_strict_unknown_properties(true);
        let err = registry.parse::<Account>(&input, &strict).unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::UnknownProperty { name, .. } if name == "id"));
    }

    #[test]
    fn property_overrides_shape_the_output() {
        let registry = Registry::builder()
            .property_override::<Pair>("b", PropertyOverride::new().with_rename("label").with_alias("tag"))
            .record_override::<Pair>(RecordOverride::new().with_order(["b", "a"]))
            .build()
            .unwrap();
        let pair = Pair { a: 2, b: "z".into() };
        let tree = registry.serialize(&pair, &SerializeConfig::default()).unwrap();
        assert_eq!(json(&tree), r#"{"label":"z","a":2}"#);

        let back: Pair = registry.parse(&node(r#"{"tag":"z","a":2}"#), &ParseConfig::default()).unwrap();
        assert_eq!(back, pair);

        let registry = Registry::builder()
            .record_override::<Pair>(RecordOverride::new().with_exclude(["a"]))
            .build()
            .unwrap();
        let tree = registry.serialize(&pair, &SerializeConfig::default()).unwrap();
        assert_eq!(json(&tree), r#"{"b":"z"}"#);
    }

    #[test]
    fn colliding_or_unknown_property_names_fail_the_build() {
        let err = Registry::builder()
            .property_override::<Pair>("b", PropertyOverride::new().with_rename("a"))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ConfigurationError::DuplicateProperty { ref name, .. } if name == "a"));

        let err = Registry::builder()
            .property_override::<Pair>("b", PropertyOverride::new().with_alias("a"))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ConfigurationError::DuplicateProperty { .. }));

        let err = Registry::builder()
            .property_override::<Pair>("nope", PropertyOverride::new().with_rename("x"))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ConfigurationError::UnknownProperty { ref property, .. } if property == "nope"));

        let err = Registry::builder()
            .record_override::<Pair>(RecordOverride::new().with_order(["b", "nope"]))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ConfigurationError::UnknownProperty { .. }));
    }

    #[test]
    fn implicit_string_form() {
        let registry = Registry::new();
        let release = Release {
            version: Some(Version { major: 1, minor: 2 }),
            notes: None,
        };
        let tree = registry.serialize(&release, &SerializeConfig::default()).unwrap();
        assert_eq!(json(&tree), r#"{"version":"1.2","notes":null}"#);

        let back: Release = registry.parse(&tree, &ParseConfig::default()).unwrap();
        assert_eq!(back, release);

        let err = registry
            .parse::<Release>(&node(r#"{"version":"one"}"#), &ParseConfig::default())
            .unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::Transform(_)));
        assert_eq!(err.path().to_string(), "$.version");
    }

    #[test]
    fn registered_transform_round_trip() {
        let reading = Reading {
            place: "roof".into(),
            temperature: Some(Celsius(21.5)),
        };

        // Without a transform the value is written as a placeholder and
        // cannot be read back.
        let bare = Registry::new();
        assert!(bare.serialize(&reading, &SerializeConfig::default()).is_ok());
        let err = bare
            .parse::<Reading>(&node(r#"{"temperature":21.5}"#), &ParseConfig::default())
            .unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::UnsupportedRestore { .. }));

        let registry = Registry::builder()
            .transform::<Celsius>(FnTransform::new(|c: &Celsius| c.0, |v: f64| Ok(Celsius(v))).named("celsius"))
            .build()
            .unwrap();
        let tree = registry.serialize(&reading, &SerializeConfig::default()).unwrap();
        assert_eq!(json(&tree), r#"{"place":"roof","temperature":21.5}"#);
        let back: Reading = registry.parse(&tree, &ParseConfig::default()).unwrap();
        assert_eq!(back, reading);
    }

    #[test]
    fn sorting_options() {
        let registry = Registry::new();
        let config = SerializeConfig::default()
            .with_sort_map_keys(true)
            .with_sort_collections(true);

        let scores = HashMap::from([("b".to_owned(), 2_u8), ("c".to_owned(), 3), ("a".to_owned(), 1)]);
        let tree = registry.serialize(&scores, &config).unwrap();
        assert_eq!(json(&tree), r#"{"a":1,"b":2,"c":3}"#);

        let tree = registry.serialize(&vec![3_i32, -1, 2], &config).unwrap();
        assert_eq!(json(&tree), "[-1,2,3]");
    }

    #[test]
    fn enums_by_variant_name() {
        let registry = Registry::new();
        let tree = registry.serialize(&Habitat::Water, &SerializeConfig::default()).unwrap();
        assert_eq!(tree, Node::String("sea".into()));
        assert_eq!(registry.parse::<Habitat>(&tree, &ParseConfig::default()).unwrap(), Habitat::Water);

        let err = registry
            .parse::<Habitat>(&Node::String("Water".into()), &ParseConfig::default())
            .unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn untyped_values_keep_their_natural_shape() {
        let registry = Registry::new();
        let any = <Box<dyn Reflect>>::type_info();
        let input = node(r#"{"k":[1,-2,1.5,"s",true,null]}"#);

        let value = super::parse(&registry, &input, any, &ParseConfig::default()).unwrap();
        let tree = super::serialize(&registry, &*value, any, &SerializeConfig::default()).unwrap();
        assert_eq!(tree, input);
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_registered_types_are_collected() {
        let registry = Registry::builder().auto_register().build().unwrap();
        assert!(registry.types().iter().any(|info| info.is::<Badge>()));
        assert_eq!(Badge::type_info().type_path(), "tests::Badge");

        let badge = Badge { label: "gold".into() };
        let tree = registry.serialize(&badge, &SerializeConfig::default()).unwrap();
        assert_eq!(json(&tree), r#"{"label":"gold"}"#);
    }

    #[test]
    fn renders_through_ron() {
        let registry = Registry::new();
        let pair = Pair { a: 5, b: "r".into() };
        let tree = registry.serialize(&pair, &SerializeConfig::default()).unwrap();
        let text = ron::to_string(&tree).unwrap();
        let back: Node = ron::from_str(&text).unwrap();
        assert_eq!(registry.parse::<Pair>(&back, &ParseConfig::default()).unwrap(), pair);
    }
}
