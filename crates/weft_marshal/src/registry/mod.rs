//! The frozen configuration every session reads from.
//!
//! A [`Registry`] is assembled once through [`RegistryBuilder`] and is then
//! immutable, apart from the descriptor cache that classifies types reached
//! for the first time. It is `Send + Sync`; share it behind an `Arc` or a
//! `static` and run any number of sessions against it.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, non-generic types deriving
//! `Reflect` with `#[weft(auto_register)]` are collected at link time and
//! added by [`RegistryBuilder::auto_register`].

mod error;

pub use error::ConfigurationError;

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use core::any::TypeId;

use weft_utils::TypeIdMap;
use weft_utils::hash::HashSet;

use crate::classify::{Classification, DescriptorCache, TypeDescriptor, classify_shape};
use crate::dictionary::{Dictionary, DictionarySet, Implementation};
use crate::info::{TypeInfo, Typed};
use crate::introspect::{PropertyOverride, RecordOverride, introspect};
use crate::transform::{Transform, TransformRegistration, TransformTable};
use crate::transform::{builtin_transforms, implicit_transform};
use crate::{Reflect, Upcast};

// -----------------------------------------------------------------------------
// Registry

/// Transforms, dictionaries and record overrides, resolved and frozen.
///
/// # Examples
///
/// ```
/// use weft_marshal::{Registry, SerializeConfig, ParseConfig};
///
/// let registry = Registry::new();
/// let value = vec![Some(1_u8), None];
/// let node = registry.serialize(&value, &SerializeConfig::default()).unwrap();
/// assert_eq!(serde_json::to_string(&node).unwrap(), "[1,null]");
///
/// let back: Vec<Option<u8>> = registry.parse(&node, &ParseConfig::default()).unwrap();
/// assert_eq!(back, value);
/// ```
pub struct Registry {
    types: Vec<&'static TypeInfo>,
    transforms: TransformTable,
    dictionaries: DictionarySet,
    overrides: TypeIdMap<RecordOverride>,
    opaque: HashSet<TypeId>,
    sort_properties: bool,
    cache: DescriptorCache,
}

impl Registry {
    /// A registry with the builtin transforms and nothing else.
    pub fn new() -> Self {
        // Builtins target distinct types and never collide.
        let transforms = TransformTable::build(builtin_transforms(), &TypeIdMap::new(), |_| None)
            .unwrap_or_default();
        Self {
            types: Vec::new(),
            transforms,
            dictionaries: DictionarySet::default(),
            overrides: TypeIdMap::new(),
            opaque: HashSet::default(),
            sort_properties: false,
            cache: DescriptorCache::new(),
        }
    }

    #[inline]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns the descriptor of a declared type, classifying it on first use.
    ///
    /// Repeated calls return the same `Arc`, from any thread.
    pub fn classify(&self, info: &'static TypeInfo) -> Result<Arc<TypeDescriptor>, ConfigurationError> {
        if let Some(descriptor) = self.cache.get(info.type_id()) {
            return Ok(descriptor);
        }

        let classification = self.describe(info)?;
        log::trace!(
            "classified `{}` as {}",
            info.type_path(),
            classification.name()
        );
        Ok(self.cache.insert(TypeDescriptor::new(info, classification)))
    }

    #[inline]
    pub fn classify_type<T: Typed>(&self) -> Result<Arc<TypeDescriptor>, ConfigurationError> {
        self.classify(T::type_info())
    }

    fn describe(&self, info: &'static TypeInfo) -> Result<Classification, ConfigurationError> {
        let type_id = info.type_id();
        if self.opaque.contains(&type_id) {
            return Ok(Classification::Opaque);
        }
        if let Some(transform) = self.transforms.for_target(info) {
            return Ok(Classification::Transformable(Arc::clone(transform)));
        }
        if let Some(transform) = implicit_transform(info) {
            return Ok(Classification::Transformable(transform));
        }

        classify_shape(info, |record| {
            let overrides = self.overrides.get(&type_id);
            let layout = match overrides {
                Some(overrides) => introspect(record, overrides, self.sort_properties)?,
                None => introspect(record, &RecordOverride::default(), self.sort_properties)?,
            };
            Ok(layout)
        })
    }

    /// The transform that applies to a value being written.
    ///
    /// Explicit registrations first (runtime type, declared type, inherited
    /// from an abstraction), then whatever the runtime or declared type is
    /// classified with.
    pub fn transform_for_value(
        &self,
        declared: &'static TypeInfo,
        runtime: &'static TypeInfo,
    ) -> Result<Option<Arc<dyn Transform>>, ConfigurationError> {
        if self.opaque.contains(&runtime.type_id()) {
            return Ok(None);
        }
        if let Some(transform) = self.transforms.for_value(declared, runtime) {
            return Ok(Some(Arc::clone(transform)));
        }
        if let Some(transform) = self.classify(runtime)?.transform() {
            return Ok(Some(Arc::clone(transform)));
        }
        if declared.type_id() != runtime.type_id() {
            return Ok(self.classify(declared)?.transform().cloned());
        }
        Ok(None)
    }

    /// Returns the dictionaries and polymorphism configuration.
    #[inline]
    pub fn dictionaries(&self) -> &DictionarySet {
        &self.dictionaries
    }

    /// Returns the explicitly registered types.
    #[inline]
    pub fn types(&self) -> &[&'static TypeInfo] {
        &self.types
    }

    /// Returns the number of classified types.
    #[inline]
    pub fn classified_len(&self) -> usize {
        self.cache.len()
    }
}

impl Default for Registry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.types.len())
            .field("dictionaries", &self.dictionaries.dictionaries().len())
            .field("classified", &self.cache.len())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// RegistryBuilder

/// Collects the configuration of a [`Registry`].
///
/// Nothing is validated until [`build`](Self::build), which classifies the
/// registered types and reports the first configuration error before any
/// session runs.
#[derive(Default)]
pub struct RegistryBuilder {
    types: Vec<&'static TypeInfo>,
    transforms: Vec<TransformRegistration>,
    without_builtins: bool,
    dictionaries: Vec<Dictionary>,
    attachments: Vec<(&'static TypeInfo, String)>,
    implementations: Vec<(&'static TypeInfo, Implementation)>,
    overrides: TypeIdMap<RecordOverride>,
    opaque: HashSet<TypeId>,
    sort_properties: bool,
}

impl RegistryBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type, so that it and every type it reaches are classified
    /// and validated by `build`.
    pub fn register<T: Typed>(mut self) -> Self {
        self.push_type(T::type_info());
        self
    }

    fn push_type(&mut self, info: &'static TypeInfo) {
        if !self.types.iter().any(|known| known.type_id() == info.type_id()) {
            self.types.push(info);
        }
    }

    /// Registers every type marked with `#[weft(auto_register)]`.
    ///
    /// Does nothing without the `auto_register` feature.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(self) -> Self {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register::AutoRegistration;

            let mut this = self;
            for registration in inventory::iter::<AutoRegistration> {
                this.push_type((registration.0)());
            }
            this
        }
        #[cfg(not(feature = "auto_register"))]
        {
            self
        }
    }

    /// Registers a transform for `T` with priority `0`.
    ///
    /// `T` may be an abstract type such as `Box<dyn Shape>`: the transform
    /// then applies to every concrete type registered under it.
    #[inline]
    pub fn transform<T: Typed>(self, transform: impl Transform) -> Self {
        self.transform_with_priority::<T>(transform, 0)
    }

    /// Registers a transform for `T`.
    ///
    /// Among transforms of the same specificity the highest priority wins;
    /// equal priorities fail the build.
    pub fn transform_with_priority<T: Typed>(mut self, transform: impl Transform, priority: i32) -> Self {
        self.transforms.push(TransformRegistration::exact(
            T::type_info(),
            Arc::new(transform),
            priority,
        ));
        self
    }

    /// Drops the builtin `Duration`, `PathBuf` and `SystemTime` transforms.
    pub fn without_builtin_transforms(mut self) -> Self {
        self.without_builtins = true;
        self
    }

    /// Adds a dictionary; it applies wherever its abstract type is declared.
    pub fn dictionary(mut self, dictionary: Dictionary) -> Self {
        self.dictionaries.push(dictionary);
        self
    }

    /// Makes a dictionary visible to the properties of record `T`.
    pub fn attach_dictionary<T: Typed>(mut self, name: impl Into<String>) -> Self {
        self.attachments.push((T::type_info(), name.into()));
        self
    }

    /// Names the concrete type `C` used for the abstract type `A` when the
    /// input carries no discriminator.
    pub fn implementation<A, C>(mut self) -> Self
    where
        A: Upcast<C> + Reflect + Typed,
        C: Typed + Reflect,
    {
        self.implementations
            .push((A::type_info(), Implementation::new::<A, C>()));
        self
    }

    /// Replaces the type-level override of record `T`.
    ///
    /// Property overrides set before are kept unless `config` names the
    /// same property.
    pub fn record_override<T: Typed>(mut self, config: RecordOverride) -> Self {
        self.push_type(T::type_info());
        let slot = self
            .overrides
            .get_or_insert(TypeId::of::<T>(), RecordOverride::default);
        let mut properties = core::mem::take(&mut slot.properties);
        properties.extend(config.properties.clone());
        *slot = RecordOverride { properties, ..config };
        self
    }

    /// Overrides one property of record `T`, by logical name.
    pub fn property_override<T: Typed>(mut self, name: impl Into<String>, config: PropertyOverride) -> Self {
        self.push_type(T::type_info());
        self.overrides
            .get_or_insert(TypeId::of::<T>(), RecordOverride::default)
            .properties
            .insert(name.into(), config);
        self
    }

    /// Treats `T` as opaque: no transform, no layout.
    pub fn treat_as_opaque<T: Typed>(mut self) -> Self {
        self.opaque.insert(TypeId::of::<T>());
        self
    }

    /// Orders the properties of every record by wire name, unless the type
    /// or its override decides otherwise.
    pub fn sort_properties(mut self, sort: bool) -> Self {
        self.sort_properties = sort;
        self
    }

    /// Validates the configuration and freezes it.
    ///
    /// Every registered type, and every type reachable from one, is
    /// classified here, so configuration errors surface before any session.
    pub fn build(self) -> Result<Registry, ConfigurationError> {
        let Self {
            types,
            mut transforms,
            without_builtins,
            dictionaries,
            attachments,
            implementations,
            overrides,
            opaque,
            sort_properties,
        } = self;

        let dictionaries = DictionarySet::build(dictionaries, attachments, implementations)?;

        if !without_builtins {
            let mut builtins = builtin_transforms();
            builtins.append(&mut transforms);
            transforms = builtins;
        }
        let transform_targets: Vec<_> = transforms.iter().map(TransformRegistration::target).collect();
        let transforms = TransformTable::build(transforms, dictionaries.abstractions(), |id| {
            dictionaries.concrete_info(id)
        })?;

        let mut seeds = types.clone();
        seeds.extend(transform_targets);
        for dictionary in dictionaries.dictionaries() {
            seeds.push(dictionary.base());
            seeds.extend(dictionary.entries().iter().map(|entry| entry.info()));
        }
        for bases in dictionaries.abstractions().values() {
            seeds.extend(bases.iter().copied());
        }
        for (concrete, _) in dictionaries.abstractions().iter() {
            seeds.extend(dictionaries.concrete_info(*concrete));
        }

        let registry = Registry {
            types,
            transforms,
            dictionaries,
            overrides,
            opaque,
            sort_properties,
            cache: DescriptorCache::new(),
        };
        registry.classify_reachable(seeds)?;

        log::debug!(
            "registry built: {} registered types, {} classified",
            registry.types.len(),
            registry.cache.len()
        );
        Ok(registry)
    }
}

impl Registry {
    fn classify_reachable(&self, seeds: Vec<&'static TypeInfo>) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::<TypeId>::default();
        let mut queue: VecDeque<_> = seeds.into();
        while let Some(info) = queue.pop_front() {
            if !seen.insert(info.type_id()) {
                continue;
            }
            let descriptor = self.classify(info)?;
            queue.extend(descriptor.classification().children());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigurationError, Registry};
    use crate::classify::Classification;
    use crate::derive::Reflect;
    use crate::dictionary::Dictionary;
    use crate::info::{ScalarKind, Typed};
    use crate::info::TypeInfo;
    use crate::introspect::{PropertyOverride, RecordOverride};
    use crate::transform::{FnTransform, Transform, TransformError};
    use crate::{Reflect, impl_abstract};
    use alloc::sync::Arc;
    use core::time::Duration;
    use std::net::IpAddr;

    pub trait Shape: Reflect {}
    impl_abstract!(dyn Shape);

    #[derive(Reflect, Default)]
    struct Pair {
        a: u8,
        b: u8,
    }
    impl Shape for u32 {}
    impl Shape for String {}

    fn hex() -> FnTransform<u32, String> {
        FnTransform::new(
            |value| format!("{value:x}"),
            |text| u32::from_str_radix(&text, 16).map_err(|err| err.to_string()),
        )
        .named("hex")
    }

    /// Writes any shape as its type name.
    struct Label;

    impl Transform for Label {
        fn name(&self) -> &str {
            "label"
        }

        fn intermediate(&self) -> &'static TypeInfo {
            String::type_info()
        }

        fn reduce(&self, value: &dyn Reflect) -> Result<Box<dyn Reflect>, TransformError> {
            Ok(Box::new(String::from(value.reflect_type_info().type_name())))
        }

        fn restore(
            &self,
            _: Box<dyn Reflect>,
            target: &'static TypeInfo,
        ) -> Result<Box<dyn Reflect>, TransformError> {
            Err(TransformError::invalid(self.name(), target.type_path()))
        }
    }

    #[test]
    fn classification_is_idempotent() {
        let registry = Registry::new();
        let first = registry.classify_type::<Vec<Option<u8>>>().unwrap();
        let second = registry.classify_type::<Vec<Option<u8>>>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        let Classification::List(shape) = first.classification() else {
            panic!("expected a list");
        };
        assert!(shape.base().is::<u8>());
    }

    #[test]
    fn precedence_of_transforms() {
        let registry = Registry::new();
        assert!(registry.classify_type::<Duration>().unwrap().transform().is_some());
        assert!(registry.classify_type::<IpAddr>().unwrap().transform().is_some());
        assert!(matches!(
            registry.classify_type::<u32>().unwrap().classification(),
            Classification::Scalar(ScalarKind::UInt)
        ));

        let registry = Registry::builder()
            .transform::<u32>(hex())
            .without_builtin_transforms()
            .treat_as_opaque::<IpAddr>()
            .build()
            .unwrap();
        assert_eq!(
            registry.classify_type::<u32>().unwrap().transform().unwrap().name(),
            "hex"
        );
        assert!(matches!(
            registry.classify_type::<Duration>().unwrap().classification(),
            Classification::Opaque
        ));
        assert!(matches!(
            registry.classify_type::<IpAddr>().unwrap().classification(),
            Classification::Opaque
        ));
    }

    #[test]
    fn abstraction_transform_reaches_registered_concretes() {
        let shapes = Dictionary::builder::<Box<dyn Shape>>("shapes")
            .entry::<u32>("number")
            .entry::<String>("text")
            .build();
        let registry = Registry::builder()
            .dictionary(shapes)
            .transform::<Box<dyn Shape>>(Label)
            .transform::<u32>(hex())
            .build()
            .unwrap();

        let declared = <Box<dyn Shape>>::type_info();
        let by_u32 = registry
            .transform_for_value(declared, u32::type_info())
            .unwrap()
            .unwrap();
        assert_eq!(by_u32.name(), "hex");
        let by_string = registry
            .transform_for_value(declared, String::type_info())
            .unwrap()
            .unwrap();
        assert_eq!(by_string.name(), "label");
        assert!(
            registry
                .transform_for_value(u8::type_info(), u8::type_info())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn build_reports_configuration_errors() {
        let err = Registry::builder()
            .transform::<u32>(hex())
            .transform::<u32>(hex())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::AmbiguousTransform { priority: 0, .. }));

        let ok = Registry::builder()
            .transform::<u32>(hex())
            .transform_with_priority::<u32>(hex(), 1)
            .build();
        assert!(ok.is_ok());

        let err = Registry::builder()
            .attach_dictionary::<u8>("missing")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownDictionary {
                name: "missing".into()
            }
        );

        let duplicated = || Dictionary::builder::<Box<dyn Shape>>("shapes").entry::<u32>("n").build();
        let err = Registry::builder()
            .dictionary(duplicated())
            .dictionary(duplicated())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateDictionary { .. }));

        let err = Registry::builder()
            .property_override::<Pair>("b", PropertyOverride::new().with_rename("a"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateProperty { ref name, .. } if name == "a"));

        let err = Registry::builder()
            .property_override::<Pair>("nope", PropertyOverride::new().with_rename("x"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownProperty { ref property, .. } if property == "nope"));

        let err = Registry::builder()
            .record_override::<Pair>(RecordOverride::new().with_property("nope", PropertyOverride::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownProperty { .. }));
    }

    #[test]
    fn overrides_merge_and_concurrent_classification() {
        let registry = Arc::new(
            Registry::builder()
                .register::<Vec<Vec<Option<String>>>>()
                .build()
                .unwrap(),
        );
        let before = registry.classified_len();
        assert!(before >= 4);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.classify_type::<[Option<i16>; 3]>().unwrap())
            })
            .collect();
        let descriptors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for descriptor in &descriptors[1..] {
            assert!(Arc::ptr_eq(&descriptors[0], descriptor));
        }
        assert_eq!(registry.classified_len(), before + 1);
    }
}
