//! Type dictionaries: closed maps from discriminator tokens to concrete types.
//!
//! A [`Dictionary`] is bound to the abstract type it resolves, for example
//! `Box<dyn Shape>`. Each [`DictionaryEntry`] pairs a token with a concrete
//! type and knows how to upcast a parsed value of that type into the
//! abstraction.
//!
//! Dictionaries are looked up through scopes: the declared type itself, the
//! record enclosing the value, and the configured default scope.

use core::any::TypeId;
use core::marker::PhantomData;

use weft_utils::TypeIdMap;
use weft_utils::hash::HashMap;

use crate::info::{TypeInfo, Typed};
use crate::registry::ConfigurationError;
use crate::{Reflect, Upcast};

/// Converts a concrete value into the abstraction it was registered under.
///
/// Hands the value back if it is not of the registered concrete type.
pub type UpcastFn = fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>;

fn upcast_fn<A: Upcast<C> + Reflect, C: Reflect>(
    value: Box<dyn Reflect>,
) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    let concrete = value.take::<C>()?;
    Ok(Box::new(A::upcast(concrete)))
}

// -----------------------------------------------------------------------------
// Dictionary

/// One `(token, concrete type)` pair.
#[derive(Debug, Clone)]
pub struct DictionaryEntry {
    token: String,
    info: &'static TypeInfo,
    upcast: UpcastFn,
}

impl DictionaryEntry {
    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the concrete type.
    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    /// Upcasts a parsed concrete value into the dictionary's abstraction.
    #[inline]
    pub fn upcast(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.upcast)(value)
    }
}

/// A named, closed set of discriminator tokens for one abstract type.
#[derive(Debug, Clone)]
pub struct Dictionary {
    name: String,
    base: &'static TypeInfo,
    entries: Vec<DictionaryEntry>,
}

impl Dictionary {
    /// Starts a dictionary resolving the abstract type `A`.
    ///
    /// # Examples
    ///
    /// ```
    /// use weft_marshal::Reflect;
    /// use weft_marshal::dictionary::Dictionary;
    ///
    /// let dictionary = Dictionary::builder::<Box<dyn Reflect>>("numbers")
    ///     .entry::<u8>("byte")
    ///     .entry::<f64>("double")
    ///     .build();
    ///
    /// assert_eq!(dictionary.token_of(core::any::TypeId::of::<f64>()), Some("double"));
    /// assert!(dictionary.entry("byte").unwrap().info().is::<u8>());
    /// ```
    pub fn builder<A: Typed + Reflect>(name: impl Into<String>) -> DictionaryBuilder<A> {
        DictionaryBuilder {
            name: name.into(),
            entries: Vec::new(),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the abstract type the dictionary resolves.
    #[inline]
    pub fn base(&self) -> &'static TypeInfo {
        self.base
    }

    #[inline]
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// Returns the entry registered under `token`.
    pub fn entry(&self, token: &str) -> Option<&DictionaryEntry> {
        self.entries.iter().find(|entry| entry.token == token)
    }

    /// Returns the token of a concrete type.
    pub fn token_of(&self, type_id: TypeId) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.info.type_id() == type_id)
            .map(|entry| entry.token.as_str())
    }
}

/// Builder of [`Dictionary`], see [`Dictionary::builder`].
pub struct DictionaryBuilder<A> {
    name: String,
    entries: Vec<DictionaryEntry>,
    _marker: PhantomData<fn() -> A>,
}

impl<A: Typed + Reflect> DictionaryBuilder<A> {
    /// Registers the concrete type `C` under `token`.
    pub fn entry<C: Typed + Reflect>(mut self, token: impl Into<String>) -> Self
    where
        A: Upcast<C>,
    {
        self.entries.push(DictionaryEntry {
            token: token.into(),
            info: C::type_info(),
            upcast: upcast_fn::<A, C>,
        });
        self
    }

    pub fn build(self) -> Dictionary {
        Dictionary {
            name: self.name,
            base: A::type_info(),
            entries: self.entries,
        }
    }
}

// -----------------------------------------------------------------------------
// DictionarySet

/// The concrete type used for an abstract type when the input carries no
/// discriminator.
#[derive(Debug, Clone, Copy)]
pub struct Implementation {
    info: &'static TypeInfo,
    upcast: UpcastFn,
}

impl Implementation {
    pub(crate) fn new<A: Upcast<C> + Reflect, C: Typed + Reflect>() -> Self {
        Self {
            info: C::type_info(),
            upcast: upcast_fn::<A, C>,
        }
    }

    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    #[inline]
    pub fn upcast(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.upcast)(value)
    }
}

/// Every dictionary of a registry, indexed for both directions.
#[derive(Debug, Default)]
pub struct DictionarySet {
    dictionaries: Vec<Dictionary>,
    by_name: HashMap<String, usize>,
    scopes: TypeIdMap<Vec<usize>>,
    /// `(abstract, concrete)` pairs.
    upcasts: HashMap<(TypeId, TypeId), UpcastFn>,
    /// Concrete type to the abstract types it is registered under.
    abstractions: TypeIdMap<Vec<&'static TypeInfo>>,
    concrete: TypeIdMap<&'static TypeInfo>,
    implementations: TypeIdMap<(&'static TypeInfo, Implementation)>,
}

impl DictionarySet {
    /// Validates and indexes the dictionaries.
    ///
    /// `attachments` binds extra scopes (usually records) to dictionary names.
    pub(crate) fn build(
        dictionaries: Vec<Dictionary>,
        attachments: Vec<(&'static TypeInfo, String)>,
        implementations: Vec<(&'static TypeInfo, Implementation)>,
    ) -> Result<Self, ConfigurationError> {
        let mut set = Self::default();
        // (base, concrete) -> token, across every dictionary of one base.
        let mut tokens: HashMap<(TypeId, TypeId), String> = HashMap::default();

        for dictionary in dictionaries {
            let index = set.dictionaries.len();
            if set.by_name.contains_key(&dictionary.name) {
                return Err(ConfigurationError::DuplicateDictionary {
                    name: dictionary.name,
                });
            }

            for (position, entry) in dictionary.entries.iter().enumerate() {
                if dictionary.entries[..position]
                    .iter()
                    .any(|other| other.token == entry.token)
                {
                    return Err(ConfigurationError::DuplicateDiscriminator {
                        dictionary: dictionary.name.clone(),
                        token: entry.token.clone(),
                    });
                }

                let key = (dictionary.base.type_id(), entry.info.type_id());
                match tokens.get(&key) {
                    Some(first) if *first != entry.token => {
                        return Err(ConfigurationError::AmbiguousDictionaryType {
                            base: dictionary.base.type_path(),
                            ty: entry.info.type_path(),
                            first: first.clone(),
                            second: entry.token.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        tokens.insert(key, entry.token.clone());
                    }
                }

                set.register_upcast(dictionary.base, entry.info, entry.upcast);
            }

            set.scopes
                .get_or_insert(dictionary.base.type_id(), Vec::new)
                .push(index);
            set.by_name.insert(dictionary.name.clone(), index);
            set.dictionaries.push(dictionary);
        }

        for (scope, name) in attachments {
            let index = set.index_of(&name)?;
            let scopes = set.scopes.get_or_insert(scope.type_id(), Vec::new);
            if !scopes.contains(&index) {
                scopes.push(index);
            }
        }

        for (base, implementation) in implementations {
            set.register_upcast(base, implementation.info, implementation.upcast);
            set.implementations
                .insert(base.type_id(), (base, implementation));
        }

        Ok(set)
    }

    fn register_upcast(&mut self, base: &'static TypeInfo, concrete: &'static TypeInfo, upcast: UpcastFn) {
        self.upcasts
            .insert((base.type_id(), concrete.type_id()), upcast);
        let bases = self.abstractions.get_or_insert(concrete.type_id(), Vec::new);
        if !bases.iter().any(|known| known.type_id() == base.type_id()) {
            bases.push(base);
        }
        self.concrete.insert(concrete.type_id(), concrete);
    }

    fn index_of(&self, name: &str) -> Result<usize, ConfigurationError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownDictionary { name: name.into() })
    }

    #[inline]
    pub fn dictionaries(&self) -> &[Dictionary] {
        &self.dictionaries
    }

    /// Returns the dictionary with the given name.
    pub fn get(&self, name: &str) -> Option<&Dictionary> {
        self.by_name.get(name).map(|index| &self.dictionaries[*index])
    }

    /// Concrete types mapped to the abstractions they are registered under.
    #[inline]
    pub(crate) fn abstractions(&self) -> &TypeIdMap<Vec<&'static TypeInfo>> {
        &self.abstractions
    }

    /// Returns the info of a concrete type known through a registration.
    pub(crate) fn concrete_info(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.concrete.get(&type_id).copied()
    }

    /// Dictionaries visible from the given scopes, in lookup order.
    fn visible<'s>(
        &'s self,
        scopes: &[TypeId],
        defaults: &[String],
    ) -> impl Iterator<Item = Result<&'s Dictionary, ConfigurationError>> {
        let scoped = scopes
            .iter()
            .filter_map(|scope| self.scopes.get(scope))
            .flatten()
            .map(|index| Ok(&self.dictionaries[*index]));
        let defaults = defaults
            .iter()
            .map(|name| self.index_of(name).map(|index| &self.dictionaries[index]));
        scoped.chain(defaults)
    }

    /// Returns the token to write for `runtime` where `declared` is expected.
    ///
    /// `None` when the types are equal or no visible dictionary knows the
    /// runtime type. `scopes` lists the declared type and the enclosing
    /// record, in that order.
    pub fn discriminator_for(
        &self,
        declared: &'static TypeInfo,
        runtime: &'static TypeInfo,
        scopes: &[TypeId],
        defaults: &[String],
    ) -> Result<Option<&str>, ConfigurationError> {
        if declared.type_id() == runtime.type_id() {
            return Ok(None);
        }
        for dictionary in self.visible(scopes, defaults) {
            if let Some(token) = dictionary?.token_of(runtime.type_id()) {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }

    /// Resolves a token read from the input.
    pub fn resolve(
        &self,
        token: &str,
        scopes: &[TypeId],
        defaults: &[String],
    ) -> Result<Option<&DictionaryEntry>, ConfigurationError> {
        for dictionary in self.visible(scopes, defaults) {
            if let Some(entry) = dictionary?.entry(token) {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Returns the implementation registered for an abstract type.
    pub fn implementation(&self, base: TypeId) -> Option<&Implementation> {
        self.implementations.get(&base).map(|(_, implementation)| implementation)
    }

    /// Converts a parsed value into the declared type.
    ///
    /// Values of the declared type pass through; otherwise a registered
    /// upcast or the declared type's universal upcast applies.
    pub fn upcast(
        &self,
        declared: &'static TypeInfo,
        value: Box<dyn Reflect>,
    ) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        let runtime = (*value).ty_id();
        if runtime == declared.type_id() {
            return Ok(value);
        }
        if let Some(upcast) = self.upcasts.get(&(declared.type_id(), runtime)) {
            return upcast(value);
        }
        match declared {
            TypeInfo::Abstract(info) => match info.upcast_any() {
                Some(upcast) => Ok(upcast(value)),
                None => Err(value),
            },
            _ => Err(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Dictionary, DictionarySet, Implementation};
    use crate::info::Typed;
    use crate::registry::ConfigurationError;
    use crate::{Reflect, impl_abstract};
    use core::any::TypeId;

    pub trait Unit: Reflect {}
    impl_abstract!(dyn Unit);
    impl Unit for u8 {}
    impl Unit for u16 {}

    fn units() -> Dictionary {
        Dictionary::builder::<Box<dyn Unit>>("units")
            .entry::<u8>("small")
            .entry::<u16>("large")
            .build()
    }

    fn any_scope() -> Vec<TypeId> {
        vec![TypeId::of::<Box<dyn Unit>>()]
    }

    #[test]
    fn tokens_resolve_both_ways() {
        let set = DictionarySet::build(vec![units()], Vec::new(), Vec::new()).unwrap();
        let declared = <Box<dyn Unit>>::type_info();

        let token = set
            .discriminator_for(declared, u16::type_info(), &any_scope(), &[])
            .unwrap();
        assert_eq!(token, Some("large"));

        // Same type: no discriminator.
        let token = set
            .discriminator_for(u16::type_info(), u16::type_info(), &any_scope(), &[])
            .unwrap();
        assert_eq!(token, None);

        let entry = set.resolve("small", &any_scope(), &[]).unwrap().unwrap();
        assert!(entry.info().is::<u8>());
        let value = entry.upcast(Box::new(3_u8)).unwrap();
        assert!(value.is::<Box<dyn Unit>>());

        assert!(set.resolve("medium", &any_scope(), &[]).unwrap().is_none());
        assert!(set.resolve("small", &[], &[]).unwrap().is_none());
    }

    #[test]
    fn default_scope_by_name() {
        let set = DictionarySet::build(vec![units()], Vec::new(), Vec::new()).unwrap();
        let defaults = vec![String::from("units")];
        assert!(set.resolve("large", &[], &defaults).unwrap().is_some());

        let missing = vec![String::from("nope")];
        let err = set.resolve("large", &[], &missing).unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownDictionary { name: "nope".into() });
    }

    #[test]
    fn build_time_errors() {
        let twice = Dictionary::builder::<Box<dyn Unit>>("units")
            .entry::<u8>("a")
            .entry::<u16>("a")
            .build();
        assert!(matches!(
            DictionarySet::build(vec![twice], Vec::new(), Vec::new()),
            Err(ConfigurationError::DuplicateDiscriminator { .. })
        ));

        assert!(matches!(
            DictionarySet::build(vec![units(), units()], Vec::new(), Vec::new()),
            Err(ConfigurationError::DuplicateDictionary { .. })
        ));

        let other = Dictionary::builder::<Box<dyn Unit>>("aliases")
            .entry::<u8>("tiny")
            .build();
        assert!(matches!(
            DictionarySet::build(vec![units(), other], Vec::new(), Vec::new()),
            Err(ConfigurationError::AmbiguousDictionaryType { .. })
        ));

        // A different declaring type may use its own token.
        let any = Dictionary::builder::<Box<dyn Reflect>>("any")
            .entry::<u8>("tiny")
            .build();
        assert!(DictionarySet::build(vec![units(), any], Vec::new(), Vec::new()).is_ok());

        let attach = vec![(u32::type_info(), String::from("missing"))];
        assert!(matches!(
            DictionarySet::build(vec![units()], attach, Vec::new()),
            Err(ConfigurationError::UnknownDictionary { .. })
        ));
    }

    #[test]
    fn upcast_through_registrations() {
        let implementation = Implementation::new::<Box<dyn Unit>, u16>();
        let declared = <Box<dyn Unit>>::type_info();
        let set =
            DictionarySet::build(Vec::new(), Vec::new(), vec![(declared, implementation)]).unwrap();

        assert!(set.implementation(TypeId::of::<Box<dyn Unit>>()).is_some());
        assert!(set.upcast(declared, Box::new(1_u16)).unwrap().is::<Box<dyn Unit>>());
        assert!(set.upcast(declared, Box::new(1_u8)).is_err());
        assert!(set.upcast(u8::type_info(), Box::new(1_u8)).unwrap().is::<u8>());

        let any = <Box<dyn Reflect>>::type_info();
        assert!(set.upcast(any, Box::new(1_i64)).unwrap().is::<Box<dyn Reflect>>());
    }
}
