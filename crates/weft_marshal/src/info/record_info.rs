use core::any::TypeId;
use core::fmt::Display;
use core::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Reflect;
use crate::info::{ImplicitForm, Type, TypeInfo, Typed, impl_type_fn};

// -----------------------------------------------------------------------------
// Accessors

/// Borrows a field out of the record passed in.
pub type FieldRef = fn(&dyn Reflect) -> Option<&dyn Reflect>;
/// Mutably borrows a field out of the record passed in.
pub type FieldMut = fn(&mut dyn Reflect) -> Option<&mut dyn Reflect>;
/// Computes a property value from the record passed in.
pub type ComputedRef = fn(&dyn Reflect) -> Option<Box<dyn Reflect>>;
/// Stores a value into the record passed in, handing it back on a type mismatch.
pub type Setter = fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

/// The read accessor of a property.
#[derive(Debug, Clone, Copy)]
pub enum Getter {
    /// A stored field, borrowed in place.
    Field(FieldRef),
    /// A derived value, produced on every read.
    Computed(ComputedRef),
}

/// Whether a property takes part in marshalling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inclusion {
    /// Always written, even when empty or not public.
    Always,
    /// Written unless filtered out by configuration.
    #[default]
    Conditional,
    /// Never marshalled.
    Never,
}

/// The declared visibility of a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

// -----------------------------------------------------------------------------
// PropertyInfo

/// One entry of a record's property table.
///
/// A property is a named, typed slot with optional read and write accessors.
/// Accessors receive the record itself as `&dyn Reflect` and downcast it.
#[derive(Debug, Clone)]
pub struct PropertyInfo {
    name: &'static str,
    rename: Option<&'static str>,
    aliases: &'static [&'static str],
    type_id: TypeId,
    type_info: fn() -> &'static TypeInfo,
    getter: Option<Getter>,
    getter_mut: Option<FieldMut>,
    setter: Option<Setter>,
    inclusion: Inclusion,
    visibility: Visibility,
    flatten: bool,
}

impl PropertyInfo {
    const fn empty<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            rename: None,
            aliases: &[],
            type_id: TypeId::of::<T>(),
            type_info: T::type_info,
            getter: None,
            getter_mut: None,
            setter: None,
            inclusion: Inclusion::Conditional,
            visibility: Visibility::Public,
            flatten: false,
        }
    }

    /// A stored field, readable and writable.
    pub const fn field<T: Typed>(name: &'static str, get: FieldRef, get_mut: FieldMut, set: Setter) -> Self {
        let mut info = Self::empty::<T>(name);
        info.getter = Some(Getter::Field(get));
        info.getter_mut = Some(get_mut);
        info.setter = Some(set);
        info
    }

    /// A derived, read-only value.
    pub const fn computed<T: Typed>(name: &'static str, get: ComputedRef) -> Self {
        let mut info = Self::empty::<T>(name);
        info.getter = Some(Getter::Computed(get));
        info
    }

    /// A write-only slot.
    pub const fn setter<T: Typed>(name: &'static str, set: Setter) -> Self {
        let mut info = Self::empty::<T>(name);
        info.setter = Some(set);
        info
    }

    /// Removes the write accessor.
    pub const fn read_only(mut self) -> Self {
        self.setter = None;
        self
    }

    /// Removes the read accessor.
    pub const fn write_only(mut self) -> Self {
        self.getter = None;
        self
    }

    /// Sets the wire name.
    pub const fn renamed(mut self, name: &'static str) -> Self {
        self.rename = Some(name);
        self
    }

    /// Adds names accepted when parsing.
    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub const fn with_inclusion(mut self, inclusion: Inclusion) -> Self {
        self.inclusion = inclusion;
        self
    }

    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Marks the property as a parent whose properties are inlined.
    ///
    /// The property must be a stored field of record type.
    pub const fn flattened(mut self) -> Self {
        self.flatten = true;
        self
    }

    /// Returns the logical name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared wire name, if it differs from the logical name.
    #[inline]
    pub const fn rename(&self) -> Option<&'static str> {
        self.rename
    }

    #[inline]
    pub const fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    /// Returns the `TypeId` of the property type.
    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the [`TypeInfo`] of the property type.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub const fn type_info_fn(&self) -> fn() -> &'static TypeInfo {
        self.type_info
    }

    #[inline]
    pub const fn getter(&self) -> Option<Getter> {
        self.getter
    }

    #[inline]
    pub const fn getter_mut(&self) -> Option<FieldMut> {
        self.getter_mut
    }

    #[inline]
    pub const fn setter_fn(&self) -> Option<Setter> {
        self.setter
    }

    /// Returns the borrowing read accessor, if the property is a stored field.
    #[inline]
    pub const fn field_ref(&self) -> Option<FieldRef> {
        match self.getter {
            Some(Getter::Field(get)) => Some(get),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    #[inline]
    pub const fn inclusion(&self) -> Inclusion {
        self.inclusion
    }

    #[inline]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub const fn is_flatten(&self) -> bool {
        self.flatten
    }
}

// -----------------------------------------------------------------------------
// RecordInfo

/// Metadata for structured records.
///
/// Built with [`RecordInfo::builder`], usually by `#[derive(Reflect)]`.
#[derive(Debug)]
pub struct RecordInfo {
    ty: Type,
    properties: Box<[PropertyInfo]>,
    constructor: Option<fn() -> Box<dyn Reflect>>,
    implicit: Option<ImplicitForm>,
    sort_properties: bool,
}

impl RecordInfo {
    impl_type_fn!(ty);

    /// Starts building the info of record type `T`.
    #[inline]
    pub fn builder<T: Reflect>() -> RecordInfoBuilder {
        RecordInfoBuilder {
            info: RecordInfo {
                ty: Type::of::<T>(),
                properties: Box::new([]),
                constructor: None,
                implicit: None,
                sort_properties: false,
            },
            properties: Vec::new(),
        }
    }

    /// Returns the property table in declaration order.
    #[inline]
    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    /// Returns the property with the given logical name.
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// Returns the default-value constructor.
    #[inline]
    pub const fn constructor(&self) -> Option<fn() -> Box<dyn Reflect>> {
        self.constructor
    }

    /// Returns the declared transform.
    #[inline]
    pub const fn implicit_form(&self) -> Option<&ImplicitForm> {
        self.implicit.as_ref()
    }

    /// Returns `true` if properties are ordered by name instead of declaration.
    #[inline]
    pub const fn sort_properties(&self) -> bool {
        self.sort_properties
    }
}

/// Builder of [`RecordInfo`].
pub struct RecordInfoBuilder {
    info: RecordInfo,
    properties: Vec<PropertyInfo>,
}

impl RecordInfoBuilder {
    /// Appends a property.
    pub fn property(mut self, property: PropertyInfo) -> Self {
        self.properties.push(property);
        self
    }

    /// Overrides the type path.
    pub fn type_path(mut self, path: &'static str) -> Self {
        self.info.ty = self.info.ty.renamed(path);
        self
    }

    pub fn constructor(mut self, constructor: fn() -> Box<dyn Reflect>) -> Self {
        self.info.constructor = Some(constructor);
        self
    }

    /// Uses `T::default()` as the constructor.
    pub fn default_constructor<T: Reflect + Default>(self) -> Self {
        self.constructor(|| Box::new(T::default()))
    }

    /// Marshals the record as its `Display` string instead of its properties.
    pub fn string_form<T>(mut self) -> Self
    where
        T: Reflect + Display + FromStr,
        T::Err: Display,
    {
        self.info.implicit = Some(ImplicitForm::string::<T>());
        self
    }

    /// Marshals the record through its own serde implementation.
    pub fn serde_form<T: Reflect + Serialize + DeserializeOwned>(mut self) -> Self {
        self.info.implicit = Some(ImplicitForm::serde::<T>());
        self
    }

    /// Orders properties by wire name.
    pub fn sort_properties(mut self, sort: bool) -> Self {
        self.info.sort_properties = sort;
        self
    }

    pub fn build(mut self) -> RecordInfo {
        self.info.properties = self.properties.into_boxed_slice();
        self.info
    }
}
