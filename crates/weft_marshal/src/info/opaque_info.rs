use core::fmt::Display;
use core::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Reflect;
use crate::info::{Type, impl_type_fn};
use crate::node::Node;

// -----------------------------------------------------------------------------
// OpaqueInfo

/// Metadata for types whose internals are opaque to the engine.
///
/// An opaque type is only marshalled through a transform: an explicit
/// registration or the [`ImplicitForm`] it declares.
#[derive(Debug)]
pub struct OpaqueInfo {
    ty: Type,
    implicit: Option<ImplicitForm>,
}

impl OpaqueInfo {
    impl_type_fn!(ty);

    /// Creates a new [`OpaqueInfo`].
    #[inline]
    pub fn new<T: Reflect>() -> Self {
        Self {
            ty: Type::of::<T>(),
            implicit: None,
        }
    }

    /// Overrides the type path.
    pub fn with_type_path(mut self, path: &'static str) -> Self {
        self.ty = self.ty.renamed(path);
        self
    }

    /// Declares the transform this type carries.
    pub fn with_implicit_form(mut self, form: ImplicitForm) -> Self {
        self.implicit = Some(form);
        self
    }

    /// Returns the declared transform.
    #[inline]
    pub const fn implicit_form(&self) -> Option<&ImplicitForm> {
        self.implicit.as_ref()
    }
}

// -----------------------------------------------------------------------------
// AbstractInfo

/// Metadata for polymorphic declared types such as `Box<dyn Shape>`.
///
/// The concrete type is only known at runtime. Parsing needs a discriminator,
/// a registered implementation, or a universal upcast (`Box<dyn Reflect>`).
#[derive(Debug)]
pub struct AbstractInfo {
    ty: Type,
    upcast_any: Option<fn(Box<dyn Reflect>) -> Box<dyn Reflect>>,
}

impl AbstractInfo {
    impl_type_fn!(ty);

    /// Creates a new [`AbstractInfo`].
    #[inline]
    pub fn new<T: Reflect>() -> Self {
        Self {
            ty: Type::of::<T>(),
            upcast_any: None,
        }
    }

    /// Marks the type as able to hold any reflected value.
    pub fn with_upcast_any(mut self, upcast: fn(Box<dyn Reflect>) -> Box<dyn Reflect>) -> Self {
        self.upcast_any = Some(upcast);
        self
    }

    /// Returns the universal upcast, if the type holds any value.
    #[inline]
    pub const fn upcast_any(&self) -> Option<fn(Box<dyn Reflect>) -> Box<dyn Reflect>> {
        self.upcast_any
    }
}

// -----------------------------------------------------------------------------
// DynamicInfo

/// Metadata for values that carry their own shape, such as [`Node`].
#[derive(Debug)]
pub struct DynamicInfo {
    ty: Type,
    from_node: fn(&Node) -> Box<dyn Reflect>,
}

impl DynamicInfo {
    impl_type_fn!(ty);

    /// Creates a new [`DynamicInfo`].
    #[inline]
    pub fn new<T: Reflect>(from_node: fn(&Node) -> Box<dyn Reflect>) -> Self {
        Self {
            ty: Type::of::<T>(),
            from_node,
        }
    }

    /// Builds a value from a tree.
    #[inline]
    pub fn from_node(&self, node: &Node) -> Box<dyn Reflect> {
        (self.from_node)(node)
    }
}

// -----------------------------------------------------------------------------
// ImplicitForm

/// A transform a type declares for itself.
///
/// Explicit transforms registered in the [`Registry`] always take precedence.
///
/// [`Registry`]: crate::Registry
#[derive(Debug, Clone, Copy)]
pub enum ImplicitForm {
    /// Written as the `Display` string, read back with `FromStr`.
    String(StringForm),
    /// Written and read through the type's own serde implementation.
    Serde(SerdeForm),
}

impl ImplicitForm {
    /// A string form backed by `Display` and `FromStr`.
    pub fn string<T>() -> Self
    where
        T: Reflect + Display + FromStr,
        T::Err: Display,
    {
        Self::String(StringForm {
            to_string: to_string_impl::<T>,
            parse: parse_impl::<T>,
        })
    }

    /// A serde form backed by `Serialize` and `DeserializeOwned`.
    pub fn serde<T: Reflect + Serialize + DeserializeOwned>() -> Self {
        Self::Serde(SerdeForm {
            serialize: serialize_impl::<T>,
            deserialize: deserialize_impl::<T>,
        })
    }
}

/// See [`ImplicitForm::String`].
#[derive(Debug, Clone, Copy)]
pub struct StringForm {
    to_string: fn(&dyn Reflect) -> Option<String>,
    parse: fn(&str) -> Result<Box<dyn Reflect>, String>,
}

impl StringForm {
    /// Renders the value, `None` if it is not of the declaring type.
    #[inline]
    pub fn to_string(&self, value: &dyn Reflect) -> Option<String> {
        (self.to_string)(value)
    }

    /// Parses the value back.
    #[inline]
    pub fn parse(&self, text: &str) -> Result<Box<dyn Reflect>, String> {
        (self.parse)(text)
    }
}

/// See [`ImplicitForm::Serde`].
#[derive(Debug, Clone, Copy)]
pub struct SerdeForm {
    serialize: fn(&dyn Reflect) -> Option<&dyn erased_serde::Serialize>,
    deserialize:
        fn(&mut dyn erased_serde::Deserializer<'_>) -> Result<Box<dyn Reflect>, erased_serde::Error>,
}

impl SerdeForm {
    /// Views the value as a serde `Serialize`, `None` if it is not of the declaring type.
    #[inline]
    pub fn serializable<'a>(&self, value: &'a dyn Reflect) -> Option<&'a dyn erased_serde::Serialize> {
        (self.serialize)(value)
    }

    /// Deserializes a value of the declaring type.
    #[inline]
    pub fn deserialize(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'_>,
    ) -> Result<Box<dyn Reflect>, erased_serde::Error> {
        (self.deserialize)(deserializer)
    }
}

fn to_string_impl<T: Reflect + Display>(value: &dyn Reflect) -> Option<String> {
    value.downcast_ref::<T>().map(ToString::to_string)
}

fn parse_impl<T>(text: &str) -> Result<Box<dyn Reflect>, String>
where
    T: Reflect + FromStr,
    T::Err: Display,
{
    text.parse::<T>()
        .map(|value| Box::new(value) as Box<dyn Reflect>)
        .map_err(|err| err.to_string())
}

fn serialize_impl<T: Reflect + Serialize>(value: &dyn Reflect) -> Option<&dyn erased_serde::Serialize> {
    value
        .downcast_ref::<T>()
        .map(|value| value as &dyn erased_serde::Serialize)
}

fn deserialize_impl<T: Reflect + DeserializeOwned>(
    deserializer: &mut dyn erased_serde::Deserializer<'_>,
) -> Result<Box<dyn Reflect>, erased_serde::Error> {
    erased_serde::deserialize::<T>(deserializer).map(|value| Box::new(value) as Box<dyn Reflect>)
}
