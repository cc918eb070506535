use core::any::TypeId;
use core::{error, fmt};

use crate::Reflect;
use crate::info::{AbstractInfo, DynamicInfo, ImplicitForm, OpaqueInfo};
use crate::info::{ArrayInfo, ListInfo, MapInfo, OptionalInfo, PointerInfo};
use crate::info::{EnumInfo, RecordInfo, ScalarInfo, Type};

// -----------------------------------------------------------------------------
// ReflectKind

/// An enumeration of the "kinds" of a reflected type.
///
/// Each kind corresponds to one variant of [`TypeInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Scalar,
    Enum,
    List,
    Array,
    Map,
    Record,
    Optional,
    Pointer,
    Abstract,
    Dynamic,
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.pad("Scalar"),
            Self::Enum => f.pad("Enum"),
            Self::List => f.pad("List"),
            Self::Array => f.pad("Array"),
            Self::Map => f.pad("Map"),
            Self::Record => f.pad("Record"),
            Self::Optional => f.pad("Optional"),
            Self::Pointer => f.pad("Pointer"),
            Self::Abstract => f.pad("Abstract"),
            Self::Dynamic => f.pad("Dynamic"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

/// Error returned when a `TypeInfo` value is not the expected `ReflectKind`.
#[derive(Debug)]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

impl fmt::Display for ReflectKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reflect kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for ReflectKindError {}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time type information for reflected types.
///
/// A type's `TypeInfo` is defined by its [`Typed`] implementation and lives
/// for the whole program. Child types (list items, property types, ...) are
/// referenced through `fn() -> &'static TypeInfo`, so recursive types are
/// described without infinite construction.
///
/// For a value at hand use [`DynamicTyped::reflect_type_info`]; for a type
/// known at compile time use [`Typed::type_info`].
///
/// [`Typed`]: crate::info::Typed
/// [`Typed::type_info`]: crate::info::Typed::type_info
/// [`DynamicTyped::reflect_type_info`]: crate::info::DynamicTyped::reflect_type_info
#[derive(Debug)]
pub enum TypeInfo {
    Scalar(ScalarInfo),
    Enum(EnumInfo),
    List(ListInfo),
    Array(ArrayInfo),
    Map(MapInfo),
    Record(RecordInfo),
    Optional(OptionalInfo),
    Pointer(PointerInfo),
    Abstract(AbstractInfo),
    Dynamic(DynamicInfo),
    Opaque(OpaqueInfo),
}

// Helper macro that implements type-safe accessor methods like `as_record`.
macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Convert [`TypeInfo`] to the specific type information.
        pub const fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_scalar: Scalar => ScalarInfo);
    impl_cast_method!(as_enum: Enum => EnumInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_array: Array => ArrayInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_record: Record => RecordInfo);
    impl_cast_method!(as_optional: Optional => OptionalInfo);
    impl_cast_method!(as_pointer: Pointer => PointerInfo);
    impl_cast_method!(as_abstract: Abstract => AbstractInfo);
    impl_cast_method!(as_dynamic: Dynamic => DynamicInfo);
    impl_cast_method!(as_opaque: Opaque => OpaqueInfo);

    /// Returns the underlying [`Type`] metadata for this `TypeInfo`.
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Scalar(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Record(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::Pointer(info) => info.ty(),
            Self::Abstract(info) => info.ty(),
            Self::Dynamic(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
        }
    }

    /// Returns the [`ReflectKind`] of this `TypeInfo`.
    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Scalar(_) => ReflectKind::Scalar,
            Self::Enum(_) => ReflectKind::Enum,
            Self::List(_) => ReflectKind::List,
            Self::Array(_) => ReflectKind::Array,
            Self::Map(_) => ReflectKind::Map,
            Self::Record(_) => ReflectKind::Record,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Pointer(_) => ReflectKind::Pointer,
            Self::Abstract(_) => ReflectKind::Abstract,
            Self::Dynamic(_) => ReflectKind::Dynamic,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }

    /// Returns the [`TypeId`].
    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    /// Returns the type path.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    /// Returns the type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.ty().is::<T>()
    }

    /// Returns `true` if a null value is a valid instance of this type.
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Optional(_) | Self::Dynamic(_))
    }

    /// Returns the transform this type declares for itself, if any.
    pub const fn implicit_form(&self) -> Option<&ImplicitForm> {
        match self {
            Self::Record(info) => info.implicit_form(),
            Self::Opaque(info) => info.implicit_form(),
            _ => None,
        }
    }

    /// Returns the default-value constructor, if the type has one.
    pub fn constructor(&self) -> Option<fn() -> Box<dyn Reflect>> {
        match self {
            Self::Record(info) => info.constructor(),
            Self::List(info) => Some(info.constructor()),
            Self::Map(info) => Some(info.constructor()),
            Self::Optional(info) => Some(info.constructor()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::info::{ReflectKind, Typed};
    use alloc::string::String;
    use alloc::vec::Vec;

    #[test]
    fn cast_reports_both_kinds() {
        let info = <Vec<u8>>::type_info();
        assert!(info.as_list().is_ok());
        let err = info.as_record().unwrap_err();
        assert_eq!(err.expected, ReflectKind::Record);
        assert_eq!(err.received, ReflectKind::List);
        assert_eq!(
            err.to_string(),
            "reflect kind mismatch: expected Record, received List"
        );
    }

    #[test]
    fn nullable_kinds() {
        assert!(<Option<String>>::type_info().is_nullable());
        assert!(!String::type_info().is_nullable());
    }
}
