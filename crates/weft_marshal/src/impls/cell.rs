//! Containers for static storage of type information.
//!
//! This is usually used to implement [`Typed`](crate::info::Typed).
//!
//! - [`NonGenericTypeInfoCell`]: a [`OnceLock`], for non-generic types.
//! - [`GenericTypeInfoCell`]: a [`TypeIdMap`] behind a [`RwLock`]. A `static`
//!   inside a generic function is shared by every instantiation, so the cell
//!   keys the leaked infos by the concrete type.

use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use weft_utils::TypeIdMap;

use crate::info::TypeInfo;

/// Container for static storage of non-generic type information.
///
/// ## Example
///
/// ```
/// use weft_marshal::{Reflect, ReflectRef};
/// use weft_marshal::info::{Typed, TypeInfo, OpaqueInfo};
/// use weft_marshal::impls::NonGenericTypeInfoCell;
///
/// struct Token;
///
/// impl Typed for Token {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// impl Reflect for Token {
///     fn reflect_ref(&self) -> ReflectRef<'_> {
///         ReflectRef::Opaque
///     }
/// }
///
/// assert_eq!(Token::type_info().type_name(), "Token");
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns a reference to the info stored in the cell.
    ///
    /// If the cell is empty, the info is generated from the given function.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(f)
    }
}

impl Default for NonGenericTypeInfoCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for static storage of type information with generics.
///
/// ## Example
///
/// ```
/// use weft_marshal::{Reflect, ReflectRef};
/// use weft_marshal::info::{Typed, TypeInfo, OpaqueInfo};
/// use weft_marshal::impls::GenericTypeInfoCell;
///
/// struct Tagged<T>(T);
///
/// impl<T: Send + Sync + 'static> Typed for Tagged<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// impl<T: Send + Sync + 'static> Reflect for Tagged<T> {
///     fn reflect_ref(&self) -> ReflectRef<'_> {
///         ReflectRef::Opaque
///     }
/// }
///
/// assert!(<Tagged<u8>>::type_info().is::<Tagged<u8>>());
/// assert!(<Tagged<i8>>::type_info().is::<Tagged<i8>>());
/// ```
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns a reference to the info stored for type `G`.
    ///
    /// If there is no entry found, a new one will be generated from the given function.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&TypeInfo> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: TypeInfo) -> &TypeInfo {
        let mut map = self.0.write().unwrap_or_else(PoisonError::into_inner);
        let info: &'static TypeInfo = *map.get_or_insert(type_id, || Box::leak(Box::new(value)));
        info
    }
}

impl Default for GenericTypeInfoCell {
    fn default() -> Self {
        Self::new()
    }
}
