use core::any::{Any, TypeId};
use core::fmt;

use crate::info::DynamicTyped;
use crate::reflection::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// Runtime access to a value whose static type has been erased.
///
/// Implemented by [`#[derive(Reflect)]`](crate::derive::Reflect) and by this
/// crate for the standard types it supports. The engine never needs the
/// concrete type: it asks a value for its [`TypeInfo`] and for a
/// [`ReflectRef`] view of its shape.
///
/// # Type Identification
///
/// `Box<dyn Reflect>` is itself a reflected type (the "any value" type), so
/// trait methods called on the box describe the box. Dereference first, or
/// use the inherent helpers on `dyn Reflect`:
///
/// ```
/// # use weft_marshal::Reflect;
/// # use core::any::TypeId;
/// let x: Box<dyn Reflect> = Box::new(32_i32);
/// assert!((*x).ty_id() == TypeId::of::<i32>());
/// assert!(x.ty_id() == TypeId::of::<Box<dyn Reflect>>());
/// assert!(x.is::<i32>());
/// assert_eq!(*x.downcast_ref::<i32>().unwrap(), 32);
/// ```
///
/// [`TypeInfo`]: crate::info::TypeInfo
pub trait Reflect: DynamicTyped + Send + Sync + Any {
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    #[inline(always)]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    #[inline(always)]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Returns the [`TypeId`] of the underlying type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Returns a view of the value's shape.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns a mutable view, used to fill collections while parsing.
    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Other
    }

    /// Debug-formats the value.
    ///
    /// Opaque values without a transform are written as this string.
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.reflect_type_info().type_path())
    }
}

impl dyn Reflect {
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            let any: Box<dyn Any> = self;
            match any.downcast::<T>() {
                Ok(value) => Ok(value),
                Err(_) => unreachable!("type id was checked"),
            }
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Reflect {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reflect_debug(f)
    }
}

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use alloc::string::String;

    #[test]
    fn take_returns_the_box_on_mismatch() {
        let value: Box<dyn Reflect> = Box::new(String::from("x"));
        let value = value.take::<u8>().unwrap_err();
        assert!(value.is::<String>());
        assert_eq!(value.take::<String>().unwrap(), "x");
    }

    #[test]
    fn boxed_reflect_reports_inner_type() {
        let value: Box<dyn Reflect> = Box::new(7_u16);
        assert!(value.is::<u16>());
        assert!(!value.is::<Box<dyn Reflect>>());
    }
}
