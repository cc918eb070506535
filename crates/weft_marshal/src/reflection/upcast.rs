use crate::Reflect;

/// Conversion of a concrete value into a polymorphic declared type.
///
/// Dictionary entries and implementation registrations require
/// `A: Upcast<C>` so a parsed `C` can be stored where an `A` is declared.
/// Implemented for `Box<dyn Reflect>` and by [`impl_abstract!`] for
/// `Box<dyn Trait>`.
///
/// [`impl_abstract!`]: crate::impl_abstract
pub trait Upcast<C>: Sized {
    fn upcast(concrete: C) -> Self;
}

impl<C: Reflect> Upcast<C> for Box<dyn Reflect> {
    #[inline]
    fn upcast(concrete: C) -> Self {
        Box::new(concrete)
    }
}

/// Implements the engine traits for `Box<dyn Trait>`.
///
/// The trait must have [`Reflect`] as a supertrait. The box is classified
/// as abstract: serializing writes the runtime value, parsing resolves the
/// concrete type through a dictionary or a registered implementation.
///
/// ```
/// use weft_marshal::{Reflect, impl_abstract};
///
/// pub trait Shape: Reflect {
///     fn area(&self) -> f64;
/// }
///
/// impl_abstract!(dyn Shape);
/// ```
#[macro_export]
macro_rules! impl_abstract {
    (dyn $($trait_:tt)+) => {
        impl $crate::info::Typed for ::std::boxed::Box<dyn $($trait_)+> {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Abstract($crate::info::AbstractInfo::new::<Self>())
                })
            }
        }

        impl $crate::Reflect for ::std::boxed::Box<dyn $($trait_)+> {
            #[inline]
            fn reflect_ref(&self) -> $crate::ReflectRef<'_> {
                $crate::ReflectRef::Pointer(&**self)
            }
        }

        impl<C: $($trait_)+ + $crate::Reflect> $crate::Upcast<C> for ::std::boxed::Box<dyn $($trait_)+> {
            #[inline]
            fn upcast(concrete: C) -> Self {
                ::std::boxed::Box::new(concrete)
            }
        }
    };
}
