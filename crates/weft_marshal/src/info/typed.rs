use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to compile-time type information.
///
/// Implemented by [`#[derive(Reflect)]`](crate::derive::Reflect) and by this
/// crate for the standard types it supports.
///
/// # Manually Impl
///
/// Non-generic types store their info in a [`NonGenericTypeInfoCell`],
/// generic types in a [`GenericTypeInfoCell`]:
///
/// ```
/// use weft_marshal::{
///     Reflect, ReflectRef,
///     info::{Typed, TypeInfo, RecordInfo, PropertyInfo},
///     impls::NonGenericTypeInfoCell,
/// };
///
/// #[derive(Default)]
/// struct Point { x: i32 }
///
/// impl Typed for Point {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Record(
///             RecordInfo::builder::<Self>()
///                 .property(PropertyInfo::field::<i32>(
///                     "x",
///                     |this| this.downcast_ref::<Point>().map(|p| &p.x as &dyn Reflect),
///                     |this| this.downcast_mut::<Point>().map(|p| &mut p.x as &mut dyn Reflect),
///                     |this, value| {
///                         let x = value.take::<i32>()?;
///                         this.downcast_mut::<Point>().map(|p| p.x = x).ok_or_else(|| Box::new(x) as _)
///                     },
///                 ))
///                 .default_constructor::<Self>()
///                 .build(),
///         ))
///     }
/// }
///
/// impl Reflect for Point {
///     fn reflect_ref(&self) -> ReflectRef<'_> {
///         ReflectRef::Record
///     }
/// }
///
/// let record = Point::type_info().as_record().unwrap();
/// assert_eq!(record.property("x").unwrap().type_info().type_path(), "i32");
/// ```
///
/// [`NonGenericTypeInfoCell`]: crate::impls::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::impls::GenericTypeInfoCell
pub trait Typed: 'static {
    /// Returns the compile-time info for the underlying type.
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// DynamicTyped

/// Dynamic dispatch for [`Typed`].
///
/// Implemented for every [`Typed`] type and reachable through `dyn Reflect`.
pub trait DynamicTyped {
    /// See [`Typed::type_info`].
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}
