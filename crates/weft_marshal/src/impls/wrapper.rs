use alloc::sync::Arc;
use std::sync::OnceLock;

use crate::impls::{GenericTypeInfoCell, NonGenericTypeInfoCell};
use crate::info::{AbstractInfo, OptionalInfo, PointerInfo, TypeInfo, Typed};
use crate::{Reflect, ReflectRef};

// -----------------------------------------------------------------------------
// Option

fn wrap_option<T: Reflect + Typed>(inner: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    let inner = inner.take::<T>()?;
    Ok(Box::new(Some(inner)))
}

impl<T: Reflect + Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Optional(OptionalInfo::new::<Self, T>(
                || Box::new(None::<T>),
                wrap_option::<T>,
            ))
        })
    }
}

impl<T: Reflect + Typed> Reflect for Option<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        match self {
            Some(inner) => ReflectRef::Pointer(inner),
            None => ReflectRef::Null,
        }
    }
}

// -----------------------------------------------------------------------------
// OnceLock

fn wrap_once_lock<T: Reflect + Typed>(inner: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    let inner = inner.take::<T>()?;
    Ok(Box::new(OnceLock::from(inner)))
}

impl<T: Reflect + Typed> Typed for OnceLock<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Optional(OptionalInfo::new::<Self, T>(
                || Box::new(OnceLock::<T>::new()),
                wrap_once_lock::<T>,
            ))
        })
    }
}

impl<T: Reflect + Typed> Reflect for OnceLock<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        match self.get() {
            Some(inner) => ReflectRef::Pointer(inner),
            None => ReflectRef::Null,
        }
    }
}

// -----------------------------------------------------------------------------
// Arc

fn wrap_arc<T: Reflect + Typed>(target: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    let target = target.take::<T>()?;
    Ok(Box::new(Arc::new(target)))
}

impl<T: Reflect + Typed> Typed for Arc<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Pointer(PointerInfo::new::<Self, T>(wrap_arc::<T>)))
    }
}

impl<T: Reflect + Typed> Reflect for Arc<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Pointer(&**self)
    }
}

// -----------------------------------------------------------------------------
// Box<dyn Reflect>

fn upcast_any(value: Box<dyn Reflect>) -> Box<dyn Reflect> {
    Box::new(value)
}

impl Typed for Box<dyn Reflect> {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Abstract(AbstractInfo::new::<Self>().with_upcast_any(upcast_any)))
    }
}

impl Reflect for Box<dyn Reflect> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Pointer(&**self)
    }
}

#[cfg(test)]
mod tests {
    use crate::info::Typed;
    use crate::{Reflect, ReflectRef};
    use alloc::sync::Arc;
    use std::sync::OnceLock;

    #[test]
    fn optional_wrap_and_none() {
        let info = <Option<u32>>::type_info().as_optional().unwrap();
        assert!(info.inner_info().is::<u32>());

        let none = info.none();
        assert!(matches!(none.reflect_ref(), ReflectRef::Null));

        let some = info.wrap(Box::new(5_u32)).unwrap();
        assert_eq!(some.take::<Option<u32>>().unwrap(), Some(5));

        assert!(info.wrap(Box::new(5_i64)).is_err());
    }

    #[test]
    fn once_lock_is_nullable() {
        let info = <OnceLock<u8>>::type_info();
        assert!(info.is_nullable());
        let filled = info.as_optional().unwrap().wrap(Box::new(1_u8)).unwrap();
        let filled = filled.take::<OnceLock<u8>>().unwrap();
        assert_eq!(filled.get(), Some(&1));
    }

    #[test]
    fn any_box_points_at_its_content() {
        let value: Box<dyn Reflect> = Box::new(3_i64);
        let info = <Box<dyn Reflect>>::type_info().as_abstract().unwrap();
        let upcast = info.upcast_any().unwrap();
        let wrapped = upcast(value);
        assert!(wrapped.is::<Box<dyn Reflect>>());
        match wrapped.reflect_ref() {
            ReflectRef::Pointer(inner) => assert!(inner.is::<Box<dyn Reflect>>()),
            _ => panic!("expected a pointer"),
        }
        let arc = Arc::new(2_u8);
        assert!(matches!(arc.reflect_ref(), ReflectRef::Pointer(_)));
    }
}
