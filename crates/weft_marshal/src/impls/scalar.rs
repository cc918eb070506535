use core::str::FromStr;

use crate::impls::NonGenericTypeInfoCell;
use crate::info::{ScalarInfo, ScalarKind, TypeInfo, Typed};
use crate::{Reflect, ReflectRef, ScalarRef};

// -----------------------------------------------------------------------------
// Conversions

fn boxed<T: Reflect>(value: T) -> Option<Box<dyn Reflect>> {
    Some(Box::new(value))
}

fn integer_from_scalar<T>(scalar: ScalarRef<'_>) -> Option<Box<dyn Reflect>>
where
    T: Reflect + TryFrom<i64> + TryFrom<u64> + FromStr,
{
    let value = match scalar {
        ScalarRef::Int(value) => T::try_from(value).ok()?,
        ScalarRef::UInt(value) => T::try_from(value).ok()?,
        ScalarRef::Float(value) if value.is_finite() && value.fract() == 0.0 => {
            if value < 0.0 {
                T::try_from(value as i64).ok()?
            } else {
                T::try_from(value as u64).ok()?
            }
        }
        ScalarRef::Str(text) => text.trim().parse().ok()?,
        _ => return None,
    };
    boxed(value)
}

fn float_from_scalar(scalar: ScalarRef<'_>) -> Option<f64> {
    match scalar {
        ScalarRef::Int(value) => Some(value as f64),
        ScalarRef::UInt(value) => Some(value as f64),
        ScalarRef::Float(value) => Some(value),
        ScalarRef::Str(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn f64_from_scalar(scalar: ScalarRef<'_>) -> Option<Box<dyn Reflect>> {
    boxed(float_from_scalar(scalar)?)
}

fn f32_from_scalar(scalar: ScalarRef<'_>) -> Option<Box<dyn Reflect>> {
    boxed(float_from_scalar(scalar)? as f32)
}

fn bool_from_scalar(scalar: ScalarRef<'_>) -> Option<Box<dyn Reflect>> {
    match scalar {
        ScalarRef::Bool(value) => boxed(value),
        ScalarRef::Str(text) => boxed(text.trim().parse::<bool>().ok()?),
        _ => None,
    }
}

fn char_from_scalar(scalar: ScalarRef<'_>) -> Option<Box<dyn Reflect>> {
    match scalar {
        ScalarRef::Char(value) => boxed(value),
        ScalarRef::Str(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(value), None) => boxed(value),
                _ => None,
            }
        }
        _ => None,
    }
}

fn string_from_scalar(scalar: ScalarRef<'_>) -> Option<Box<dyn Reflect>> {
    match scalar {
        ScalarRef::Str(text) => boxed(String::from(text)),
        other => boxed(other.to_string()),
    }
}

// -----------------------------------------------------------------------------
// Implementations

macro_rules! impl_scalar {
    ($ty:ty, $kind:ident, $from_scalar:expr, |$this:ident| $as_scalar:expr) => {
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    TypeInfo::Scalar(ScalarInfo::new::<$ty>(ScalarKind::$kind, $from_scalar))
                })
            }
        }

        impl Reflect for $ty {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                let $this = self;
                ReflectRef::Scalar($as_scalar)
            }

            fn reflect_debug(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Debug::fmt(self, f)
            }
        }
    };
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl_scalar!($ty, Int, integer_from_scalar::<$ty>, |this| ScalarRef::Int(i64::from(*this)));
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl_scalar!($ty, UInt, integer_from_scalar::<$ty>, |this| ScalarRef::UInt(u64::from(*this)));
    )*};
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);

// `usize`/`isize` have no lossless `From` into 64-bit integers.
impl_scalar!(isize, Int, integer_from_scalar::<isize>, |this| ScalarRef::Int(*this as i64));
impl_scalar!(usize, UInt, integer_from_scalar::<usize>, |this| ScalarRef::UInt(*this as u64));

impl_scalar!(f32, Float, f32_from_scalar, |this| ScalarRef::Float(f64::from(*this)));
impl_scalar!(f64, Float, f64_from_scalar, |this| ScalarRef::Float(*this));
impl_scalar!(bool, Bool, bool_from_scalar, |this| ScalarRef::Bool(*this));
impl_scalar!(char, Char, char_from_scalar, |this| ScalarRef::Char(*this));
impl_scalar!(String, String, string_from_scalar, |this| ScalarRef::Str(this));

#[cfg(test)]
mod tests {
    use crate::ScalarRef;
    use crate::info::{ScalarKind, Typed};
    use alloc::string::String;

    fn convert<T: Typed + Clone>(scalar: ScalarRef<'_>) -> Option<T> {
        let info = T::type_info().as_scalar().unwrap();
        info.from_scalar(scalar)
            .map(|value| value.downcast_ref::<T>().unwrap().clone())
    }

    #[test]
    fn integers_are_range_checked() {
        assert_eq!(convert::<u8>(ScalarRef::UInt(255)), Some(255));
        assert_eq!(convert::<u8>(ScalarRef::UInt(256)), None);
        assert_eq!(convert::<u8>(ScalarRef::Int(-1)), None);
        assert_eq!(convert::<i16>(ScalarRef::Int(-300)), Some(-300));
        assert_eq!(convert::<i32>(ScalarRef::Float(4.0)), Some(4));
        assert_eq!(convert::<i32>(ScalarRef::Float(4.5)), None);
    }

    #[test]
    fn text_notations_carry_numbers_as_strings() {
        assert_eq!(convert::<u64>(ScalarRef::Str(" 42 ")), Some(42));
        assert_eq!(convert::<f64>(ScalarRef::Str("1.5")), Some(1.5));
        assert_eq!(convert::<bool>(ScalarRef::Str("true")), Some(true));
        assert_eq!(convert::<char>(ScalarRef::Str("x")), Some('x'));
        assert_eq!(convert::<char>(ScalarRef::Str("xy")), None);
        assert_eq!(convert::<u64>(ScalarRef::Bool(true)), None);
    }

    #[test]
    fn strings_accept_any_scalar() {
        assert_eq!(convert::<String>(ScalarRef::Int(-3)), Some(String::from("-3")));
        assert_eq!(convert::<String>(ScalarRef::Bool(false)), Some(String::from("false")));
        assert_eq!(
            String::type_info().as_scalar().unwrap().kind(),
            ScalarKind::String
        );
    }
}
