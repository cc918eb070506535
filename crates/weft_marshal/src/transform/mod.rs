//! Transforms: substitute a type with a simpler intermediate form.
//!
//! A [`Transform`] reduces a value into an intermediate value the engine
//! knows how to marshal, and restores it on the way back. For every value
//! `v` of the transform's domain, `restore(reduce(v))` equals `v`.
//!
//! Transforms come from three places, in precedence order:
//!
//! 1. explicit registrations in the [`Registry`], against a concrete type or
//!    against an abstract type such as `Box<dyn Shape>`;
//! 2. the [`ImplicitForm`] a type declares for itself;
//! 3. builtins for `Duration`, `PathBuf` and `SystemTime`, registered with
//!    the lowest priority so any explicit registration replaces them.
//!
//! [`Registry`]: crate::Registry
//! [`ImplicitForm`]: crate::info::ImplicitForm

// -----------------------------------------------------------------------------
// Modules

mod builtin;
mod implicit;
mod table;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use builtin::builtin_transforms;
pub(crate) use implicit::implicit_transform;
pub(crate) use table::{TransformRegistration, TransformTable};

// -----------------------------------------------------------------------------
// Exports

pub use implicit::{SerdeFormTransform, StringFormTransform};

use core::any::type_name;
use core::fmt;
use core::marker::PhantomData;

use thiserror::Error;

use crate::Reflect;
use crate::info::{TypeInfo, Typed};

// -----------------------------------------------------------------------------
// Transform

/// A two-way substitution between a type and an intermediate form.
///
/// `reduce` receives the runtime value (never a wrapper around it). `restore`
/// receives the parsed intermediate value and the declared type being
/// restored, which lets a transform registered against an abstraction pick
/// the concrete type to build.
pub trait Transform: Send + Sync + 'static {
    /// A name for log and error messages.
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    /// The type the value is reduced to.
    fn intermediate(&self) -> &'static TypeInfo;

    fn reduce(&self, value: &dyn Reflect) -> Result<Box<dyn Reflect>, TransformError>;

    fn restore(
        &self,
        intermediate: Box<dyn Reflect>,
        target: &'static TypeInfo,
    ) -> Result<Box<dyn Reflect>, TransformError>;
}

impl fmt::Debug for dyn Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("name", &self.name())
            .field("intermediate", &self.intermediate().type_path())
            .finish()
    }
}

/// Failure inside a [`Transform`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransformError {
    /// The transform received a value outside its domain.
    #[error("transform `{transform}` expected `{expected}`, found `{found}`")]
    TypeMismatch {
        transform: String,
        expected: &'static str,
        found: &'static str,
    },
    /// The intermediate value could not be turned back into the type.
    #[error("transform `{transform}` failed: {message}")]
    Invalid { transform: String, message: String },
}

impl TransformError {
    pub fn type_mismatch(transform: &str, expected: &'static str, found: &dyn Reflect) -> Self {
        Self::TypeMismatch {
            transform: transform.into(),
            expected,
            found: found.reflect_type_info().type_path(),
        }
    }

    pub fn invalid(transform: &str, message: impl fmt::Display) -> Self {
        Self::Invalid {
            transform: transform.into(),
            message: message.to_string(),
        }
    }
}

// -----------------------------------------------------------------------------
// FnTransform

/// A [`Transform`] from `T` to `I` built out of two plain functions.
///
/// # Examples
///
/// ```
/// use weft_marshal::transform::{FnTransform, Transform};
/// use weft_marshal::info::Typed;
///
/// let celsius = FnTransform::<f64, i64>::new(
///     |value| (value * 100.0) as i64,
///     |centi| Ok(centi as f64 / 100.0),
/// );
///
/// let reduced = celsius.reduce(&21.5_f64).unwrap();
/// assert_eq!(*reduced.downcast_ref::<i64>().unwrap(), 2150);
///
/// let restored = celsius.restore(reduced, f64::type_info()).unwrap();
/// assert_eq!(restored.take::<f64>().unwrap(), 21.5);
/// ```
pub struct FnTransform<T, I> {
    reduce: fn(&T) -> I,
    restore: fn(I) -> Result<T, String>,
    name: Option<&'static str>,
    _marker: PhantomData<fn(T) -> I>,
}

impl<T, I> FnTransform<T, I> {
    pub const fn new(reduce: fn(&T) -> I, restore: fn(I) -> Result<T, String>) -> Self {
        Self {
            reduce,
            restore,
            name: None,
            _marker: PhantomData,
        }
    }

    /// Names the transform in messages.
    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }
}

impl<T: Reflect + Typed, I: Reflect + Typed> Transform for FnTransform<T, I> {
    fn name(&self) -> &str {
        self.name.unwrap_or_else(type_name::<Self>)
    }

    #[inline]
    fn intermediate(&self) -> &'static TypeInfo {
        I::type_info()
    }

    fn reduce(&self, value: &dyn Reflect) -> Result<Box<dyn Reflect>, TransformError> {
        match value.downcast_ref::<T>() {
            Some(value) => Ok(Box::new((self.reduce)(value))),
            None => Err(TransformError::type_mismatch(
                self.name(),
                T::type_info().type_path(),
                value,
            )),
        }
    }

    fn restore(
        &self,
        intermediate: Box<dyn Reflect>,
        _target: &'static TypeInfo,
    ) -> Result<Box<dyn Reflect>, TransformError> {
        match intermediate.take::<I>() {
            Ok(intermediate) => (self.restore)(intermediate)
                .map(|value| Box::new(value) as Box<dyn Reflect>)
                .map_err(|message| TransformError::invalid(self.name(), message)),
            Err(other) => Err(TransformError::type_mismatch(
                self.name(),
                I::type_info().type_path(),
                &*other,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FnTransform, Transform, TransformError};
    use crate::info::Typed;

    fn hex() -> FnTransform<u32, String> {
        FnTransform::new(
            |value| format!("{value:x}"),
            |text| u32::from_str_radix(&text, 16).map_err(|err| err.to_string()),
        )
        .named("hex")
    }

    #[test]
    fn round_trip_law() {
        let transform = hex();
        for value in [0_u32, 255, u32::MAX] {
            let reduced = transform.reduce(&value).unwrap();
            let restored = transform.restore(reduced, u32::type_info()).unwrap();
            assert_eq!(restored.take::<u32>().unwrap(), value);
        }
        assert!(transform.intermediate().is::<String>());
    }

    #[test]
    fn domain_errors() {
        let transform = hex();
        let err = transform.reduce(&1_i8).unwrap_err();
        assert_eq!(
            err,
            TransformError::TypeMismatch {
                transform: "hex".into(),
                expected: "u32",
                found: "i8",
            }
        );

        let err = transform
            .restore(Box::new(String::from("zz")), u32::type_info())
            .unwrap_err();
        assert!(matches!(err, TransformError::Invalid { .. }));
        assert!(err.to_string().starts_with("transform `hex` failed"));
    }
}
