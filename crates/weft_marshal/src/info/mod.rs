//! Compile-time type information.
//!
//! - [`Type`]: a `TypeId` plus a printable path.
//! - [`TypeInfo`]: one enum over every shape the engine understands:
//!     - [`ScalarInfo`]: booleans, numbers, characters and strings.
//!     - [`EnumInfo`]: unit-only enumerations, written by variant name.
//!     - [`ListInfo`]: growable ordered collections (`Vec<T>`, sets, ...).
//!     - [`ArrayInfo`]: fixed-size arrays.
//!     - [`MapInfo`]: key/value maps.
//!     - [`RecordInfo`]: structured records, a table of [`PropertyInfo`].
//!     - [`OptionalInfo`]: nullable wrappers such as `Option<T>`.
//!     - [`PointerInfo`]: transparent shared references such as `Arc<T>`.
//!     - [`AbstractInfo`]: polymorphic declared types such as `Box<dyn Trait>`.
//!     - [`DynamicInfo`]: values that carry their own shape, such as [`Node`].
//!     - [`OpaqueInfo`]: types the engine cannot look into.
//! - [`ImplicitForm`]: a transform a type declares for itself.
//! - [`Typed`] and [`DynamicTyped`]: static and dynamic access to `TypeInfo`.
//!
//! [`Node`]: crate::node::Node

// -----------------------------------------------------------------------------
// Modules

mod container_info;
mod opaque_info;
mod record_info;
mod scalar_info;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use type_path::impl_type_fn;

// -----------------------------------------------------------------------------
// Exports

pub use container_info::{ArrayInfo, ListInfo, MapInfo, OptionalInfo, PointerInfo};
pub use opaque_info::{AbstractInfo, DynamicInfo, ImplicitForm, OpaqueInfo, SerdeForm, StringForm};
pub use record_info::{ComputedRef, FieldMut, FieldRef, Getter, Setter};
pub use record_info::{Inclusion, PropertyInfo, RecordInfo, RecordInfoBuilder, Visibility};
pub use scalar_info::{EnumInfo, ScalarInfo, ScalarKind};
pub use type_info::{ReflectKind, ReflectKindError, TypeInfo};
pub use type_path::Type;
pub use typed::{DynamicTyped, Typed};
