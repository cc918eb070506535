//! Runtime access to erased values.

mod kind;
mod ops;
mod reflect;
mod upcast;

pub use kind::{ReflectMut, ReflectRef, ScalarRef};
pub use ops::{List, Map};
pub use reflect::Reflect;
pub use upcast::Upcast;
