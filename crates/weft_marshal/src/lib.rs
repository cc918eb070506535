#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate `weft_marshal`, also when it is expanded
// inside the crate itself (unit tests, builtin impls).
extern crate self as weft_marshal;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod classify;
pub mod dictionary;
pub mod impls;
pub mod info;
pub mod introspect;
pub mod node;
pub mod registry;
pub mod serde;
pub mod session;
pub mod transform;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use reflection::{List, Map, Reflect, ReflectMut, ReflectRef, ScalarRef, Upcast};
pub use weft_marshal_derive as derive;

pub use node::{EventSink, Node};
pub use registry::{ConfigurationError, Registry, RegistryBuilder};
pub use session::{ParseConfig, SerializeConfig, SessionError, SessionErrorKind, TraversalPath};
pub use session::{parse, parse_as, serialize, serialize_into};

// -----------------------------------------------------------------------------
// Macro exports

#[doc(hidden)]
pub mod __macro_exports {
    /// Static registration behind `#[weft(auto_register)]`.
    #[cfg(feature = "auto_register")]
    pub mod auto_register {
        pub use inventory;

        use crate::info::TypeInfo;

        /// A type submitted by `#[derive(Reflect)]` for
        /// [`RegistryBuilder::auto_register`](crate::RegistryBuilder::auto_register).
        pub struct AutoRegistration(pub fn() -> &'static TypeInfo);

        inventory::collect!(AutoRegistration);
    }
}
