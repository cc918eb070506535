//! Bridges between [`Node`] trees, `serde` and concrete notations.
//!
//! - [`Node`] implements `Serialize`, `Deserialize` and `Deserializer`, so
//!   any serde format (JSON, RON, ...) renders or produces a tree.
//! - [`NodeSerializer`] turns any `Serialize` value into a `Node`; it backs
//!   the `serde_form` of types that marshal through their own serde impls.
//! - [`MarshalSerialize`] and [`ParseSeed`] run a whole marshalling session
//!   behind the serde traits, so a registry-driven value can be handed to a
//!   serde format directly.
//!
//! [`Node`]: crate::node::Node

// -----------------------------------------------------------------------------
// Modules

mod de;
mod error;
mod marshal;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use error::NodeError;
pub use marshal::{MarshalSerialize, ParseSeed};
pub use ser::NodeSerializer;
