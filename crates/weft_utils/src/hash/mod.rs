//! Hash containers with deterministic hashing.
//!
//! Lookups in the registry happen by `TypeId` or by property/token name;
//! neither needs DoS resistance, so a fixed seed is used throughout.

mod hasher;

pub use hasher::{StableState, TypeIdHasher, TypeIdState};

/// A [`hashbrown::HashMap`] hashed with [`StableState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, StableState>;

/// A [`hashbrown::HashSet`] hashed with [`StableState`].
pub type HashSet<T> = hashbrown::HashSet<T, StableState>;

pub use foldhash;
pub use hashbrown;
