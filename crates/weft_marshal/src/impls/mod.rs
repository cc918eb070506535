//! Reflection implementations for standard types, and the cells used to
//! store their type information.
//!
//! | Classification | Types |
//! |---|---|
//! | scalar | `bool`, integers, floats, `char`, `String` |
//! | list | `Vec<T>`, `VecDeque<T>`, `BTreeSet<T>`, `HashSet<T, S>` |
//! | array | `[T; N]` |
//! | map | `BTreeMap<K, V>`, `HashMap<K, V, S>` |
//! | optional | `Option<T>`, `OnceLock<T>` |
//! | pointer | `Arc<T>` |
//! | abstract | `Box<dyn Reflect>`, `Box<dyn Trait>` through [`impl_abstract!`] |
//! | opaque | `Duration`, `PathBuf`, `SystemTime`, IP and socket addresses |
//!
//! [`impl_abstract!`]: crate::impl_abstract

mod cell;
mod list;
mod map;
mod opaque;
mod scalar;
mod wrapper;

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
