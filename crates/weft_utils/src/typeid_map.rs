use core::any::TypeId;
use core::fmt;

use crate::hash::TypeIdState;
use crate::hash::hashbrown::HashMap;

/// A map keyed by [`TypeId`].
///
/// Used for every per-type table of the marshalling registry: descriptors,
/// transforms, overrides, dictionary scopes. The key is hashed with
/// [`TypeIdState`], a pass-through of the id's own 64 bits.
///
/// ```
/// use core::any::TypeId;
/// use weft_utils::TypeIdMap;
///
/// let mut names = TypeIdMap::new();
/// names.insert(TypeId::of::<u8>(), "byte");
/// assert_eq!(names.get(&TypeId::of::<u8>()), Some(&"byte"));
/// assert!(!names.contains(&TypeId::of::<u16>()));
/// ```
pub struct TypeIdMap<V> {
    inner: HashMap<TypeId, V, TypeIdState>,
}

impl<V> TypeIdMap<V> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            inner: HashMap::with_hasher(TypeIdState),
        }
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.inner.get(type_id)
    }

    #[inline]
    pub fn get_mut(&mut self, type_id: &TypeId) -> Option<&mut V> {
        self.inner.get_mut(type_id)
    }

    /// Returns the value for `type_id`, inserting `make()` first if absent.
    #[inline]
    pub fn get_or_insert(&mut self, type_id: TypeId, make: impl FnOnce() -> V) -> &mut V {
        self.inner.entry(type_id).or_insert_with(make)
    }

    /// Inserts a value, returning the one it replaced.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId, value: V) -> Option<V> {
        self.inner.insert(type_id, value)
    }

    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.inner.contains_key(type_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates in unspecified order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&TypeId, &V)> {
        self.inner.iter()
    }

    /// Iterates in unspecified order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.inner.values()
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for TypeIdMap<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}

impl<V> FromIterator<(TypeId, V)> for TypeIdMap<V> {
    fn from_iter<I: IntoIterator<Item = (TypeId, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (type_id, value) in iter {
            map.insert(type_id, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::TypeIdMap;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::TypeId;

    #[test]
    fn get_or_insert_builds_once() {
        let mut map = TypeIdMap::new();
        map.get_or_insert(TypeId::of::<u8>(), Vec::new).push(1);
        map.get_or_insert(TypeId::of::<u8>(), || vec![9]).push(2);
        assert_eq!(map.get(&TypeId::of::<u8>()), Some(&vec![1, 2]));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn collects_with_last_value_winning() {
        let map: TypeIdMap<&str> = [
            (TypeId::of::<u8>(), "a"),
            (TypeId::of::<u16>(), "b"),
            (TypeId::of::<u8>(), "c"),
        ]
        .into_iter()
        .collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&TypeId::of::<u8>()), Some(&"c"));
    }
}
