use alloc::sync::Arc;
use core::any::TypeId;

use arc_swap::ArcSwap;
use weft_utils::TypeIdMap;

use crate::classify::TypeDescriptor;

/// Insert-once snapshot of classified types.
///
/// Readers load the current snapshot without locking. Writers publish a new
/// snapshot through read-copy-update; when two threads classify the same type,
/// the first published descriptor wins and both get it.
pub(crate) struct DescriptorCache {
    snapshot: ArcSwap<TypeIdMap<Arc<TypeDescriptor>>>,
}

impl DescriptorCache {
    pub(crate) fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(TypeIdMap::new()),
        }
    }

    #[inline]
    pub(crate) fn get(&self, type_id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.snapshot.load().get(&type_id).cloned()
    }

    /// Publishes `descriptor` unless one is already cached, returning the cached one.
    pub(crate) fn insert(&self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let type_id = descriptor.info().type_id();
        let descriptor = Arc::new(descriptor);
        let mut winner = Arc::clone(&descriptor);
        self.snapshot.rcu(|current| {
            if let Some(existing) = current.get(&type_id) {
                winner = Arc::clone(existing);
                return Arc::clone(current);
            }
            winner = Arc::clone(&descriptor);
            let mut next = TypeIdMap::clone(current);
            next.insert(type_id, Arc::clone(&descriptor));
            Arc::new(next)
        });
        winner
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.load().len()
    }
}
