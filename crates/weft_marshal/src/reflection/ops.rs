use crate::Reflect;

/// An ordered collection of reflected items.
pub trait List: Send + Sync {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the items in the collection's natural order.
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;

    /// Appends an item, handing it back on a type mismatch or a fixed-size collection.
    fn push(&mut self, item: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;
}

/// A key/value map of reflected entries.
pub trait Map: Send + Sync {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the entries in the map's natural order.
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;

    /// Inserts an entry, handing it back on a type mismatch.
    fn insert(
        &mut self,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)>;
}
