use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed, impl_type_fn};

/// Wraps an already parsed inner value into the container type.
///
/// Returns the input unchanged if it is not of the inner type.
type WrapFn = fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>;

// -----------------------------------------------------------------------------
// ListInfo

/// Metadata for growable ordered collections: `Vec<T>`, `VecDeque<T>`, sets.
#[derive(Debug)]
pub struct ListInfo {
    ty: Type,
    item: fn() -> &'static TypeInfo,
    constructor: fn() -> Box<dyn Reflect>,
}

impl ListInfo {
    impl_type_fn!(ty);

    /// Creates a new [`ListInfo`].
    ///
    /// `constructor` returns an empty collection.
    #[inline]
    pub fn new<T: Reflect, Item: Typed>(constructor: fn() -> Box<dyn Reflect>) -> Self {
        Self {
            ty: Type::of::<T>(),
            item: Item::type_info,
            constructor,
        }
    }

    /// Returns the item [`TypeInfo`].
    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item)()
    }

    /// Returns the constructor of an empty collection.
    #[inline]
    pub const fn constructor(&self) -> fn() -> Box<dyn Reflect> {
        self.constructor
    }
}

// -----------------------------------------------------------------------------
// ArrayInfo

/// Metadata for fixed-size arrays (`[T; N]`).
#[derive(Debug)]
pub struct ArrayInfo {
    ty: Type,
    item: fn() -> &'static TypeInfo,
    capacity: usize,
    from_items: fn(Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>>,
}

impl ArrayInfo {
    impl_type_fn!(ty);

    /// Creates a new [`ArrayInfo`].
    ///
    /// `from_items` builds the array from exactly `capacity` items.
    #[inline]
    pub fn new<T: Reflect, Item: Typed>(
        capacity: usize,
        from_items: fn(Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            item: Item::type_info,
            capacity,
            from_items,
        }
    }

    /// Returns the item [`TypeInfo`].
    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item)()
    }

    /// Returns the fixed length.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Builds the array, returning `None` on a length or item type mismatch.
    #[inline]
    pub fn from_items(&self, items: Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>> {
        (self.from_items)(items)
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// Metadata for key/value maps.
#[derive(Debug)]
pub struct MapInfo {
    ty: Type,
    key: fn() -> &'static TypeInfo,
    value: fn() -> &'static TypeInfo,
    constructor: fn() -> Box<dyn Reflect>,
}

impl MapInfo {
    impl_type_fn!(ty);

    /// Creates a new [`MapInfo`].
    #[inline]
    pub fn new<T: Reflect, K: Typed, V: Typed>(constructor: fn() -> Box<dyn Reflect>) -> Self {
        Self {
            ty: Type::of::<T>(),
            key: K::type_info,
            value: V::type_info,
            constructor,
        }
    }

    /// Returns the key [`TypeInfo`].
    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key)()
    }

    /// Returns the value [`TypeInfo`].
    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value)()
    }

    /// Returns the constructor of an empty map.
    #[inline]
    pub const fn constructor(&self) -> fn() -> Box<dyn Reflect> {
        self.constructor
    }
}

// -----------------------------------------------------------------------------
// OptionalInfo

/// Metadata for nullable wrappers: `Option<T>`, `OnceLock<T>`.
#[derive(Debug)]
pub struct OptionalInfo {
    ty: Type,
    inner: fn() -> &'static TypeInfo,
    none: fn() -> Box<dyn Reflect>,
    wrap: WrapFn,
}

impl OptionalInfo {
    impl_type_fn!(ty);

    /// Creates a new [`OptionalInfo`].
    #[inline]
    pub fn new<T: Reflect, Inner: Typed>(none: fn() -> Box<dyn Reflect>, wrap: WrapFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            inner: Inner::type_info,
            none,
            wrap,
        }
    }

    /// Returns the inner [`TypeInfo`].
    #[inline]
    pub fn inner_info(&self) -> &'static TypeInfo {
        (self.inner)()
    }

    /// Returns the constructor of the empty wrapper.
    #[inline]
    pub const fn constructor(&self) -> fn() -> Box<dyn Reflect> {
        self.none
    }

    /// Creates the empty wrapper.
    #[inline]
    pub fn none(&self) -> Box<dyn Reflect> {
        (self.none)()
    }

    /// Wraps an inner value.
    #[inline]
    pub fn wrap(&self, inner: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(inner)
    }
}

// -----------------------------------------------------------------------------
// PointerInfo

/// Metadata for transparent shared references such as `Arc<T>`.
#[derive(Debug)]
pub struct PointerInfo {
    ty: Type,
    target: fn() -> &'static TypeInfo,
    wrap: WrapFn,
}

impl PointerInfo {
    impl_type_fn!(ty);

    /// Creates a new [`PointerInfo`].
    #[inline]
    pub fn new<T: Reflect, Target: Typed>(wrap: WrapFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            target: Target::type_info,
            wrap,
        }
    }

    /// Returns the target [`TypeInfo`].
    #[inline]
    pub fn target_info(&self) -> &'static TypeInfo {
        (self.target)()
    }

    /// Wraps a target value.
    #[inline]
    pub fn wrap(&self, target: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(target)
    }
}
