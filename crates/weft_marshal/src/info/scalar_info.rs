use crate::info::{Type, impl_type_fn};
use crate::{Reflect, ScalarRef};

// -----------------------------------------------------------------------------
// ScalarInfo

/// The scalar family a [`ScalarInfo`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    /// Signed integers.
    Int,
    /// Unsigned integers.
    UInt,
    Float,
    Char,
    String,
}

/// Metadata for scalar types: booleans, numbers, characters and strings.
///
/// `from_scalar` converts a notation scalar into the concrete type. It is
/// lenient the way text notations need: numeric targets accept numeric
/// strings, string targets accept any scalar.
#[derive(Debug)]
pub struct ScalarInfo {
    ty: Type,
    kind: ScalarKind,
    from_scalar: fn(ScalarRef<'_>) -> Option<Box<dyn Reflect>>,
}

impl ScalarInfo {
    impl_type_fn!(ty);

    /// Creates a new [`ScalarInfo`].
    #[inline]
    pub fn new<T: Reflect>(
        kind: ScalarKind,
        from_scalar: fn(ScalarRef<'_>) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
            from_scalar,
        }
    }

    /// Returns the scalar family.
    #[inline]
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Converts a scalar into a value of this type.
    ///
    /// Returns `None` if the scalar does not fit the type.
    #[inline]
    pub fn from_scalar(&self, scalar: ScalarRef<'_>) -> Option<Box<dyn Reflect>> {
        (self.from_scalar)(scalar)
    }
}

// -----------------------------------------------------------------------------
// EnumInfo

/// Metadata for unit-only enumerations.
///
/// Variants are written by their wire names, in declaration order.
#[derive(Debug)]
pub struct EnumInfo {
    ty: Type,
    variants: &'static [&'static str],
    from_index: fn(usize) -> Option<Box<dyn Reflect>>,
}

impl EnumInfo {
    impl_type_fn!(ty);

    /// Creates a new [`EnumInfo`].
    #[inline]
    pub fn new<T: Reflect>(
        variants: &'static [&'static str],
        from_index: fn(usize) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            variants,
            from_index,
        }
    }

    /// Overrides the type path.
    pub fn with_type_path(mut self, path: &'static str) -> Self {
        self.ty = self.ty.renamed(path);
        self
    }

    /// Returns the wire names of all variants.
    #[inline]
    pub const fn variants(&self) -> &'static [&'static str] {
        self.variants
    }

    /// Returns the wire name of the variant at `index`.
    #[inline]
    pub fn variant_name(&self, index: usize) -> Option<&'static str> {
        self.variants.get(index).copied()
    }

    /// Returns the index of the variant with the given wire name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|variant| *variant == name)
    }

    /// Creates the variant at `index`.
    #[inline]
    pub fn from_index(&self, index: usize) -> Option<Box<dyn Reflect>> {
        (self.from_index)(index)
    }
}
