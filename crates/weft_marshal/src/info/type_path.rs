use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// Type

/// The identity of a reflected type: its [`TypeId`] and a printable path.
///
/// The path defaults to [`core::any::type_name`], derived types may
/// override it with `#[weft(type_path = "...")]`.
///
/// # Example
///
/// ```
/// # use weft_marshal::info::Type;
/// let ty = Type::of::<Vec<u8>>();
/// assert!(ty.is::<Vec<u8>>());
/// assert_eq!(ty.name(), "Vec<u8>");
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
}

impl Type {
    /// Creates a `Type` from the compiler-provided type name.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: core::any::type_name::<T>(),
        }
    }

    /// Creates a `Type` with a custom path.
    #[inline]
    pub fn with_path<T: ?Sized + 'static>(path: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            path,
        }
    }

    /// Returns the same type under a different path.
    #[inline]
    pub const fn renamed(self, path: &'static str) -> Self {
        Self { id: self.id, path }
    }

    /// Returns the [`TypeId`] of the type.
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type path.
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the path without the leading module path.
    ///
    /// Generic arguments keep their full paths.
    pub fn name(&self) -> &'static str {
        let path = self.path;
        let generics = path.find('<').unwrap_or(path.len());
        let start = path[..generics].rfind("::").map_or(0, |index| index + 2);
        &path[start..]
    }

    /// Check if the given type matches this one.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        TypeId::of::<T>() == self.id
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

macro_rules! impl_type_fn {
    ($field:ident) => {
        /// Returns the underlying `Type`.
        #[inline(always)]
        pub const fn ty(&self) -> &$crate::info::Type {
            &self.$field
        }

        /// Returns the `TypeId`.
        #[inline]
        pub const fn type_id(&self) -> ::core::any::TypeId {
            self.$field.id()
        }

        /// Check if the given type matches this one.
        #[inline]
        pub fn type_is<T: ::core::any::Any>(&self) -> bool {
            self.$field.is::<T>()
        }

        /// Returns the type path.
        #[inline]
        pub const fn type_path(&self) -> &'static str {
            self.$field.path()
        }

        /// Returns the type name.
        #[inline]
        pub fn type_name(&self) -> &'static str {
            self.$field.name()
        }
    };
}

pub(crate) use impl_type_fn;

#[cfg(test)]
mod tests {
    use super::Type;
    use alloc::collections::BTreeMap;
    use alloc::string::String;

    #[test]
    fn short_name_keeps_generic_arguments() {
        assert_eq!(Type::of::<String>().name(), "String");
        assert_eq!(
            Type::of::<BTreeMap<String, u8>>().name(),
            "BTreeMap<alloc::string::String, u8>"
        );
        assert_eq!(Type::of::<u8>().name(), "u8");
        assert_eq!(Type::with_path::<u8>("my::Byte").name(), "Byte");
    }
}
