//! Type classification: what a declared type is, as far as marshalling goes.
//!
//! A [`TypeDescriptor`] is computed once per declared type and registry, and
//! never changes afterwards. Container descriptors refer to their element
//! types by [`TypeInfo`]; elements are classified on demand, so recursive
//! types terminate.

mod cache;

pub(crate) use cache::DescriptorCache;

use alloc::sync::Arc;
use core::fmt;

use crate::Reflect;
use crate::info::{RecordInfo, ScalarKind, TypeInfo};
use crate::introspect::RecordLayout;
use crate::registry::ConfigurationError;
use crate::transform::Transform;

// -----------------------------------------------------------------------------
// Classification

/// The shape of a sequence type, unwound through nested sequences and
/// nullable wrappers.
///
/// For `Vec<[Option<u8>; 2]>` the element is `[Option<u8>; 2]`, the base
/// is `u8` and there are two dimensions.
#[derive(Debug, Clone, Copy)]
pub struct SequenceShape {
    element: &'static TypeInfo,
    base: &'static TypeInfo,
    dimensions: usize,
}

impl SequenceShape {
    fn unwind(element: &'static TypeInfo) -> Self {
        let mut base = element;
        let mut dimensions = 1;
        loop {
            base = match base {
                TypeInfo::List(info) => {
                    dimensions += 1;
                    info.item_info()
                }
                TypeInfo::Array(info) => {
                    dimensions += 1;
                    info.item_info()
                }
                TypeInfo::Optional(info) => info.inner_info(),
                _ => break,
            };
        }
        Self {
            element,
            base,
            dimensions,
        }
    }

    /// Returns the direct element type.
    #[inline]
    pub fn element(&self) -> &'static TypeInfo {
        self.element
    }

    /// Returns the innermost non-sequence, non-nullable element type.
    #[inline]
    pub fn base(&self) -> &'static TypeInfo {
        self.base
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// What the engine does with values of a type.
#[derive(Clone)]
pub enum Classification {
    Scalar(ScalarKind),
    /// A unit enum, written by variant name.
    Enum,
    /// A growable sequence.
    List(SequenceShape),
    /// A fixed-size sequence.
    Array { shape: SequenceShape, len: usize },
    Map {
        key: &'static TypeInfo,
        value: &'static TypeInfo,
    },
    Record(Arc<RecordLayout>),
    /// Marshalled as the intermediate form of a transform.
    Transformable(Arc<dyn Transform>),
    /// A nullable wrapper around the inner type.
    Optional(&'static TypeInfo),
    /// A transparent reference to the target type.
    Pointer(&'static TypeInfo),
    /// A polymorphic type: the runtime value decides.
    Abstract,
    /// A type that carries its own shape.
    Dynamic,
    /// Written as a debug string, never parsed back.
    Opaque,
}

impl Classification {
    /// Returns a short name of the classification.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Enum => "enum",
            Self::List(_) => "list",
            Self::Array { .. } => "array",
            Self::Map { .. } => "map",
            Self::Record(_) => "record",
            Self::Transformable(_) => "transformable",
            Self::Optional(_) => "optional",
            Self::Pointer(_) => "pointer",
            Self::Abstract => "abstract",
            Self::Dynamic => "dynamic",
            Self::Opaque => "opaque",
        }
    }

    /// Returns the types this classification refers to.
    pub(crate) fn children(&self) -> Vec<&'static TypeInfo> {
        match self {
            Self::List(shape) | Self::Array { shape, .. } => vec![shape.element],
            Self::Map { key, value } => vec![*key, *value],
            Self::Record(layout) => layout.properties().iter().map(|p| p.type_info()).collect(),
            Self::Transformable(transform) => vec![transform.intermediate()],
            Self::Optional(inner) | Self::Pointer(inner) => vec![*inner],
            _ => Vec::new(),
        }
    }
}

impl fmt::Debug for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.debug_tuple("Scalar").field(kind).finish(),
            Self::List(shape) => f.debug_tuple("List").field(shape).finish(),
            Self::Array { shape, len } => f
                .debug_struct("Array")
                .field("shape", shape)
                .field("len", len)
                .finish(),
            Self::Map { key, value } => f
                .debug_struct("Map")
                .field("key", &key.type_path())
                .field("value", &value.type_path())
                .finish(),
            Self::Record(layout) => f.debug_tuple("Record").field(layout).finish(),
            Self::Transformable(transform) => f.debug_tuple("Transformable").field(transform).finish(),
            Self::Optional(inner) => f.debug_tuple("Optional").field(&inner.type_path()).finish(),
            Self::Pointer(target) => f.debug_tuple("Pointer").field(&target.type_path()).finish(),
            other => f.write_str(other.name()),
        }
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The immutable classification of one declared type.
#[derive(Debug)]
pub struct TypeDescriptor {
    info: &'static TypeInfo,
    classification: Classification,
}

impl TypeDescriptor {
    pub(crate) fn new(info: &'static TypeInfo, classification: Classification) -> Self {
        Self {
            info,
            classification,
        }
    }

    /// Returns the declared type.
    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    #[inline]
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Returns the transform, if the type is transformable.
    pub fn transform(&self) -> Option<&Arc<dyn Transform>> {
        match &self.classification {
            Classification::Transformable(transform) => Some(transform),
            _ => None,
        }
    }

    /// Returns the record layout, if the type is a record.
    pub fn layout(&self) -> Option<&Arc<RecordLayout>> {
        match &self.classification {
            Classification::Record(layout) => Some(layout),
            _ => None,
        }
    }

    /// Returns the sequence shape, if the type is a list or an array.
    pub fn shape(&self) -> Option<&SequenceShape> {
        match &self.classification {
            Classification::List(shape) | Classification::Array { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// Returns `true` if a null value is a valid instance.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.info.is_nullable()
    }

    /// Returns the default value of the type, if it has one.
    pub fn default_value(&self) -> Option<Box<dyn Reflect>> {
        self.info.constructor().map(|constructor| constructor())
    }
}

/// Classifies a type by its shape, once transforms are ruled out.
///
/// `layout` builds the layout of a record type.
pub(crate) fn classify_shape(
    info: &'static TypeInfo,
    layout: impl FnOnce(&'static RecordInfo) -> Result<RecordLayout, ConfigurationError>,
) -> Result<Classification, ConfigurationError> {
    Ok(match info {
        TypeInfo::Scalar(scalar) => Classification::Scalar(scalar.kind()),
        TypeInfo::Enum(_) => Classification::Enum,
        TypeInfo::List(list) => Classification::List(SequenceShape::unwind(list.item_info())),
        TypeInfo::Array(array) => Classification::Array {
            shape: SequenceShape::unwind(array.item_info()),
            len: array.capacity(),
        },
        TypeInfo::Map(map) => Classification::Map {
            key: map.key_info(),
            value: map.value_info(),
        },
        TypeInfo::Record(record) => {
            let layout = layout(record)?;
            if layout.properties().is_empty() {
                Classification::Opaque
            } else {
                Classification::Record(Arc::new(layout))
            }
        }
        TypeInfo::Optional(optional) => Classification::Optional(optional.inner_info()),
        TypeInfo::Pointer(pointer) => Classification::Pointer(pointer.target_info()),
        TypeInfo::Abstract(_) => Classification::Abstract,
        TypeInfo::Dynamic(_) => Classification::Dynamic,
        TypeInfo::Opaque(_) => Classification::Opaque,
    })
}

#[cfg(test)]
mod tests {
    use super::SequenceShape;
    use crate::info::Typed;

    #[test]
    fn shape_unwinds_nested_sequences() {
        let shape = SequenceShape::unwind(<Vec<[Option<u8>; 2]>>::type_info());
        assert!(shape.element().is::<Vec<[Option<u8>; 2]>>());
        assert!(shape.base().is::<u8>());
        assert_eq!(shape.dimensions(), 3);

        let flat = SequenceShape::unwind(String::type_info());
        assert_eq!(flat.dimensions(), 1);
        assert!(flat.base().is::<String>());
    }
}
