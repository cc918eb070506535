use core::fmt;
use core::ops::Deref;

use weft_utils::hash::HashMap;

use crate::Reflect;
use crate::info::{FieldMut, FieldRef, Getter, Inclusion, RecordInfo, Setter, TypeInfo};

// -----------------------------------------------------------------------------
// Accessor chains

/// Reads a property, possibly through flattened parents.
#[derive(Clone)]
pub(crate) struct ReadAccess {
    pub(crate) parents: Box<[FieldRef]>,
    pub(crate) getter: Getter,
}

/// Writes a property, possibly through flattened parents.
#[derive(Clone)]
pub(crate) struct WriteAccess {
    pub(crate) parents: Box<[FieldMut]>,
    pub(crate) setter: Setter,
}

fn descend_mut<'a>(record: &'a mut dyn Reflect, parents: &[FieldMut]) -> Option<&'a mut dyn Reflect> {
    match parents.split_first() {
        None => Some(record),
        Some((first, rest)) => descend_mut(first(record)?, rest),
    }
}

// -----------------------------------------------------------------------------
// PropertyValue

/// A value read from a property: borrowed from a field or freshly computed.
pub enum PropertyValue<'a> {
    Borrowed(&'a dyn Reflect),
    Owned(Box<dyn Reflect>),
}

impl Deref for PropertyValue<'_> {
    type Target = dyn Reflect;

    #[inline]
    fn deref(&self) -> &dyn Reflect {
        match self {
            Self::Borrowed(value) => *value,
            Self::Owned(value) => &**value,
        }
    }
}

// -----------------------------------------------------------------------------
// PropertyDescriptor

/// A property as the sessions see it: resolved names, accessors and policy.
#[derive(Clone)]
pub struct PropertyDescriptor {
    pub(crate) name: &'static str,
    pub(crate) wire_name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) type_info: fn() -> &'static TypeInfo,
    pub(crate) read: Option<ReadAccess>,
    pub(crate) write: Option<WriteAccess>,
    pub(crate) inclusion: Inclusion,
}

impl PropertyDescriptor {
    /// Returns the logical name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the name written to and expected in the tree.
    #[inline]
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    /// Returns the extra names accepted when parsing.
    #[inline]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Returns the declared property type.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        self.read.is_some()
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    #[inline]
    pub fn inclusion(&self) -> Inclusion {
        self.inclusion
    }

    /// Reads the property from `record`.
    ///
    /// `None` if the property is write-only or `record` is not of the
    /// record type.
    pub fn read<'a>(&self, record: &'a dyn Reflect) -> Option<PropertyValue<'a>> {
        let access = self.read.as_ref()?;
        let mut current = record;
        for parent in &access.parents {
            current = parent(current)?;
        }
        match access.getter {
            Getter::Field(get) => get(current).map(PropertyValue::Borrowed),
            Getter::Computed(compute) => compute(current).map(PropertyValue::Owned),
        }
    }

    /// Stores `value` into `record`, handing it back on a type mismatch or
    /// if the property is read-only.
    pub fn write(&self, record: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        let Some(access) = self.write.as_ref() else {
            return Err(value);
        };
        match descend_mut(record, &access.parents) {
            Some(target) => (access.setter)(target, value),
            None => Err(value),
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("wire_name", &self.wire_name)
            .field("aliases", &self.aliases)
            .field("type", &self.type_info().type_path())
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .field("inclusion", &self.inclusion)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// RecordLayout

/// The resolved property table of a record type.
///
/// Order and names are fixed when the layout is built.
#[derive(Debug)]
pub struct RecordLayout {
    pub(crate) record: &'static RecordInfo,
    pub(crate) properties: Box<[PropertyDescriptor]>,
    pub(crate) lookup: HashMap<String, usize>,
}

impl RecordLayout {
    /// Returns the record type.
    #[inline]
    pub fn record(&self) -> &'static RecordInfo {
        self.record
    }

    /// Returns the properties in marshalling order.
    #[inline]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Finds a property by wire name or alias.
    pub fn property(&self, wire_name: &str) -> Option<&PropertyDescriptor> {
        self.lookup
            .get(wire_name)
            .map(|index| &self.properties[*index])
    }

    /// Iterates the properties that are written when serializing.
    pub fn readable(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|property| property.is_readable())
    }
}
