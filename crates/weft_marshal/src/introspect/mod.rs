//! Record introspection: from a [`RecordInfo`] and its overrides to the
//! [`RecordLayout`] the sessions walk.
//!
//! Candidates are the record's own properties in declaration order, then the
//! properties of each flattened parent. Candidates sharing a logical name
//! merge: the first keeps its position, later ones only fill in a missing
//! read or write accessor.
//!
//! [`RecordInfo`]: crate::info::RecordInfo

// -----------------------------------------------------------------------------
// Modules

mod layout;
mod overrides;

// -----------------------------------------------------------------------------
// Exports

pub use layout::{PropertyDescriptor, PropertyValue, RecordLayout};
pub use overrides::{PropertyOverride, RecordOverride};

use core::any::TypeId;

use weft_utils::hash::HashMap;

use crate::info::{FieldMut, FieldRef, Inclusion, PropertyInfo, RecordInfo, Visibility};
use crate::introspect::layout::{ReadAccess, WriteAccess};
use crate::registry::ConfigurationError;

struct Candidate {
    property: &'static PropertyInfo,
    reads: Vec<FieldRef>,
    writes: Vec<FieldMut>,
}

fn collect(
    record: &'static RecordInfo,
    reads: &[FieldRef],
    writes: &[FieldMut],
    visited: &mut Vec<TypeId>,
    out: &mut Vec<Candidate>,
) -> Result<(), ConfigurationError> {
    if visited.contains(&record.type_id()) {
        return Ok(());
    }
    visited.push(record.type_id());

    for property in record.properties().iter().filter(|p| !p.is_flatten()) {
        out.push(Candidate {
            property,
            reads: reads.to_vec(),
            writes: writes.to_vec(),
        });
    }

    for property in record.properties().iter().filter(|p| p.is_flatten()) {
        let invalid = || ConfigurationError::InvalidFlatten {
            record: record.type_path(),
            property: property.name().into(),
        };
        let parent = property.type_info().as_record().map_err(|_| invalid())?;
        let get = property.field_ref().ok_or_else(invalid)?;
        let get_mut = property.getter_mut().ok_or_else(invalid)?;

        let mut reads = reads.to_vec();
        reads.push(get);
        let mut writes = writes.to_vec();
        writes.push(get_mut);
        collect(parent, &reads, &writes, visited, out)?;
    }

    visited.pop();
    Ok(())
}

struct Merged {
    property: &'static PropertyInfo,
    read: Option<ReadAccess>,
    write: Option<WriteAccess>,
}

fn merge(record: &RecordInfo, candidates: Vec<Candidate>) -> Result<Vec<Merged>, ConfigurationError> {
    let mut merged: Vec<Merged> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let property = candidate.property;
        let read = property.getter().map(|getter| ReadAccess {
            parents: candidate.reads.into_boxed_slice(),
            getter,
        });
        let write = property.setter_fn().map(|setter| WriteAccess {
            parents: candidate.writes.into_boxed_slice(),
            setter,
        });

        match merged.iter_mut().find(|m| m.property.name() == property.name()) {
            Some(existing) => {
                if existing.property.type_id() != property.type_id() {
                    return Err(ConfigurationError::PropertyTypeConflict {
                        record: record.type_path(),
                        property: property.name().into(),
                    });
                }
                if existing.read.is_none() {
                    existing.read = read;
                }
                if existing.write.is_none() {
                    existing.write = write;
                }
            }
            None => merged.push(Merged {
                property,
                read,
                write,
            }),
        }
    }
    Ok(merged)
}

/// Builds the layout of a record type.
///
/// `sort_by_default` applies when neither the type nor the override decides
/// the property order.
pub fn introspect(
    record: &'static RecordInfo,
    overrides: &RecordOverride,
    sort_by_default: bool,
) -> Result<RecordLayout, ConfigurationError> {
    let mut candidates = Vec::new();
    collect(record, &[], &[], &mut Vec::new(), &mut candidates)?;
    let merged = merge(record, candidates)?;

    for name in overrides.referenced_names() {
        if !merged.iter().any(|m| m.property.name() == name) {
            return Err(ConfigurationError::UnknownProperty {
                record: record.type_path(),
                property: name.into(),
            });
        }
    }

    let listed = |list: &[String], name: &str| list.iter().any(|entry| entry == name);

    let mut properties = Vec::with_capacity(merged.len());
    for Merged {
        property,
        mut read,
        mut write,
    } in merged
    {
        let name = property.name();
        let config = overrides.properties.get(name);
        let inclusion = config
            .and_then(|config| config.inclusion)
            .unwrap_or(property.inclusion());

        if inclusion == Inclusion::Never
            || listed(&overrides.exclude, name)
            || overrides.include.as_ref().is_some_and(|list| !listed(list, name))
            || (overrides.public_only
                && property.visibility() == Visibility::Private
                && inclusion != Inclusion::Always)
        {
            continue;
        }
        if listed(&overrides.read_only, name) {
            write = None;
        }
        if listed(&overrides.write_only, name) {
            read = None;
        }
        if read.is_none() && write.is_none() {
            continue;
        }

        let wire_name = config
            .and_then(|config| config.rename.clone())
            .or_else(|| property.rename().map(String::from))
            .unwrap_or_else(|| String::from(name));
        let mut aliases: Vec<String> = property.aliases().iter().map(|a| String::from(*a)).collect();
        for alias in config.iter().flat_map(|config| &config.aliases) {
            if !aliases.contains(alias) {
                aliases.push(alias.clone());
            }
        }
        aliases.retain(|alias| *alias != wire_name);

        properties.push(PropertyDescriptor {
            name,
            wire_name,
            aliases,
            type_info: property.type_info_fn(),
            read,
            write,
            inclusion,
        });
    }

    let explicit = overrides.order.as_ref().or(overrides.include.as_ref());
    match explicit {
        Some(order) => {
            // Stable: unlisted properties keep their relative order, after the listed ones.
            properties.sort_by_key(|p| {
                order
                    .iter()
                    .position(|name| name == p.name)
                    .unwrap_or(usize::MAX)
            });
        }
        None => {
            let sort = overrides
                .sort_properties
                .unwrap_or(record.sort_properties() || sort_by_default);
            if sort {
                properties.sort_by(|a, b| a.wire_name.cmp(&b.wire_name));
            }
        }
    }

    let mut lookup = HashMap::default();
    for (index, property) in properties.iter().enumerate() {
        for key in core::iter::once(&property.wire_name).chain(&property.aliases) {
            if lookup.insert(key.clone(), index).is_some() {
                return Err(ConfigurationError::DuplicateProperty {
                    record: record.type_path(),
                    name: key.clone(),
                });
            }
        }
    }

    log::trace!(
        "introspected `{}`: {} properties",
        record.type_path(),
        properties.len()
    );

    Ok(RecordLayout {
        record,
        properties: properties.into_boxed_slice(),
        lookup,
    })
}

#[cfg(test)]
mod tests {
    use super::{PropertyOverride, RecordOverride, introspect};
    use crate::Reflect;
    use crate::impls::NonGenericTypeInfoCell;
    use crate::info::{Inclusion, PropertyInfo, RecordInfo, TypeInfo, Typed, Visibility};
    use crate::registry::ConfigurationError;
    use crate::reflection::ReflectRef;

    #[derive(Default)]
    struct Base {
        id: u32,
        note: String,
    }

    #[derive(Default)]
    struct Item {
        name: String,
        base: Base,
        secret: u8,
    }

    impl Typed for Base {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::Record(
                    RecordInfo::builder::<Self>()
                        .property(PropertyInfo::field::<u32>(
                            "id",
                            |r| r.downcast_ref::<Base>().map(|r| &r.id as &dyn Reflect),
                            |r| r.downcast_mut::<Base>().map(|r| &mut r.id as &mut dyn Reflect),
                            |r, v| {
                                let v = v.take::<u32>()?;
                                if let Some(r) = r.downcast_mut::<Base>() {
                                    r.id = v;
                                }
                                Ok(())
                            },
                        ))
                        .property(
                            PropertyInfo::field::<String>(
                                "note",
                                |r| r.downcast_ref::<Base>().map(|r| &r.note as &dyn Reflect),
                                |r| r.downcast_mut::<Base>().map(|r| &mut r.note as &mut dyn Reflect),
                                |_, v| Err(v),
                            )
                            .with_aliases(&["remark"]),
                        )
                        .default_constructor::<Self>()
                        .build(),
                )
            })
        }
    }

    impl Reflect for Base {
        fn reflect_ref(&self) -> ReflectRef<'_> {
            ReflectRef::Record
        }
    }

    impl Typed for Item {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::Record(
                    RecordInfo::builder::<Self>()
                        .property(PropertyInfo::field::<String>(
                            "name",
                            |r| r.downcast_ref::<Item>().map(|r| &r.name as &dyn Reflect),
                            |r| r.downcast_mut::<Item>().map(|r| &mut r.name as &mut dyn Reflect),
                            |r, v| {
                                let v = v.take::<String>()?;
                                if let Some(r) = r.downcast_mut::<Item>() {
                                    r.name = v;
                                }
                                Ok(())
                            },
                        ))
                        .property(
                            PropertyInfo::field::<Base>(
                                "base",
                                |r| r.downcast_ref::<Item>().map(|r| &r.base as &dyn Reflect),
                                |r| r.downcast_mut::<Item>().map(|r| &mut r.base as &mut dyn Reflect),
                                |_, v| Err(v),
                            )
                            .flattened(),
                        )
                        .property(
                            PropertyInfo::field::<u8>(
                                "secret",
                                |r| r.downcast_ref::<Item>().map(|r| &r.secret as &dyn Reflect),
                                |r| r.downcast_mut::<Item>().map(|r| &mut r.secret as &mut dyn Reflect),
                                |_, v| Err(v),
                            )
                            .with_visibility(Visibility::Private),
                        )
                        .property(PropertyInfo::computed::<usize>("name_len", |r| {
                            r.downcast_ref::<Item>()
                                .map(|r| Box::new(r.name.len()) as Box<dyn Reflect>)
                        }))
                        .default_constructor::<Self>()
                        .build(),
                )
            })
        }
    }

    impl Reflect for Item {
        fn reflect_ref(&self) -> ReflectRef<'_> {
            ReflectRef::Record
        }
    }

    fn item_info() -> &'static RecordInfo {
        Item::type_info().as_record().unwrap()
    }

    fn wire_names(overrides: &RecordOverride) -> Vec<String> {
        introspect(item_info(), overrides, false)
            .unwrap()
            .properties()
            .iter()
            .map(|p| p.wire_name().to_owned())
            .collect()
    }

    #[test]
    fn flattened_parents_follow_own_properties() {
        assert_eq!(
            wire_names(&RecordOverride::new()),
            ["name", "secret", "name_len", "id", "note"]
        );
    }

    #[test]
    fn accessors_reach_through_parents() {
        let layout = introspect(item_info(), &RecordOverride::new(), false).unwrap();
        let mut item = Item {
            name: "abc".into(),
            ..Item::default()
        };

        let id = layout.property("id").unwrap();
        id.write(&mut item, Box::new(9_u32)).unwrap();
        assert_eq!(item.base.id, 9);
        assert_eq!(*id.read(&item).unwrap().downcast_ref::<u32>().unwrap(), 9);

        let len = layout.property("name_len").unwrap();
        assert!(!len.is_writable());
        assert_eq!(*len.read(&item).unwrap().downcast_ref::<usize>().unwrap(), 3);

        // Wrong value type is handed back.
        assert!(id.write(&mut item, Box::new(1_u8)).is_err());
        assert!(layout.property("remark").is_some());
    }

    #[test]
    fn overrides_filter_rename_and_order() {
        let overrides = RecordOverride::new()
            .with_exclude(["secret"])
            .with_order(["id", "name"])
            .with_property("name", PropertyOverride::new().with_rename("title").with_alias("label"));
        assert_eq!(wire_names(&overrides), ["id", "title", "name_len", "note"]);

        let layout = introspect(item_info(), &overrides, false).unwrap();
        assert_eq!(layout.property("label").unwrap().name(), "name");
        assert!(layout.property("name").is_none());

        let include = RecordOverride::new().with_include(["note", "id"]);
        assert_eq!(wire_names(&include), ["note", "id"]);

        let sorted = RecordOverride::new().with_sort_properties(true);
        assert_eq!(wire_names(&sorted), ["id", "name", "name_len", "note", "secret"]);

        let public = RecordOverride::new().with_public_only(true);
        assert!(!wire_names(&public).contains(&"secret".to_owned()));

        let forced = RecordOverride::new()
            .with_public_only(true)
            .with_property("secret", PropertyOverride::new().with_inclusion(Inclusion::Always));
        assert!(wire_names(&forced).contains(&"secret".to_owned()));

        let never = RecordOverride::new()
            .with_property("id", PropertyOverride::new().with_inclusion(Inclusion::Never));
        assert!(!wire_names(&never).contains(&"id".to_owned()));
    }

    #[test]
    fn read_and_write_only() {
        let overrides = RecordOverride::new()
            .with_read_only(["name"])
            .with_write_only(["id"]);
        let layout = introspect(item_info(), &overrides, false).unwrap();
        let name = layout.property("name").unwrap();
        assert!(name.is_readable() && !name.is_writable());
        let id = layout.property("id").unwrap();
        assert!(!id.is_readable() && id.is_writable());
        assert!(layout.readable().all(|p| p.name() != "id"));
    }

    #[test]
    fn configuration_errors() {
        let unknown = RecordOverride::new().with_exclude(["missing"]);
        let err = introspect(item_info(), &unknown, false).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownProperty {
                record: Item::type_info().type_path(),
                property: "missing".into(),
            }
        );

        let clash = RecordOverride::new()
            .with_property("name", PropertyOverride::new().with_rename("id"));
        let err = introspect(item_info(), &clash, false).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateProperty { .. }));

        let alias_clash = RecordOverride::new()
            .with_property("id", PropertyOverride::new().with_alias("remark"));
        assert!(introspect(item_info(), &alias_clash, false).is_err());
    }
}
