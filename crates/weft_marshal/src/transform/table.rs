use alloc::sync::Arc;
use core::any::TypeId;

use weft_utils::TypeIdMap;

use crate::info::TypeInfo;
use crate::registry::ConfigurationError;
use crate::transform::Transform;

/// A transform waiting for the registry build.
#[derive(Clone)]
pub(crate) struct TransformRegistration {
    target: &'static TypeInfo,
    transform: Arc<dyn Transform>,
    priority: i32,
}

impl TransformRegistration {
    pub(crate) fn exact(target: &'static TypeInfo, transform: Arc<dyn Transform>, priority: i32) -> Self {
        Self {
            target,
            transform,
            priority,
        }
    }

    #[inline]
    pub(crate) fn target(&self) -> &'static TypeInfo {
        self.target
    }

    #[inline]
    pub(crate) fn transform(&self) -> &Arc<dyn Transform> {
        &self.transform
    }
}

#[derive(Clone)]
struct Slot {
    transform: Arc<dyn Transform>,
    priority: i32,
}

fn insert_slot(
    map: &mut TypeIdMap<Slot>,
    ty: &'static TypeInfo,
    slot: Slot,
) -> Result<(), ConfigurationError> {
    match map.get_mut(&ty.type_id()) {
        None => {
            map.insert(ty.type_id(), slot);
            Ok(())
        }
        Some(existing) if existing.priority == slot.priority => {
            Err(ConfigurationError::AmbiguousTransform {
                ty: ty.type_path(),
                first: existing.transform.name().into(),
                second: slot.transform.name().into(),
                priority: slot.priority,
            })
        }
        Some(existing) => {
            if slot.priority > existing.priority {
                *existing = slot;
            }
            Ok(())
        }
    }
}

/// Explicit transforms, resolved for lookup.
///
/// A registration against an abstract type (`Box<dyn Trait>`) applies to
/// every concrete type registered under that abstraction, through a
/// dictionary or an implementation registration.
#[derive(Default)]
pub(crate) struct TransformTable {
    exact: TypeIdMap<Slot>,
    abstraction: TypeIdMap<Slot>,
    inherited: TypeIdMap<Arc<dyn Transform>>,
}

impl TransformTable {
    /// `abstractions` maps each concrete type to the abstract types it is registered under.
    pub(crate) fn build(
        registrations: Vec<TransformRegistration>,
        abstractions: &TypeIdMap<Vec<&'static TypeInfo>>,
        concrete: impl Fn(TypeId) -> Option<&'static TypeInfo>,
    ) -> Result<Self, ConfigurationError> {
        let mut table = Self::default();
        let targets: Vec<_> = registrations.iter().map(TransformRegistration::target).collect();

        for registration in registrations {
            let slot = Slot {
                transform: registration.transform,
                priority: registration.priority,
            };
            let map = match registration.target {
                TypeInfo::Abstract(_) => &mut table.abstraction,
                _ => &mut table.exact,
            };
            insert_slot(map, registration.target, slot)?;
        }

        for (concrete_id, bases) in abstractions.iter() {
            let Some(info) = concrete(*concrete_id) else {
                continue;
            };
            let mut best = TypeIdMap::new();
            for base in bases {
                if let Some(slot) = table.abstraction.get(&base.type_id()) {
                    insert_slot(&mut best, info, slot.clone())?;
                }
            }
            if let Some(slot) = best.get(concrete_id) {
                table
                    .inherited
                    .insert(*concrete_id, Arc::clone(&slot.transform));
            }
        }

        for target in targets {
            table.check_chain(target)?;
        }

        log::trace!(
            "transform table: {} exact, {} abstract, {} inherited",
            table.exact.len(),
            table.abstraction.len(),
            table.inherited.len()
        );
        Ok(table)
    }

    /// Follows the intermediates reachable from `start`, failing when one
    /// leads back to a type already on the chain.
    fn check_chain(&self, start: &'static TypeInfo) -> Result<(), ConfigurationError> {
        let mut chain = vec![start];
        let mut current = start;
        while let Some(transform) = self.for_target(current) {
            let next = transform.intermediate();
            let revisit = chain.iter().any(|seen| seen.type_id() == next.type_id());
            chain.push(next);
            if revisit {
                let path = chain
                    .iter()
                    .map(|info| info.type_path())
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(ConfigurationError::TransformCycle { path });
            }
            current = next;
        }
        Ok(())
    }

    /// The transform for a value being written.
    ///
    /// Order: exact runtime type, exact declared type, an abstraction the
    /// runtime type is registered under, the declared abstraction itself.
    pub(crate) fn for_value(
        &self,
        declared: &'static TypeInfo,
        runtime: &'static TypeInfo,
    ) -> Option<&Arc<dyn Transform>> {
        let runtime_id = runtime.type_id();
        let declared_id = declared.type_id();
        self.exact
            .get(&runtime_id)
            .or_else(|| self.exact.get(&declared_id))
            .map(|slot| &slot.transform)
            .or_else(|| self.inherited.get(&runtime_id))
            .or_else(|| self.abstraction.get(&declared_id).map(|slot| &slot.transform))
    }

    /// The transform for a target being parsed.
    pub(crate) fn for_target(&self, target: &'static TypeInfo) -> Option<&Arc<dyn Transform>> {
        let id = target.type_id();
        self.exact
            .get(&id)
            .map(|slot| &slot.transform)
            .or_else(|| self.inherited.get(&id))
            .or_else(|| self.abstraction.get(&id).map(|slot| &slot.transform))
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.abstraction.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{TransformRegistration, TransformTable};
    use crate::info::Typed;
    use crate::registry::ConfigurationError;
    use crate::transform::{FnTransform, Transform};
    use alloc::sync::Arc;
    use weft_utils::TypeIdMap;

    fn to_text(name: &'static str) -> Arc<dyn Transform> {
        Arc::new(FnTransform::<u8, String>::new(|v| v.to_string(), |s| s.parse().map_err(|_| s)).named(name))
    }

    #[test]
    fn higher_priority_wins_and_ties_fail() {
        let registrations = vec![
            TransformRegistration::exact(u8::type_info(), to_text("low"), 0),
            TransformRegistration::exact(u8::type_info(), to_text("high"), 5),
        ];
        let table = TransformTable::build(registrations, &TypeIdMap::new(), |_| None).unwrap();
        let found = table.for_target(u8::type_info()).unwrap();
        assert_eq!(found.name(), "high");
        assert!(!table.is_empty());

        let registrations = vec![
            TransformRegistration::exact(u8::type_info(), to_text("a"), 1),
            TransformRegistration::exact(u8::type_info(), to_text("b"), 1),
        ];
        let err = TransformTable::build(registrations, &TypeIdMap::new(), |_| None).err().unwrap();
        assert!(matches!(err, ConfigurationError::AmbiguousTransform { ty: "u8", .. }));
    }

    #[test]
    fn runtime_type_wins_over_declared() {
        let registrations = vec![
            TransformRegistration::exact(u8::type_info(), to_text("runtime"), 0),
            TransformRegistration::exact(u16::type_info(), to_text("declared"), 0),
        ];
        let table = TransformTable::build(registrations, &TypeIdMap::new(), |_| None).unwrap();
        let found = table.for_value(u16::type_info(), u8::type_info()).unwrap();
        assert_eq!(found.name(), "runtime");
        let found = table.for_value(u16::type_info(), u32::type_info()).unwrap();
        assert_eq!(found.name(), "declared");
        assert!(table.for_value(u32::type_info(), u32::type_info()).is_none());
    }

    #[test]
    fn intermediates_leading_back_are_rejected() {
        let widen: Arc<dyn Transform> = Arc::new(FnTransform::<u8, u16>::new(|v| u16::from(*v), |v| {
            u8::try_from(v).map_err(|_| v.to_string())
        }));
        let narrow: Arc<dyn Transform> = Arc::new(FnTransform::<u16, u8>::new(
            |v| (*v & 0xff) as u8,
            |v| Ok(u16::from(v)),
        ));

        let registrations = vec![
            TransformRegistration::exact(u8::type_info(), Arc::clone(&widen), 0),
            TransformRegistration::exact(u16::type_info(), narrow, 0),
        ];
        let err = TransformTable::build(registrations, &TypeIdMap::new(), |_| None).err().unwrap();
        assert_eq!(
            err,
            ConfigurationError::TransformCycle {
                path: "u8 -> u16 -> u8".into()
            }
        );

        let chained = vec![
            TransformRegistration::exact(u8::type_info(), widen, 0),
            TransformRegistration::exact(u16::type_info(), to_text("text"), 0),
        ];
        assert!(TransformTable::build(chained, &TypeIdMap::new(), |_| None).is_ok());
    }
}
