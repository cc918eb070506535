use core::any::TypeId;

use crate::info::{Inclusion, TypeInfo};
use crate::introspect::RecordLayout;
use crate::node::{EventSink, Node, TreeSink};
use crate::registry::Registry;
use crate::session::{SerializeConfig, SessionError, SessionErrorKind, TraversalPath};
use crate::{List, Map, Reflect, ReflectRef, ScalarRef};

/// Writes one value tree into an [`EventSink`].
///
/// A session is single-use and single-threaded. It owns the traversal state
/// and only reads the registry.
pub(crate) struct SerializeSession<'a> {
    registry: &'a Registry,
    config: &'a SerializeConfig,
    path: TraversalPath,
    /// Identity (address, runtime type) of every container on the open path.
    open: Vec<(usize, TypeId)>,
    types: Vec<&'static str>,
}

impl<'a> SerializeSession<'a> {
    pub(crate) fn new(registry: &'a Registry, config: &'a SerializeConfig) -> Self {
        Self {
            registry,
            config,
            path: TraversalPath::root(),
            open: Vec::new(),
            types: Vec::new(),
        }
    }

    fn error(&self, kind: impl Into<SessionErrorKind>) -> SessionError {
        SessionError::new(kind.into(), &self.path).with_type_stack(&self.types)
    }

    /// Writes `value`, declared as `declared`.
    ///
    /// `enclosing` is the record owning the property being written, if any.
    pub(crate) fn write(
        &mut self,
        value: &dyn Reflect,
        declared: &'static TypeInfo,
        enclosing: Option<TypeId>,
        sink: &mut dyn EventSink,
    ) -> Result<(), SessionError> {
        let runtime = value.reflect_type_info();
        self.types.push(runtime.type_path());
        let result = self.write_inner(value, declared, runtime, enclosing, sink);
        self.types.pop();
        result
    }

    fn write_inner(
        &mut self,
        value: &dyn Reflect,
        declared: &'static TypeInfo,
        runtime: &'static TypeInfo,
        enclosing: Option<TypeId>,
        sink: &mut dyn EventSink,
    ) -> Result<(), SessionError> {
        let transform = self
            .registry
            .transform_for_value(declared, runtime)
            .map_err(|err| self.error(err))?;
        if let Some(transform) = transform {
            let reduced = transform.reduce(value).map_err(|err| self.error(err))?;
            return self.write(&*reduced, transform.intermediate(), enclosing, sink);
        }

        match value.reflect_ref() {
            ReflectRef::Null => sink.null(),
            ReflectRef::Scalar(scalar) => sink.scalar(scalar),
            ReflectRef::Enum(index) => {
                let name = runtime
                    .as_enum()
                    .ok()
                    .and_then(|info| info.variant_name(index));
                match name {
                    Some(name) => sink.scalar(ScalarRef::Str(name)),
                    None => {
                        return Err(self.error(SessionErrorKind::TypeMismatch {
                            expected: format!("a variant of `{}`", runtime.type_path()),
                            found: "enum",
                        }));
                    }
                }
            }
            ReflectRef::Pointer(inner) => {
                let next = match declared {
                    TypeInfo::Optional(info) => info.inner_info(),
                    TypeInfo::Pointer(info) => info.target_info(),
                    TypeInfo::Abstract(_) => declared,
                    _ => inner.reflect_type_info(),
                };
                self.write(inner, next, enclosing, sink)?;
            }
            ReflectRef::List(list) => {
                if self.enter(value, sink)? {
                    let result = self.write_list(list, runtime, enclosing, sink);
                    self.open.pop();
                    result?;
                }
            }
            ReflectRef::Map(map) => {
                if self.enter(value, sink)? {
                    let result = self.write_map(map, runtime, enclosing, sink);
                    self.open.pop();
                    result?;
                }
            }
            ReflectRef::Record => {
                let descriptor = self.registry.classify(runtime).map_err(|err| self.error(err))?;
                match descriptor.layout() {
                    Some(layout) => {
                        if self.enter(value, sink)? {
                            let result = self.write_record(value, layout, declared, runtime, enclosing, sink);
                            self.open.pop();
                            result?;
                        }
                    }
                    None => self.write_opaque(value, runtime, sink),
                }
            }
            ReflectRef::Opaque => self.write_opaque(value, runtime, sink),
        }
        Ok(())
    }

    /// Opens a container; `false` when it is already open and recursions are ignored.
    fn enter(&mut self, value: &dyn Reflect, sink: &mut dyn EventSink) -> Result<bool, SessionError> {
        let identity = (
            (value as *const dyn Reflect).cast::<()>() as usize,
            value.ty_id(),
        );
        if self.open.contains(&identity) {
            if self.config.ignore_recursions {
                sink.null();
                return Ok(false);
            }
            return Err(self.error(SessionErrorKind::Recursion {
                ty: value.reflect_type_info().type_path(),
            }));
        }
        if self.open.len() >= self.config.max_depth {
            return Err(self.error(SessionErrorKind::DepthExceeded {
                max_depth: self.config.max_depth,
            }));
        }
        self.open.push(identity);
        Ok(true)
    }

    fn write_opaque(&mut self, value: &dyn Reflect, runtime: &'static TypeInfo, sink: &mut dyn EventSink) {
        log::warn!(
            "`{}` has no transform and no properties, writing it at {} as its debug string",
            runtime.type_path(),
            self.path
        );
        sink.scalar(ScalarRef::Str(&format!("{value:?}")));
    }

    fn write_list(
        &mut self,
        list: &dyn List,
        runtime: &'static TypeInfo,
        enclosing: Option<TypeId>,
        sink: &mut dyn EventSink,
    ) -> Result<(), SessionError> {
        let element = match runtime {
            TypeInfo::List(info) => Some(info.item_info()),
            TypeInfo::Array(info) => Some(info.item_info()),
            _ => None,
        };

        if self.config.sort_collections {
            let mut nodes = Vec::with_capacity(list.len());
            for (index, item) in list.iter().enumerate() {
                let mut tree = TreeSink::new();
                self.path.push_index(index);
                self.write(item, element.unwrap_or_else(|| item.reflect_type_info()), enclosing, &mut tree)?;
                self.path.pop();
                nodes.push(tree.finish().unwrap_or_default());
            }
            nodes.sort_by(Node::total_cmp);
            sink.enter_seq(Some(nodes.len()));
            for node in &nodes {
                sink.node(node);
            }
            sink.exit();
            return Ok(());
        }

        sink.enter_seq(Some(list.len()));
        for (index, item) in list.iter().enumerate() {
            self.path.push_index(index);
            self.write(item, element.unwrap_or_else(|| item.reflect_type_info()), enclosing, sink)?;
            self.path.pop();
        }
        sink.exit();
        Ok(())
    }

    fn write_map(
        &mut self,
        map: &dyn Map,
        runtime: &'static TypeInfo,
        enclosing: Option<TypeId>,
        sink: &mut dyn EventSink,
    ) -> Result<(), SessionError> {
        let (key_info, value_info) = match runtime {
            TypeInfo::Map(info) => (Some(info.key_info()), Some(info.value_info())),
            _ => (None, None),
        };

        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map.iter() {
            let key = self.key_string(key, key_info.unwrap_or_else(|| key.reflect_type_info()))?;
            entries.push((key, value));
        }
        if self.config.sort_map_keys {
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        }

        sink.enter_map(Some(entries.len()));
        for (key, value) in entries {
            sink.key(&key);
            self.path.push_key(&key);
            self.write(value, value_info.unwrap_or_else(|| value.reflect_type_info()), enclosing, sink)?;
            self.path.pop();
        }
        sink.exit();
        Ok(())
    }

    /// Renders a map key as a string: scalars and variant names as is,
    /// transformable keys through their reduced form.
    fn key_string(&mut self, key: &dyn Reflect, declared: &'static TypeInfo) -> Result<String, SessionError> {
        let runtime = key.reflect_type_info();
        let transform = self
            .registry
            .transform_for_value(declared, runtime)
            .map_err(|err| self.error(err))?;
        if let Some(transform) = transform {
            let reduced = transform.reduce(key).map_err(|err| self.error(err))?;
            return self.key_string(&*reduced, transform.intermediate());
        }

        match key.reflect_ref() {
            ReflectRef::Scalar(scalar) => Ok(scalar.to_string()),
            ReflectRef::Enum(index) => runtime
                .as_enum()
                .ok()
                .and_then(|info| info.variant_name(index))
                .map(String::from)
                .ok_or_else(|| {
                    self.error(SessionErrorKind::TypeMismatch {
                        expected: format!("a variant of `{}`", runtime.type_path()),
                        found: "enum",
                    })
                }),
            ReflectRef::Pointer(inner) => self.key_string(inner, inner.reflect_type_info()),
            other => {
                log::warn!(
                    "map key of type `{}` at {} is a {}, writing its debug string",
                    runtime.type_path(),
                    self.path,
                    other.kind_name()
                );
                Ok(format!("{key:?}"))
            }
        }
    }

    fn write_record(
        &mut self,
        value: &dyn Reflect,
        layout: &RecordLayout,
        declared: &'static TypeInfo,
        runtime: &'static TypeInfo,
        enclosing: Option<TypeId>,
        sink: &mut dyn EventSink,
    ) -> Result<(), SessionError> {
        sink.enter_map(None);

        if self.config.emit_type_discriminators {
            let mut scopes = vec![declared.type_id()];
            scopes.extend(enclosing);
            let token = self
                .registry
                .dictionaries()
                .discriminator_for(declared, runtime, &scopes, &self.config.default_dictionary_scope)
                .map_err(|err| self.error(err))?;
            if let Some(token) = token {
                sink.key(&self.config.discriminator_property_name);
                sink.scalar(ScalarRef::Str(token));
            }
        }

        let owner = Some(runtime.type_id());
        for property in layout.readable() {
            let Some(property_value) = property.read(value) else {
                continue;
            };
            if self.config.suppress_empty
                && property.inclusion() != Inclusion::Always
                && is_empty(&*property_value)
            {
                continue;
            }
            sink.key(property.wire_name());
            self.path.push_key(property.wire_name());
            self.write(&*property_value, property.type_info(), owner, sink)?;
            self.path.pop();
        }

        sink.exit();
        Ok(())
    }
}

/// Null, or a container without items.
fn is_empty(value: &dyn Reflect) -> bool {
    match value.reflect_ref() {
        ReflectRef::Null => true,
        ReflectRef::List(list) => list.is_empty(),
        ReflectRef::Map(map) => map.is_empty(),
        ReflectRef::Pointer(inner) => is_empty(inner),
        _ => false,
    }
}
