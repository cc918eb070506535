use alloc::collections::BTreeMap;
use core::any::TypeId;

use crate::classify::Classification;
use crate::info::{TypeInfo, Typed};
use crate::introspect::RecordLayout;
use crate::node::{Node, NodeMap, Number};
use crate::registry::Registry;
use crate::session::{ParseConfig, SessionError, SessionErrorKind, TraversalPath};
use crate::{Reflect, ReflectMut, ScalarRef};

/// Builds one value out of a [`Node`] tree.
pub(crate) struct ParseSession<'a> {
    registry: &'a Registry,
    config: &'a ParseConfig,
    path: TraversalPath,
    depth: usize,
    types: Vec<&'static str>,
}

impl<'a> ParseSession<'a> {
    pub(crate) fn new(registry: &'a Registry, config: &'a ParseConfig) -> Self {
        Self {
            registry,
            config,
            path: TraversalPath::root(),
            depth: 0,
            types: Vec::new(),
        }
    }

    fn error(&self, kind: impl Into<SessionErrorKind>) -> SessionError {
        SessionError::new(kind.into(), &self.path).with_type_stack(&self.types)
    }

    fn mismatch(&self, target: &'static TypeInfo, node: &Node) -> SessionError {
        self.error(SessionErrorKind::TypeMismatch {
            expected: format!("`{}`", target.type_path()),
            found: node.kind_name(),
        })
    }

    fn rejected(&self, expected: &'static TypeInfo, value: &dyn Reflect) -> SessionError {
        self.error(SessionErrorKind::TypeMismatch {
            expected: format!("`{}`", expected.type_path()),
            found: value.reflect_type_info().type_path(),
        })
    }

    fn not_a_container(&self, target: &'static TypeInfo, expected: &str) -> SessionError {
        self.error(SessionErrorKind::TypeMismatch {
            expected: format!("a {expected}"),
            found: target.type_path(),
        })
    }

    /// Parses `node` as a value of `target`.
    ///
    /// `enclosing` is the record owning the property being parsed, if any.
    pub(crate) fn read(
        &mut self,
        node: &Node,
        target: &'static TypeInfo,
        enclosing: Option<TypeId>,
    ) -> Result<Box<dyn Reflect>, SessionError> {
        self.types.push(target.type_path());
        let result = self.read_inner(node, target, enclosing);
        self.types.pop();
        result
    }

    fn read_inner(
        &mut self,
        node: &Node,
        target: &'static TypeInfo,
        enclosing: Option<TypeId>,
    ) -> Result<Box<dyn Reflect>, SessionError> {
        let descriptor = self.registry.classify(target).map_err(|err| self.error(err))?;

        match descriptor.classification() {
            Classification::Transformable(transform) => {
                let intermediate = self.read(node, transform.intermediate(), enclosing)?;
                transform
                    .restore(intermediate, target)
                    .map_err(|err| self.error(err))
            }
            Classification::Optional(inner) => {
                let inner = *inner;
                let TypeInfo::Optional(info) = target else {
                    return Err(self.mismatch(target, node));
                };
                if node.is_null() {
                    return Ok(info.none());
                }
                let value = self.read(node, inner, enclosing)?;
                info.wrap(value).map_err(|value| self.rejected(inner, &*value))
            }
            Classification::Pointer(inner) => {
                let inner = *inner;
                let TypeInfo::Pointer(info) = target else {
                    return Err(self.mismatch(target, node));
                };
                let value = self.read(node, inner, enclosing)?;
                info.wrap(value).map_err(|value| self.rejected(inner, &*value))
            }
            Classification::Dynamic => match target {
                TypeInfo::Dynamic(info) => Ok(info.from_node(node)),
                _ => Err(self.mismatch(target, node)),
            },
            Classification::Abstract => self.read_abstract(node, target, enclosing),
            _ if node.is_null() => Err(self.mismatch(target, node)),
            Classification::Scalar(_) => {
                let (Ok(info), Some(scalar)) = (target.as_scalar(), node.as_scalar()) else {
                    return Err(self.mismatch(target, node));
                };
                let scalar = match scalar {
                    ScalarRef::Str(text) if self.config.trim_strings => ScalarRef::Str(text.trim()),
                    other => other,
                };
                info.from_scalar(scalar)
                    .ok_or_else(|| self.mismatch(target, node))
            }
            Classification::Enum => {
                let (Ok(info), Some(name)) = (target.as_enum(), node.as_str()) else {
                    return Err(self.mismatch(target, node));
                };
                let name = if self.config.trim_strings { name.trim() } else { name };
                info.index_of(name)
                    .and_then(|index| info.from_index(index))
                    .ok_or_else(|| {
                        self.error(SessionErrorKind::TypeMismatch {
                            expected: format!("one of {:?}", info.variants()),
                            found: "string",
                        })
                    })
            }
            Classification::List(shape) => {
                let Some(items) = node.as_seq() else {
                    return Err(self.mismatch(target, node));
                };
                let element = shape.element();
                self.nested(|this| this.read_list(items, target, element, enclosing))
            }
            Classification::Array { shape, len } => {
                let Some(items) = node.as_seq() else {
                    return Err(self.mismatch(target, node));
                };
                if items.len() != *len {
                    return Err(self.error(SessionErrorKind::LengthMismatch {
                        expected: *len,
                        found: items.len(),
                    }));
                }
                let element = shape.element();
                self.nested(|this| {
                    let values = this.read_items(items, element, enclosing)?;
                    match target.as_array() {
                        Ok(info) => info
                            .from_items(values)
                            .ok_or_else(|| this.mismatch(target, node)),
                        Err(_) => Err(this.mismatch(target, node)),
                    }
                })
            }
            Classification::Map { key, value } => {
                let Some(entries) = node.as_map() else {
                    return Err(self.mismatch(target, node));
                };
                let (key, value) = (*key, *value);
                self.nested(|this| this.read_map(entries, target, key, value, enclosing))
            }
            Classification::Record(layout) => {
                let Some(entries) = node.as_map() else {
                    return Err(self.mismatch(target, node));
                };
                self.nested(|this| this.read_record(entries, target, layout, enclosing))
            }
            Classification::Opaque => Err(self.error(SessionErrorKind::UnsupportedRestore {
                ty: target.type_path(),
            })),
        }
    }

    /// Runs `f` one container deeper.
    fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R, SessionError>) -> Result<R, SessionError> {
        if self.depth >= self.config.max_depth {
            return Err(self.error(SessionErrorKind::DepthExceeded {
                max_depth: self.config.max_depth,
            }));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn read_items(
        &mut self,
        items: &[Node],
        element: &'static TypeInfo,
        enclosing: Option<TypeId>,
    ) -> Result<Vec<Box<dyn Reflect>>, SessionError> {
        let mut values = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            self.path.push_index(index);
            values.push(self.read(item, element, enclosing)?);
            self.path.pop();
        }
        Ok(values)
    }

    fn read_list(
        &mut self,
        items: &[Node],
        target: &'static TypeInfo,
        element: &'static TypeInfo,
        enclosing: Option<TypeId>,
    ) -> Result<Box<dyn Reflect>, SessionError> {
        let Some(constructor) = target.constructor() else {
            return Err(self.error(SessionErrorKind::NoConstructor {
                ty: target.type_path(),
            }));
        };
        let values = self.read_items(items, element, enclosing)?;
        let mut container = constructor();
        let ReflectMut::List(list) = (*container).reflect_mut() else {
            return Err(self.not_a_container(target, "list"));
        };
        for value in values {
            list.push(value).map_err(|value| self.rejected(element, &*value))?;
        }
        Ok(container)
    }

    fn read_map(
        &mut self,
        entries: &NodeMap,
        target: &'static TypeInfo,
        key_info: &'static TypeInfo,
        value_info: &'static TypeInfo,
        enclosing: Option<TypeId>,
    ) -> Result<Box<dyn Reflect>, SessionError> {
        let Some(constructor) = target.constructor() else {
            return Err(self.error(SessionErrorKind::NoConstructor {
                ty: target.type_path(),
            }));
        };
        let mut pairs = Vec::with_capacity(entries.len());
        for (key, value) in entries.iter() {
            self.path.push_key(key);
            let key = self.read(&Node::String(key.clone()), key_info, enclosing)?;
            let value = self.read(value, value_info, enclosing)?;
            self.path.pop();
            pairs.push((key, value));
        }

        let mut container = constructor();
        let ReflectMut::Map(map) = (*container).reflect_mut() else {
            return Err(self.not_a_container(target, "map"));
        };
        for (key, value) in pairs {
            map.insert(key, value)
                .map_err(|(key, _)| self.rejected(key_info, &*key))?;
        }
        Ok(container)
    }

    fn read_record(
        &mut self,
        entries: &NodeMap,
        target: &'static TypeInfo,
        layout: &RecordLayout,
        enclosing: Option<TypeId>,
    ) -> Result<Box<dyn Reflect>, SessionError> {
        let Some(constructor) = target.constructor() else {
            return Err(self.error(SessionErrorKind::NoConstructor {
                ty: target.type_path(),
            }));
        };
        let mut record = constructor();
        let owner = Some(target.type_id());

        for (name, child) in entries.iter() {
            if *name == self.config.discriminator_property_name {
                let Some(token) = child.as_str() else {
                    return Err(self.mismatch(String::type_info(), child));
                };
                self.check_discriminator(token, target, enclosing)?;
                continue;
            }
            let Some(property) = layout.property(name).filter(|p| p.is_writable()) else {
                if self.config.strict_unknown_properties {
                    self.path.push_key(name);
                    return Err(self.error(SessionErrorKind::UnknownProperty {
                        record: target.type_path(),
                        name: name.clone(),
                    }));
                }
                log::debug!(
                    "ignoring `{name}` at {}: `{}` has no writable property of that name",
                    self.path,
                    target.type_path()
                );
                continue;
            };
            if child.is_null() && self.config.trim_nulls {
                continue;
            }

            self.path.push_key(name);
            let value = self.read(child, property.type_info(), owner)?;
            property
                .write(&mut *record, value)
                .map_err(|value| self.rejected(property.type_info(), &*value))?;
            self.path.pop();
        }
        Ok(record)
    }

    /// A discriminator on a concrete record must name that record.
    fn check_discriminator(
        &self,
        token: &str,
        target: &'static TypeInfo,
        enclosing: Option<TypeId>,
    ) -> Result<(), SessionError> {
        let dictionaries = self.registry.dictionaries();
        let mut scopes = vec![target.type_id()];
        if let Some(bases) = dictionaries.abstractions().get(&target.type_id()) {
            scopes.extend(bases.iter().map(|base| base.type_id()));
        }
        scopes.extend(enclosing);

        let entry = dictionaries
            .resolve(token, &scopes, &self.config.default_dictionary_scope)
            .map_err(|err| self.error(err))?;
        match entry {
            Some(entry) if entry.info().type_id() == target.type_id() => Ok(()),
            Some(entry) => Err(self.error(SessionErrorKind::TypeMismatch {
                expected: format!("`{}`", target.type_path()),
                found: entry.info().type_path(),
            })),
            None if dictionaries
                .dictionaries()
                .iter()
                .any(|dictionary| dictionary.token_of(target.type_id()) == Some(token)) =>
            {
                Ok(())
            }
            None => Err(self.error(SessionErrorKind::UnknownDiscriminator {
                token: token.into(),
                declared: target.type_path(),
            })),
        }
    }

    fn read_abstract(
        &mut self,
        node: &Node,
        target: &'static TypeInfo,
        enclosing: Option<TypeId>,
    ) -> Result<Box<dyn Reflect>, SessionError> {
        let dictionaries = self.registry.dictionaries();
        let upcast_any = target.as_abstract().ok().and_then(|info| info.upcast_any());

        if node.is_null() {
            return match upcast_any {
                Some(upcast) => Ok(upcast(Box::new(Node::Null))),
                None => Err(self.mismatch(target, node)),
            };
        }

        let token = node
            .as_map()
            .and_then(|map| map.get(&self.config.discriminator_property_name))
            .and_then(Node::as_str);
        if let Some(token) = token {
            let mut scopes = vec![target.type_id()];
            scopes.extend(enclosing);
            let entry = dictionaries
                .resolve(token, &scopes, &self.config.default_dictionary_scope)
                .map_err(|err| self.error(err))?;
            let Some(entry) = entry else {
                return Err(self.error(SessionErrorKind::UnknownDiscriminator {
                    token: token.into(),
                    declared: target.type_path(),
                }));
            };
            let value = self.read(node, entry.info(), enclosing)?;
            return dictionaries
                .upcast(target, value)
                .map_err(|value| self.rejected(target, &*value));
        }

        if let Some(implementation) = dictionaries.implementation(target.type_id()) {
            let value = self.read(node, implementation.info(), enclosing)?;
            return implementation
                .upcast(value)
                .map_err(|value| self.rejected(target, &*value));
        }

        match upcast_any {
            Some(upcast) => Ok(upcast(self.read_natural(node, enclosing)?)),
            None => {
                log::debug!(
                    "no discriminator for `{}` at {}",
                    target.type_path(),
                    self.path
                );
                Err(self.error(SessionErrorKind::MissingDiscriminator {
                    declared: target.type_path(),
                }))
            }
        }
    }

    /// The value a node stands for when nothing declares its type.
    fn read_natural(&mut self, node: &Node, enclosing: Option<TypeId>) -> Result<Box<dyn Reflect>, SessionError> {
        let any = <Box<dyn Reflect>>::type_info();
        let value: Box<dyn Reflect> = match node {
            Node::Null => Box::new(Node::Null),
            Node::Bool(value) => Box::new(*value),
            Node::Number(Number::PosInt(value)) => match i64::try_from(*value) {
                Ok(value) => Box::new(value) as Box<dyn Reflect>,
                Err(_) => Box::new(*value),
            },
            Node::Number(Number::NegInt(value)) => Box::new(*value),
            Node::Number(Number::Float(value)) => Box::new(*value),
            Node::String(value) => {
                let value = if self.config.trim_strings { value.trim() } else { value };
                Box::new(String::from(value))
            }
            Node::Seq(items) => self.nested(|this| {
                let mut list = Vec::<Box<dyn Reflect>>::with_capacity(items.len());
                for value in this.read_items(items, any, enclosing)? {
                    list.push(value.take::<Box<dyn Reflect>>().map_err(|value| this.rejected(any, &*value))?);
                }
                Ok(Box::new(list) as Box<dyn Reflect>)
            })?,
            Node::Map(entries) => self.nested(|this| {
                let mut map = BTreeMap::<String, Box<dyn Reflect>>::new();
                for (key, value) in entries.iter() {
                    this.path.push_key(key);
                    let value = this.read(value, any, enclosing)?;
                    let value = value.take::<Box<dyn Reflect>>().map_err(|value| this.rejected(any, &*value))?;
                    this.path.pop();
                    map.insert(key.clone(), value);
                }
                Ok(Box::new(map) as Box<dyn Reflect>)
            })?,
        };
        Ok(value)
    }
}
