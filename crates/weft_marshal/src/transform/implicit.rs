use alloc::sync::Arc;

use serde::Serialize;

use crate::Reflect;
use crate::info::{ImplicitForm, SerdeForm, StringForm, TypeInfo, Typed};
use crate::node::Node;
use crate::serde::NodeSerializer;
use crate::transform::{Transform, TransformError};

/// Wraps the transform a type declares for itself.
pub(crate) fn implicit_transform(info: &'static TypeInfo) -> Option<Arc<dyn Transform>> {
    let transform: Arc<dyn Transform> = match *info.implicit_form()? {
        ImplicitForm::String(form) => Arc::new(StringFormTransform { info, form }),
        ImplicitForm::Serde(form) => Arc::new(SerdeFormTransform { info, form }),
    };
    Some(transform)
}

// -----------------------------------------------------------------------------
// StringFormTransform

/// Marshals a value as its `Display` string.
pub struct StringFormTransform {
    info: &'static TypeInfo,
    form: StringForm,
}

impl Transform for StringFormTransform {
    fn name(&self) -> &str {
        self.info.type_path()
    }

    #[inline]
    fn intermediate(&self) -> &'static TypeInfo {
        String::type_info()
    }

    fn reduce(&self, value: &dyn Reflect) -> Result<Box<dyn Reflect>, TransformError> {
        match self.form.to_string(value) {
            Some(text) => Ok(Box::new(text)),
            None => Err(TransformError::type_mismatch(
                self.name(),
                self.info.type_path(),
                value,
            )),
        }
    }

    fn restore(
        &self,
        intermediate: Box<dyn Reflect>,
        _target: &'static TypeInfo,
    ) -> Result<Box<dyn Reflect>, TransformError> {
        let text = intermediate.take::<String>().map_err(|other| {
            TransformError::type_mismatch(self.name(), String::type_info().type_path(), &*other)
        })?;
        self.form
            .parse(&text)
            .map_err(|message| TransformError::invalid(self.name(), message))
    }
}

// -----------------------------------------------------------------------------
// SerdeFormTransform

/// Marshals a value through its own serde implementation.
///
/// The intermediate is the [`Node`] the value serializes into.
pub struct SerdeFormTransform {
    info: &'static TypeInfo,
    form: SerdeForm,
}

impl Transform for SerdeFormTransform {
    fn name(&self) -> &str {
        self.info.type_path()
    }

    #[inline]
    fn intermediate(&self) -> &'static TypeInfo {
        Node::type_info()
    }

    fn reduce(&self, value: &dyn Reflect) -> Result<Box<dyn Reflect>, TransformError> {
        let Some(serializable) = self.form.serializable(value) else {
            return Err(TransformError::type_mismatch(
                self.name(),
                self.info.type_path(),
                value,
            ));
        };
        serializable
            .serialize(NodeSerializer)
            .map(|node| Box::new(node) as Box<dyn Reflect>)
            .map_err(|err| TransformError::invalid(self.name(), err))
    }

    fn restore(
        &self,
        intermediate: Box<dyn Reflect>,
        _target: &'static TypeInfo,
    ) -> Result<Box<dyn Reflect>, TransformError> {
        let node = intermediate.take::<Node>().map_err(|other| {
            TransformError::type_mismatch(self.name(), Node::type_info().type_path(), &*other)
        })?;
        let mut erased = <dyn erased_serde::Deserializer>::erase(node);
        self.form
            .deserialize(&mut erased)
            .map_err(|err| TransformError::invalid(self.name(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::implicit_transform;
    use crate::info::Typed;
    use crate::node::Node;
    use core::net::{IpAddr, Ipv4Addr};

    #[test]
    fn string_form_round_trip() {
        let info = IpAddr::type_info();
        let transform = implicit_transform(info).unwrap();
        assert!(transform.intermediate().is::<String>());

        let addr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let reduced = transform.reduce(&addr).unwrap();
        assert_eq!(reduced.downcast_ref::<String>().unwrap(), "10.0.0.1");

        let restored = transform.restore(reduced, info).unwrap();
        assert_eq!(restored.take::<IpAddr>().unwrap(), addr);

        let bad = transform.restore(Box::new(String::from("nope")), info);
        assert!(bad.is_err());
    }

    #[test]
    fn types_without_a_form_have_no_transform() {
        assert!(implicit_transform(u8::type_info()).is_none());
        assert!(implicit_transform(Node::type_info()).is_none());
    }
}
