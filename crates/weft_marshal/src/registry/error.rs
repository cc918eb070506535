use thiserror::Error;

/// A registry that cannot be built as configured.
///
/// Returned by [`RegistryBuilder::build`] and by classification of types
/// first reached after the build.
///
/// [`RegistryBuilder::build`]: crate::RegistryBuilder::build
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    #[error("transforms `{first}` and `{second}` both apply to `{ty}` with priority {priority}")]
    AmbiguousTransform {
        ty: &'static str,
        first: String,
        second: String,
        priority: i32,
    },
    #[error("discriminator `{token}` appears twice in dictionary `{dictionary}`")]
    DuplicateDiscriminator { dictionary: String, token: String },
    #[error("`{ty}` is registered for `{base}` as both `{first}` and `{second}`")]
    AmbiguousDictionaryType {
        base: &'static str,
        ty: &'static str,
        first: String,
        second: String,
    },
    #[error("dictionary `{name}` is defined twice")]
    DuplicateDictionary { name: String },
    #[error("unknown dictionary `{name}`")]
    UnknownDictionary { name: String },
    #[error("property name `{name}` is used twice in `{record}`")]
    DuplicateProperty { record: &'static str, name: String },
    #[error("`{record}` has no property `{property}`")]
    UnknownProperty { record: &'static str, property: String },
    #[error("property `{property}` of `{record}` is declared with two different types")]
    PropertyTypeConflict { record: &'static str, property: String },
    #[error("transform intermediates form a cycle: {path}")]
    TransformCycle { path: String },
    #[error("property `{property}` of `{record}` cannot be flattened: it is not a stored record field")]
    InvalidFlatten { record: &'static str, property: String },
}
