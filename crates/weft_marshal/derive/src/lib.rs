//! Derive macro for `weft_marshal`.
//!
//! See [`Reflect`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static WEFT_ATTRIBUTE_NAME: &str = "weft";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Derive Reflect
///
/// Implements `Typed` and `Reflect` for a struct or a unit-only enum.
///
/// - A struct with named fields becomes a record: every field is a property,
///   in declaration order.
/// - A unit struct becomes a record without properties.
/// - A unit-only enum is written by variant name.
/// - `#[weft(opaque)]` hides the internals. Such a type is only marshalled
///   through a transform, usually its `string_form` or `serde_form`.
///
/// Field types must implement `Typed` and `Reflect` themselves. Generic type
/// parameters receive these bounds automatically.
///
/// ## Type attributes
///
/// | attribute | effect |
/// |---|---|
/// | `type_path = "..."` | overrides the printed type path |
/// | `opaque` | classifies the type as opaque |
/// | `string_form` | marshals through `Display` and `FromStr` |
/// | `serde_form` | marshals through `Serialize` and `Deserialize` |
/// | `no_default` | records only: the type has no `Default`, so it cannot be parsed |
/// | `sort_properties` | records only: properties ordered by wire name |
/// | `auto_register` | submits the type to `RegistryBuilder::auto_register` |
///
/// ## Field attributes
///
/// | attribute | effect |
/// |---|---|
/// | `rename = "..."` | wire name of the property |
/// | `alias = "..."` | extra name accepted on parse, repeatable |
/// | `skip` | the field is not a property |
/// | `always` | never suppressed as empty |
/// | `read_only` | written but ignored on parse |
/// | `write_only` | parsed but never written |
/// | `flatten` | the field's own properties are merged into this record |
///
/// Enum variants accept `rename = "..."`.
///
/// ## Example
///
/// ```rust, ignore
/// use weft_marshal::derive::Reflect;
///
/// #[derive(Reflect, Default)]
/// #[weft(auto_register)]
/// struct Animal {
///     name: String,
///     #[weft(rename = "legCount", alias = "legs")]
///     leg_count: u8,
///     #[weft(skip)]
///     cache: Vec<u8>,
/// }
///
/// #[derive(Reflect, Default)]
/// enum Habitat {
///     #[default]
///     Land,
///     #[weft(rename = "sea")]
///     Water,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(weft))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    impls::match_reflect_impls(ast)
}
