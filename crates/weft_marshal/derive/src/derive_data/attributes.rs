//! Parsing of `#[weft(...)]` attributes.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr};

use crate::WEFT_ATTRIBUTE_NAME;

/// Sets a flag, rejecting repeats.
fn set_flag(slot: &mut Option<Span>, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate attribute"));
    }
    *slot = Some(meta.path.get_ident().map_or_else(Span::call_site, |ident| ident.span()));
    Ok(())
}

/// Sets a string value, rejecting repeats.
fn set_str(slot: &mut Option<LitStr>, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate attribute"));
    }
    *slot = Some(meta.value()?.parse()?);
    Ok(())
}

fn weft_attributes(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(WEFT_ATTRIBUTE_NAME))
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Attributes placed on the type itself.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    pub type_path: Option<LitStr>,
    pub opaque: Option<Span>,
    pub string_form: Option<Span>,
    pub serde_form: Option<Span>,
    pub no_default: Option<Span>,
    pub sort_properties: Option<Span>,
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in weft_attributes(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("type_path") {
                    set_str(&mut this.type_path, &meta)
                } else if meta.path.is_ident("opaque") {
                    set_flag(&mut this.opaque, &meta)
                } else if meta.path.is_ident("string_form") {
                    set_flag(&mut this.string_form, &meta)
                } else if meta.path.is_ident("serde_form") {
                    set_flag(&mut this.serde_form, &meta)
                } else if meta.path.is_ident("no_default") {
                    set_flag(&mut this.no_default, &meta)
                } else if meta.path.is_ident("sort_properties") {
                    set_flag(&mut this.sort_properties, &meta)
                } else if meta.path.is_ident("auto_register") {
                    set_flag(&mut this.auto_register, &meta)
                } else {
                    Err(meta.error("unsupported type attribute"))
                }
            })?;
        }

        if let (Some(_), Some(span)) = (this.string_form, this.serde_form) {
            return Err(syn::Error::new(
                span,
                "`string_form` and `serde_form` are mutually exclusive",
            ));
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Attributes placed on a named field.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub aliases: Vec<LitStr>,
    pub skip: Option<Span>,
    pub always: Option<Span>,
    pub read_only: Option<Span>,
    pub write_only: Option<Span>,
    pub flatten: Option<Span>,
}

impl FieldAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in weft_attributes(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    set_str(&mut this.rename, &meta)
                } else if meta.path.is_ident("alias") {
                    this.aliases.push(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    set_flag(&mut this.skip, &meta)
                } else if meta.path.is_ident("always") {
                    set_flag(&mut this.always, &meta)
                } else if meta.path.is_ident("read_only") {
                    set_flag(&mut this.read_only, &meta)
                } else if meta.path.is_ident("write_only") {
                    set_flag(&mut this.write_only, &meta)
                } else if meta.path.is_ident("flatten") {
                    set_flag(&mut this.flatten, &meta)
                } else {
                    Err(meta.error("unsupported field attribute"))
                }
            })?;
        }

        if let (Some(_), Some(span)) = (this.read_only, this.write_only) {
            return Err(syn::Error::new(
                span,
                "`read_only` and `write_only` are mutually exclusive",
            ));
        }
        if let (Some(span), true) = (this.flatten, this.rename.is_some() || !this.aliases.is_empty()) {
            return Err(syn::Error::new(span, "a flattened field has no wire name"));
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// VariantAttributes

/// Attributes placed on an enum variant.
#[derive(Default, Debug)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in weft_attributes(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    set_str(&mut this.rename, &meta)
                } else {
                    Err(meta.error("unsupported variant attribute"))
                }
            })?;
        }
        Ok(this)
    }
}
