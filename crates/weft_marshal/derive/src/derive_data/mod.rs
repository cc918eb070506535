//! Provide some tools for parsing token stream.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod reflect_meta;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes, VariantAttributes};
pub(crate) use reflect_meta::ReflectMeta;

use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, Type};

// -----------------------------------------------------------------------------
// ReflectDerive

/// The parsed input of `#[derive(Reflect)]`.
pub(crate) enum ReflectDerive<'a> {
    Record(ReflectRecord<'a>),
    Enum(ReflectEnum<'a>),
    Opaque(ReflectMeta<'a>),
}

impl<'a> ReflectDerive<'a> {
    pub(crate) fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let opaque = attrs.opaque.is_some();
        let meta = ReflectMeta::new(attrs, &input.ident, &input.generics)?;

        if opaque {
            return Ok(Self::Opaque(meta));
        }

        match &input.data {
            Data::Struct(data) => {
                let fields = match &data.fields {
                    Fields::Named(named) => named
                        .named
                        .iter()
                        .map(RecordField::new)
                        .collect::<syn::Result<Vec<_>>>()?,
                    Fields::Unit => Vec::new(),
                    Fields::Unnamed(unnamed) => {
                        return Err(syn::Error::new(
                            unnamed.span(),
                            "tuple structs have no property names, mark them `#[weft(opaque)]`",
                        ));
                    }
                };
                let fields = fields.into_iter().flatten().collect();
                Ok(Self::Record(ReflectRecord { meta, fields }))
            }
            Data::Enum(data) => {
                if data.variants.is_empty() {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "enums without variants cannot be reflected",
                    ));
                }
                let variants = data
                    .variants
                    .iter()
                    .map(|variant| {
                        if !matches!(variant.fields, Fields::Unit) {
                            return Err(syn::Error::new(
                                variant.fields.span(),
                                "only unit variants are supported, mark the enum `#[weft(opaque)]`",
                            ));
                        }
                        let attrs = VariantAttributes::parse_attrs(&variant.attrs)?;
                        let name = attrs
                            .rename
                            .map_or_else(|| variant.ident.to_string(), |lit| lit.value());
                        Ok(EnumVariant {
                            ident: &variant.ident,
                            name,
                        })
                    })
                    .collect::<syn::Result<Vec<_>>>()?;
                Ok(Self::Enum(ReflectEnum { meta, variants }))
            }
            Data::Union(data) => Err(syn::Error::new(
                data.union_token.span(),
                "unions cannot be reflected",
            )),
        }
    }
}

// -----------------------------------------------------------------------------
// Records

pub(crate) struct ReflectRecord<'a> {
    pub meta: ReflectMeta<'a>,
    pub fields: Vec<RecordField<'a>>,
}

/// A named field that is a property.
pub(crate) struct RecordField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
    pub is_public: bool,
}

impl<'a> RecordField<'a> {
    /// Returns `None` for skipped fields.
    fn new(field: &'a syn::Field) -> syn::Result<Option<Self>> {
        let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
        if attrs.skip.is_some() {
            return Ok(None);
        }
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new(field.span(), "expected a named field"));
        };
        Ok(Some(Self {
            ident,
            ty: &field.ty,
            attrs,
            is_public: matches!(field.vis, syn::Visibility::Public(_)),
        }))
    }

    /// The logical property name, the field name without a raw prefix.
    pub(crate) fn name(&self) -> String {
        let name = self.ident.to_string();
        match name.strip_prefix("r#") {
            Some(stripped) => stripped.to_owned(),
            None => name,
        }
    }
}

// -----------------------------------------------------------------------------
// Enums

pub(crate) struct ReflectEnum<'a> {
    pub meta: ReflectMeta<'a>,
    pub variants: Vec<EnumVariant<'a>>,
}

pub(crate) struct EnumVariant<'a> {
    pub ident: &'a Ident,
    pub name: String,
}
