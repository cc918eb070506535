use proc_macro2::TokenStream;
use quote::quote;

use super::{get_auto_register_impl, impl_trait_reflect, impl_trait_typed};
use crate::derive_data::{RecordField, ReflectMeta, ReflectRecord};

/// Implement full reflect for a struct with named fields, or a unit struct.
pub(crate) fn impl_record(info: &ReflectRecord) -> TokenStream {
    let meta = &info.meta;
    let reflect_ref_ = crate::path::reflect_ref_(meta.weft_path());

    let typed_trait_tokens = impl_trait_typed(meta, record_info_tokens(info));
    let reflect_trait_tokens = impl_trait_reflect(meta, quote!(#reflect_ref_::Record));
    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        #typed_trait_tokens

        #reflect_trait_tokens

        #auto_register_tokens
    }
}

/// Generates the `TypeInfo::Record(...)` expression.
fn record_info_tokens(info: &ReflectRecord) -> TokenStream {
    let meta = &info.meta;
    let attrs = meta.attrs();
    let info_ = crate::path::info_(meta.weft_path());
    let type_info_ = crate::path::type_info_(meta.weft_path());

    let properties = info.fields.iter().map(|field| property_tokens(meta, field));
    let type_path = meta.type_path_tokens("type_path");

    let constructor = if attrs.no_default.is_some() {
        TokenStream::new()
    } else {
        quote!(.default_constructor::<Self>())
    };
    let implicit = if attrs.string_form.is_some() {
        quote!(.string_form::<Self>())
    } else if attrs.serde_form.is_some() {
        quote!(.serde_form::<Self>())
    } else {
        TokenStream::new()
    };
    let sort = if attrs.sort_properties.is_some() {
        quote!(.sort_properties(true))
    } else {
        TokenStream::new()
    };

    quote! {
        #type_info_::Record(
            #info_::RecordInfo::builder::<Self>()
                #(.property(#properties))*
                #type_path
                #constructor
                #implicit
                #sort
                .build()
        )
    }
}

/// Generates one `PropertyInfo::field(...)` expression with its modifiers.
fn property_tokens(meta: &ReflectMeta, field: &RecordField) -> TokenStream {
    let weft_path = meta.weft_path();
    let info_ = crate::path::info_(weft_path);
    let reflect_ = crate::path::reflect_(weft_path);
    let box_ = crate::path::box_();
    let option_ = crate::path::option_();
    let result_ = crate::path::result_();

    let ident = field.ident;
    let ty = field.ty;
    let name = field.name();
    let attrs = &field.attrs;

    let mut modifiers = TokenStream::new();
    if let Some(rename) = &attrs.rename {
        modifiers.extend(quote!(.renamed(#rename)));
    }
    if !attrs.aliases.is_empty() {
        let aliases = &attrs.aliases;
        modifiers.extend(quote!(.with_aliases(&[#(#aliases),*])));
    }
    if attrs.read_only.is_some() {
        modifiers.extend(quote!(.read_only()));
    }
    if attrs.write_only.is_some() {
        modifiers.extend(quote!(.write_only()));
    }
    if attrs.always.is_some() {
        modifiers.extend(quote!(.with_inclusion(#info_::Inclusion::Always)));
    }
    if !field.is_public {
        modifiers.extend(quote!(.with_visibility(#info_::Visibility::Private)));
    }
    if attrs.flatten.is_some() {
        modifiers.extend(quote!(.flattened()));
    }

    quote! {
        #info_::PropertyInfo::field::<#ty>(
            #name,
            |record| {
                record
                    .downcast_ref::<Self>()
                    .map(|record| &record.#ident as &dyn #reflect_)
            },
            |record| {
                record
                    .downcast_mut::<Self>()
                    .map(|record| &mut record.#ident as &mut dyn #reflect_)
            },
            |record, value| {
                let value = value.take::<#ty>()?;
                match record.downcast_mut::<Self>() {
                    #option_::Some(record) => {
                        record.#ident = value;
                        #result_::Ok(())
                    }
                    #option_::None => #result_::Err(#box_::new(value) as #box_<dyn #reflect_>),
                }
            },
        )
        #modifiers
    }
}
