use proc_macro2::TokenStream;
use quote::quote;

use super::{get_auto_register_impl, impl_trait_reflect, impl_trait_typed};
use crate::derive_data::ReflectEnum;

/// Implement full reflect for a unit-only enum.
///
/// Variants are identified by their declaration index.
pub(crate) fn impl_enum(info: &ReflectEnum) -> TokenStream {
    let meta = &info.meta;
    let weft_path = meta.weft_path();
    let info_ = crate::path::info_(weft_path);
    let type_info_ = crate::path::type_info_(weft_path);
    let reflect_ = crate::path::reflect_(weft_path);
    let reflect_ref_ = crate::path::reflect_ref_(weft_path);
    let box_ = crate::path::box_();
    let option_ = crate::path::option_();

    let names = info.variants.iter().map(|variant| &variant.name);
    let idents: Vec<_> = info.variants.iter().map(|variant| variant.ident).collect();
    let indices: Vec<_> = (0..idents.len()).collect();
    let type_path = meta.type_path_tokens("with_type_path");

    // An enum with a declared form is marshalled only through it.
    let (type_info_tokens, reflect_ref_tokens) = match implicit_form_tokens(meta) {
        Some(form) => (
            quote! {
                #type_info_::Opaque(
                    #info_::OpaqueInfo::new::<Self>()
                        #type_path
                        .with_implicit_form(#form)
                )
            },
            quote!(#reflect_ref_::Opaque),
        ),
        None => (
            quote! {
                #type_info_::Enum(
                    #info_::EnumInfo::new::<Self>(
                        &[#(#names),*],
                        |index| match index {
                            #(#indices => #option_::Some(#box_::new(Self::#idents) as #box_<dyn #reflect_>),)*
                            _ => #option_::None,
                        },
                    )
                    #type_path
                )
            },
            quote! {
                #reflect_ref_::Enum(match self {
                    #(Self::#idents => #indices,)*
                })
            },
        ),
    };

    let typed_trait_tokens = impl_trait_typed(meta, type_info_tokens);
    let reflect_trait_tokens = impl_trait_reflect(meta, reflect_ref_tokens);
    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        #typed_trait_tokens

        #reflect_trait_tokens

        #auto_register_tokens
    }
}

/// `ImplicitForm::string::<Self>()` or `ImplicitForm::serde::<Self>()`, if declared.
pub(super) fn implicit_form_tokens(meta: &crate::derive_data::ReflectMeta) -> Option<TokenStream> {
    let info_ = crate::path::info_(meta.weft_path());
    if meta.attrs().string_form.is_some() {
        Some(quote!(#info_::ImplicitForm::string::<Self>()))
    } else if meta.attrs().serde_form.is_some() {
        Some(quote!(#info_::ImplicitForm::serde::<Self>()))
    } else {
        None
    }
}
