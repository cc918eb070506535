use proc_macro2::TokenStream;
use quote::quote;

use super::enum_kind::implicit_form_tokens;
use super::{get_auto_register_impl, impl_trait_reflect, impl_trait_typed};
use crate::derive_data::ReflectMeta;

/// Implement full reflect for a type marked `#[weft(opaque)]`.
pub(crate) fn impl_opaque(meta: &ReflectMeta) -> TokenStream {
    let weft_path = meta.weft_path();
    let info_ = crate::path::info_(weft_path);
    let type_info_ = crate::path::type_info_(weft_path);
    let reflect_ref_ = crate::path::reflect_ref_(weft_path);

    let type_path = meta.type_path_tokens("with_type_path");
    let implicit = implicit_form_tokens(meta).map(|form| quote!(.with_implicit_form(#form)));

    let type_info_tokens = quote! {
        #type_info_::Opaque(
            #info_::OpaqueInfo::new::<Self>()
                #type_path
                #implicit
        )
    };

    let typed_trait_tokens = impl_trait_typed(meta, type_info_tokens);
    let reflect_trait_tokens = impl_trait_reflect(meta, quote!(#reflect_ref_::Opaque));
    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        #typed_trait_tokens

        #reflect_trait_tokens

        #auto_register_tokens
    }
}
