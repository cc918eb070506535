use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Generate implementation code for `Reflect`.
///
/// `reflect_ref_tokens` is the body of `reflect_ref`, with `self` in scope.
pub(crate) fn impl_trait_reflect(meta: &ReflectMeta, reflect_ref_tokens: TokenStream) -> TokenStream {
    let weft_path = meta.weft_path();
    let reflect_ = crate::path::reflect_(weft_path);
    let reflect_ref_ = crate::path::reflect_ref_(weft_path);

    let real_ident = meta.real_ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #reflect_ for #real_ident #ty_generics #where_clause {
            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_tokens
            }
        }
    }
}
