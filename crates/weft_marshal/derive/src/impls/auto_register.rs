use crate::derive_data::ReflectMeta;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(meta: &ReflectMeta) -> proc_macro2::TokenStream {
    use quote::quote_spanned;

    let Some(span) = meta.attrs().auto_register else {
        return proc_macro2::TokenStream::new();
    };
    // Invalid for generic types.
    if meta.impl_with_generic() {
        return syn::Error::new(span, "generic types cannot be auto-registered").into_compile_error();
    }

    let weft_path = meta.weft_path();
    let auto_register_ = crate::path::auto_register_(weft_path);
    let typed_ = crate::path::typed_(weft_path);
    let real_ident = meta.real_ident();

    quote_spanned! { span =>
        #auto_register_::inventory::submit! {
            #auto_register_::AutoRegistration(<#real_ident as #typed_>::type_info)
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &ReflectMeta) -> proc_macro2::TokenStream {
    proc_macro2::TokenStream::new()
}
