//! Paths into `weft_marshal` used by generated code.
//!
//! Kept in one place so a reorganization of the runtime crate only touches
//! this file.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `weft_marshal` crate.
///
/// 1. For crates that depend on `weft_marshal`, `::weft_marshal` is returned.
/// 2. For crates that depend on `weft`, `::weft::marshal` is returned.
/// 3. For other situations, `::weft_marshal` is returned. `weft_marshal`
///    itself relies on this through `extern crate self as weft_marshal`.
///
/// The lookup reads the caller's manifest, so the path is resolved once per
/// derive and passed around.
pub(crate) fn weft_marshal() -> syn::Path {
    weft_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("weft_marshal"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn reflect_(weft_path: &syn::Path) -> TokenStream {
    quote! { #weft_path::Reflect }
}

#[inline(always)]
pub(crate) fn reflect_ref_(weft_path: &syn::Path) -> TokenStream {
    quote! { #weft_path::ReflectRef }
}

#[inline(always)]
pub(crate) fn info_(weft_path: &syn::Path) -> TokenStream {
    quote! { #weft_path::info }
}

#[inline(always)]
pub(crate) fn typed_(weft_path: &syn::Path) -> TokenStream {
    quote! { #weft_path::info::Typed }
}

#[inline(always)]
pub(crate) fn type_info_(weft_path: &syn::Path) -> TokenStream {
    quote! { #weft_path::info::TypeInfo }
}

#[inline(always)]
pub(crate) fn non_generic_type_info_cell_(weft_path: &syn::Path) -> TokenStream {
    quote! { #weft_path::impls::NonGenericTypeInfoCell }
}

#[inline(always)]
pub(crate) fn generic_type_info_cell_(weft_path: &syn::Path) -> TokenStream {
    quote! { #weft_path::impls::GenericTypeInfoCell }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(weft_path: &syn::Path) -> TokenStream {
    quote! { #weft_path::__macro_exports::auto_register }
}

#[inline(always)]
pub(crate) fn box_() -> TokenStream {
    quote! { ::std::boxed::Box }
}

#[inline(always)]
pub(crate) fn option_() -> TokenStream {
    quote! { ::core::option::Option }
}

#[inline(always)]
pub(crate) fn result_() -> TokenStream {
    quote! { ::core::result::Result }
}
