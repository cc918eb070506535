// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod enum_kind;
mod opaque_kind;
mod record_kind;
mod trait_reflect;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use auto_register::get_auto_register_impl;
use enum_kind::impl_enum;
use opaque_kind::impl_opaque;
use record_kind::impl_record;
use trait_reflect::impl_trait_reflect;
use trait_typed::impl_trait_typed;

use proc_macro::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::derive_data::ReflectDerive;

/// Provided for `#[derive(Reflect)]`.
pub(crate) fn match_reflect_impls(ast: DeriveInput) -> TokenStream {
    // Parse type kind, attributes and fields.
    let reflect_derive = match ReflectDerive::from_input(&ast) {
        Ok(val) => val,
        Err(err) => return err.into_compile_error().into(),
    };

    let reflect_impls = match reflect_derive {
        ReflectDerive::Record(info) => impl_record(&info),
        ReflectDerive::Enum(info) => impl_enum(&info),
        ReflectDerive::Opaque(meta) => impl_opaque(&meta),
    };

    TokenStream::from(quote! {
        const _: () = {
            #reflect_impls
        };
    })
}
