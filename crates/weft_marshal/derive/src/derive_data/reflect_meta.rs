use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Generics, Ident, ImplGenerics, Path, TypeGenerics};

use super::TypeAttributes;

/// What every derive needs: the runtime crate path, the type attributes and
/// the type's name and generics.
pub(crate) struct ReflectMeta<'a> {
    weft_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
}

impl core::fmt::Debug for ReflectMeta<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReflectMeta")
            .field("weft_path", &self.weft_path.to_token_stream())
            .field("ident", &self.ident)
            .field("attrs", &self.attrs)
            .finish()
    }
}

impl<'a> ReflectMeta<'a> {
    pub(crate) fn new(attrs: TypeAttributes, ident: &'a Ident, generics: &'a Generics) -> syn::Result<Self> {
        if let Some(lifetime) = generics.lifetimes().next() {
            return Err(syn::Error::new_spanned(
                lifetime,
                "reflected types must be `'static`, lifetime parameters are not supported",
            ));
        }
        Ok(Self {
            weft_path: crate::path::weft_marshal(),
            attrs,
            ident,
            generics,
        })
    }

    #[inline]
    pub(crate) fn weft_path(&self) -> &Path {
        &self.weft_path
    }

    #[inline]
    pub(crate) fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub(crate) fn real_ident(&self) -> &Ident {
        self.ident
    }

    /// Returns `true` if the type has type or const parameters.
    ///
    /// Such types store their info in a `GenericTypeInfoCell` and cannot be
    /// auto-registered.
    #[inline]
    pub(crate) fn impl_with_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    /// Splits the generics for an `impl` block.
    ///
    /// Every type parameter is bounded by `Reflect + Typed`.
    pub(crate) fn split_generics(&self) -> (ImplGenerics<'_>, TypeGenerics<'_>, TokenStream) {
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();
        let reflect_ = crate::path::reflect_(&self.weft_path);
        let typed_ = crate::path::typed_(&self.weft_path);

        let existing: Vec<_> = where_clause
            .map(|clause| clause.predicates.iter().collect())
            .unwrap_or_default();
        let params: Vec<_> = self.generics.type_params().map(|param| &param.ident).collect();

        let where_tokens = if existing.is_empty() && params.is_empty() {
            TokenStream::new()
        } else {
            quote! {
                where #(#existing,)* #(#params: #reflect_ + #typed_,)*
            }
        };

        (impl_generics, ty_generics, where_tokens)
    }

    /// Generates `.with_type_path("...")` or `.type_path("...")` when a type
    /// path override is present.
    pub(crate) fn type_path_tokens(&self, method: &str) -> TokenStream {
        match &self.attrs.type_path {
            Some(path) => {
                let method = Ident::new(method, path.span());
                quote! { .#method(#path) }
            }
            None => TokenStream::new(),
        }
    }
}
