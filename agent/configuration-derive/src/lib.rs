//! Automatically implement `Configuration` for a resource document.

use proc_macro::{self, TokenStream};

#[macro_use]
extern crate quote;
#[proc_macro_derive(Configuration)]
pub fn derive_configuration(input: TokenStream) -> TokenStream {
    let ast: syn::DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(e) => return e.to_compile_error().into(),
    };
    let ident = ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    quote! {
       impl #impl_generics reconciler_model::Configuration for #ident #ty_generics #where_clause {}
    }
    .into()
}
