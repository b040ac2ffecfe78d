//! Document derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: &DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Document cannot be derived for generic types",
        ));
    }

    Ok(quote! {
        impl ::dborm::Classify for #name {
            const SHAPE: ::dborm::Shape = ::dborm::Shape::Struct;
        }

        impl ::dborm::ToValue for #name {
            fn to_value(&self) -> ::dborm::OrmResult<::dborm::Value> {
                ::dborm::value::document_to_value(self)
            }
        }

        impl ::dborm::FromValue for #name {
            fn from_value(value: ::dborm::Value) -> ::dborm::OrmResult<Self> {
                ::dborm::value::document_from_value(value)
            }
        }
    })
}
