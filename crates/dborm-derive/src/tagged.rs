//! Tagged derive macro implementation

use crate::attrs::{MappedField, mapped_fields, named_fields};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: &DeriveInput) -> Result<TokenStream> {
    let fields = named_fields(input, "Tagged")?;
    let mapped = mapped_fields(&fields)?;
    Ok(impl_tagged(&input.ident, &mapped))
}

pub fn impl_tagged(name: &syn::Ident, fields: &[MappedField<'_>]) -> TokenStream {
    let descriptors = fields.iter().map(|field| {
        let ident = field.ident.to_string();
        let ty = field.ty;
        if field.flatten {
            quote! {
                ::dborm::Field {
                    ident: #ident,
                    tags: &[],
                    shape: ::dborm::Shape::Struct,
                    embedded: ::core::option::Option::Some(<#ty as ::dborm::Tagged>::fields),
                }
            }
        } else {
            let tags = field.tags.iter().map(|(key, column)| quote! { (#key, #column) });
            quote! {
                ::dborm::Field {
                    ident: #ident,
                    tags: &[#(#tags),*],
                    shape: <#ty as ::dborm::Classify>::SHAPE,
                    embedded: ::core::option::Option::None,
                }
            }
        }
    });

    let visits = fields.iter().enumerate().map(|(i, field)| {
        let ident = field.ident;
        if field.flatten {
            quote! {
                visitor.descend();
                ::dborm::Tagged::visit_fields(&self.#ident, tag, visitor)?;
                visitor.ascend();
            }
        } else {
            quote! {
                if let ::core::option::Option::Some(name) = fields[#i].tag(tag) {
                    visitor.visit(name, fields[#i].shape, &self.#ident)?;
                }
            }
        }
    });

    let assigns = fields.iter().enumerate().map(|(i, field)| {
        let ident = field.ident;
        if field.flatten {
            quote! {
                [#i, rest @ ..] => ::dborm::Tagged::assign(&mut self.#ident, rest, value),
            }
        } else {
            quote! {
                [#i] => {
                    self.#ident = ::dborm::FromValue::from_value(value)?;
                    ::core::result::Result::Ok(())
                }
            }
        }
    });

    let fields_binding = if fields.iter().any(|f| !f.flatten) {
        quote! { let fields = <Self as ::dborm::Tagged>::fields(); }
    } else {
        quote! {}
    };

    let type_name = name.to_string();

    quote! {
        impl ::dborm::Tagged for #name {
            fn fields() -> &'static [::dborm::Field] {
                static FIELDS: &[::dborm::Field] = &[#(#descriptors),*];
                FIELDS
            }

            #[allow(unused_variables)]
            fn visit_fields(
                &self,
                tag: &str,
                visitor: &mut dyn ::dborm::FieldVisitor,
            ) -> ::dborm::OrmResult<()> {
                #fields_binding
                #(#visits)*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn assign(
                &mut self,
                path: &[usize],
                value: ::dborm::Value,
            ) -> ::dborm::OrmResult<()> {
                match path {
                    #(#assigns)*
                    _ => ::core::result::Result::Err(::dborm::OrmError::Other(
                        ::std::format!("{} has no field at {:?}", #type_name, path),
                    )),
                }
            }
        }
    }
}
