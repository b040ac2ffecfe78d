//! Record derive macro implementation

use crate::attrs::{mapped_fields, named_fields, table_name};
use crate::tagged::impl_tagged;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: &DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let table = table_name(input)?;
    let fields = named_fields(input, "Record")?;
    let mapped = mapped_fields(&fields)?;

    let tagged = impl_tagged(name, &mapped);

    Ok(quote! {
        #tagged

        impl ::dborm::Record for #name {
            fn table_name() -> &'static str {
                #table
            }
        }

        impl ::dborm::Destination for #name {
            type Record = Self;

            fn from_rows(
                rows: ::dborm::Rows,
                mapper: &::dborm::RowMapper<'_>,
            ) -> ::dborm::OrmResult<Self> {
                mapper.scan_one(rows)
            }

            fn empty() -> Self {
                <Self as ::core::default::Default>::default()
            }
        }
    })
}
