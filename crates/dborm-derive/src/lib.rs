//! Derive macros for dborm
//!
//! Provides `#[derive(Tagged)]`, `#[derive(Record)]` and `#[derive(Document)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod document;
mod record;
mod tagged;

/// Derive `Tagged` field access for a struct embedded in records.
///
/// # Example
///
/// ```ignore
/// use dborm::Tagged;
///
/// #[derive(Default, Tagged)]
/// struct Audit {
///     #[db("created_at")]
///     created_at: chrono::NaiveDateTime,
///     #[db]
///     updated_by: String,
/// }
/// ```
///
/// # Attributes
///
/// - `#[db("name")]` / `#[db(column = "name")]` - Bind the field to a column
/// - `#[db]` - Bind the field to a column named after it
/// - `#[db(flatten)]` - Expand an embedded `Tagged` struct in place
/// - `#[tag(key = "name")]` - Declare the field under another tag key
///
/// Fields without any of these are not mapped.
#[proc_macro_derive(Tagged, attributes(db, tag))]
pub fn derive_tagged(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    tagged::expand(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `Record` (and `Tagged`) for a table row.
///
/// # Example
///
/// ```ignore
/// use dborm::Record;
///
/// #[derive(Debug, Default, Record)]
/// #[db(table = "users")]
/// struct User {
///     #[db("id")]
///     id: i64,
///     #[db("name")]
///     name: String,
///     #[db(flatten)]
///     audit: Audit,
/// }
/// ```
///
/// # Generated
///
/// - `impl Tagged` (see `#[derive(Tagged)]`)
/// - `impl Record` with `table_name()` from `#[db(table = "...")]`
/// - `impl Destination`, so the record itself can receive the first row
///
/// Do not combine with `#[derive(Tagged)]` on the same type.
#[proc_macro_derive(Record, attributes(db, tag))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive document conversions for a struct stored in a single serialized
/// column. The type must implement `serde::Serialize` and
/// `serde::Deserialize`.
#[proc_macro_derive(Document)]
pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    document::expand(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
