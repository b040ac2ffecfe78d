//! `#[db(...)]` and `#[tag(...)]` attribute parsing.

use syn::{Attribute, Data, DeriveInput, Fields, LitStr, Meta, Result};

/// Default tag key, matching `dborm::DEFAULT_TAG`.
pub const DB_TAG: &str = "db";

/// A mapped field of the deriving struct.
pub struct MappedField<'a> {
    pub ident: &'a syn::Ident,
    pub ty: &'a syn::Type,
    /// `(tag key, column)` pairs; empty for flattened fields.
    pub tags: Vec<(String, String)>,
    pub flatten: bool,
}

/// Named fields of a non-generic struct.
pub fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> Result<Vec<&'a syn::Field>> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            format!("{derive} cannot be derived for generic types"),
        ));
    }

    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields.named.iter().collect()),
            Fields::Unit => Ok(Vec::new()),
            Fields::Unnamed(_) => Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        )),
    }
}

/// Fields carrying a column binding or `flatten`, in declaration order.
pub fn mapped_fields<'a>(fields: &[&'a syn::Field]) -> Result<Vec<MappedField<'a>>> {
    let mut mapped = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let mut tags: Vec<(String, String)> = Vec::new();
        let mut flatten = false;

        for attr in &field.attrs {
            if attr.path().is_ident(DB_TAG) {
                parse_db_field(attr, ident, &mut tags, &mut flatten)?;
            } else if attr.path().is_ident("tag") {
                attr.parse_nested_meta(|meta| {
                    let key = meta
                        .path
                        .get_ident()
                        .map(ToString::to_string)
                        .ok_or_else(|| meta.error("expected a tag key"))?;
                    let column: LitStr = meta.value()?.parse()?;
                    set_tag(&mut tags, key, &column)
                })?;
            }
        }

        if flatten && !tags.is_empty() {
            return Err(syn::Error::new_spanned(
                field,
                "a flattened field cannot declare a column",
            ));
        }
        if flatten || !tags.is_empty() {
            mapped.push(MappedField {
                ident,
                ty: &field.ty,
                tags,
                flatten,
            });
        }
    }
    Ok(mapped)
}

fn parse_db_field(
    attr: &Attribute,
    ident: &syn::Ident,
    tags: &mut Vec<(String, String)>,
    flatten: &mut bool,
) -> Result<()> {
    match &attr.meta {
        Meta::Path(_) => {
            let column = LitStr::new(&unraw(ident), ident.span());
            set_tag(tags, DB_TAG.to_string(), &column)
        }
        Meta::List(list) => {
            if let Ok(column) = syn::parse2::<LitStr>(list.tokens.clone()) {
                return set_tag(tags, DB_TAG.to_string(), &column);
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("column") {
                    let column: LitStr = meta.value()?.parse()?;
                    set_tag(tags, DB_TAG.to_string(), &column)
                } else if meta.path.is_ident("flatten") {
                    *flatten = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported db attribute"))
                }
            })
        }
        Meta::NameValue(nv) => Err(syn::Error::new_spanned(
            nv,
            "use #[db(\"column\")] or #[db(column = \"column\")]",
        )),
    }
}

fn set_tag(tags: &mut Vec<(String, String)>, key: String, column: &LitStr) -> Result<()> {
    let name = column.value();
    if name.is_empty() {
        return Err(syn::Error::new(column.span(), "column name cannot be empty"));
    }
    // Columns under `db` become `:name` placeholders in insert templates.
    if key == DB_TAG && !name.chars().all(is_param_char) {
        return Err(syn::Error::new(
            column.span(),
            format!("column `{name}` may only contain letters, digits, `_` and `.`"),
        ));
    }
    match tags.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = name,
        None => tags.push((key, name)),
    }
    Ok(())
}

fn is_param_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

fn unraw(ident: &syn::Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map(str::to_string).unwrap_or(name)
}

/// Table name from `#[db(table = "...")]` on the struct.
pub fn table_name(input: &DeriveInput) -> Result<String> {
    let mut table = None;
    for attr in &input.attrs {
        if !attr.path().is_ident(DB_TAG) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit: LitStr = meta.value()?.parse()?;
                table = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported db attribute"))
            }
        })?;
    }

    match table {
        Some(table) if !table.is_empty() => Ok(table),
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "Record requires #[db(table = \"table_name\")]",
        )),
    }
}
