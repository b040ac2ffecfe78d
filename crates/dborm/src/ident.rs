//! Identifier quoting.
//!
//! Every table and column name emitted into generated SQL is wrapped in
//! backticks:
//!
//! - dotted names quote each segment: `db.users` → `` `db`.`users` ``
//! - an embedded backtick is doubled
//!
//! # Example
//! ```ignore
//! use dborm::ident::quote;
//!
//! assert_eq!(quote("users"), "`users`");
//! assert_eq!(quote("app.users"), "`app`.`users`");
//! ```

use crate::error::{OrmError, OrmResult};

/// Quote `name` for use in SQL text.
pub fn quote(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    write_quoted(&mut out, name);
    out
}

pub(crate) fn write_quoted(out: &mut String, name: &str) {
    for (i, part) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push('`');
        for ch in part.chars() {
            if ch == '`' {
                out.push('`');
            }
            out.push(ch);
        }
        out.push('`');
    }
}

/// Quote a comma-separated column list: `` `a`,`b` ``.
pub(crate) fn quote_list<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (i, name) in names.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_quoted(&mut out, name);
    }
    out
}

/// Reject names that cannot be quoted meaningfully.
pub fn validate(name: &str) -> OrmResult<()> {
    if name.is_empty() {
        return Err(OrmError::Ident("identifier cannot be empty".into()));
    }
    if name.contains('\0') {
        return Err(OrmError::Ident(
            "identifier cannot contain NUL character".into(),
        ));
    }
    if name.split('.').any(str::is_empty) {
        return Err(OrmError::Ident(format!("empty segment in '{name}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_simple() {
        assert_eq!(quote("users"), "`users`");
    }

    #[test]
    fn quote_dotted() {
        assert_eq!(quote("app.users"), "`app`.`users`");
    }

    #[test]
    fn quote_escapes_backtick() {
        assert_eq!(quote("we`ird"), "`we``ird`");
    }

    #[test]
    fn quote_list_joins_without_spaces() {
        assert_eq!(quote_list(["id", "name"]), "`id`,`name`");
        assert_eq!(quote_list([]), "");
    }

    #[test]
    fn validate_rejects_bad_names() {
        assert!(validate("users").is_ok());
        assert!(validate("app.users").is_ok());
        assert!(validate("").is_err());
        assert!(validate("app.").is_err());
        assert!(validate("a\0b").is_err());
    }
}
