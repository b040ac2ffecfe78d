//! Named-parameter binding.
//!
//! Compiles `:name` placeholders to positional `?` and collects the matching
//! values from a [`ValueMap`]. `::` produces a literal colon. Placeholders
//! inside quoted literals or identifiers are left alone.
//!
//! Batch binding repeats the `VALUES (...)` group once per record, giving a
//! single multi-row insert.

use crate::builder::BuiltQuery;
use crate::error::{OrmError, OrmResult};
use crate::value::{Value, ValueMap};

/// A statement with its named placeholders replaced by `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedStatement {
    pub sql: String,
    /// Placeholder names in order of appearance.
    pub names: Vec<String>,
}

impl NamedStatement {
    pub fn compile(sql: &str) -> Self {
        let mut out = String::with_capacity(sql.len());
        let mut names = Vec::new();
        let mut quote: Option<char> = None;
        let mut chars = sql.chars().peekable();

        while let Some(ch) = chars.next() {
            if let Some(q) = quote {
                out.push(ch);
                if ch == '\\' && q != '`' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if ch == q {
                    quote = None;
                }
                continue;
            }

            match ch {
                '\'' | '"' | '`' => {
                    quote = Some(ch);
                    out.push(ch);
                }
                ':' if chars.peek() == Some(&':') => {
                    chars.next();
                    out.push(':');
                }
                ':' if chars.peek().is_some_and(|c| is_name_char(*c)) => {
                    let mut name = String::new();
                    while let Some(&c) = chars.peek() {
                        if !is_name_char(c) {
                            break;
                        }
                        name.push(c);
                        chars.next();
                    }
                    names.push(name);
                    out.push('?');
                }
                _ => out.push(ch),
            }
        }

        Self { sql: out, names }
    }

    fn values(&self, args: &ValueMap) -> OrmResult<Vec<Value>> {
        self.names
            .iter()
            .map(|name| {
                args.get(name)
                    .cloned()
                    .ok_or_else(|| OrmError::MissingNamedArg { name: name.clone() })
            })
            .collect()
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Whether `name` can be written as a `:name` placeholder.
pub(crate) fn is_param_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// Bind one argument map.
pub fn bind_named(sql: &str, args: &ValueMap) -> OrmResult<BuiltQuery> {
    let stmt = NamedStatement::compile(sql);
    let args = stmt.values(args)?;
    Ok(BuiltQuery::new(stmt.sql, args))
}

/// Bind a batch of argument maps into one multi-row statement.
pub fn bind_named_batch(sql: &str, records: &[ValueMap]) -> OrmResult<BuiltQuery> {
    match records {
        [] => Err(OrmError::RecordsEmpty),
        [one] => bind_named(sql, one),
        many => {
            let stmt = NamedStatement::compile(sql);
            let (start, end) = values_group(&stmt.sql).ok_or_else(|| {
                OrmError::Other(format!("no VALUES group to repeat in: {}", stmt.sql))
            })?;

            let group = &stmt.sql[start..end];
            let mut out = String::with_capacity(stmt.sql.len() + (group.len() + 1) * many.len());
            out.push_str(&stmt.sql[..start]);
            for i in 0..many.len() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(group);
            }
            out.push_str(&stmt.sql[end..]);

            let mut args = Vec::with_capacity(stmt.names.len() * many.len());
            for record in many {
                args.extend(stmt.values(record)?);
            }
            Ok(BuiltQuery::new(out, args))
        }
    }
}

/// Byte range of the first parenthesized group after `VALUES`.
fn values_group(sql: &str) -> Option<(usize, usize)> {
    let bytes = sql.as_bytes();
    let keyword = b"VALUES";
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' && q != b'`' {
                i += 1;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        if matches!(b, b'\'' | b'"' | b'`') {
            quote = Some(b);
            i += 1;
            continue;
        }
        if bytes[i..].len() >= keyword.len()
            && bytes[i..i + keyword.len()].eq_ignore_ascii_case(keyword)
            && (i == 0 || !bytes[i - 1].is_ascii_alphanumeric())
        {
            let mut j = i + keyword.len();
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if bytes.get(j) == Some(&b'(') {
                return matching_paren(bytes, j).map(|end| (j, end + 1));
            }
        }
        i += 1;
    }
    None
}

fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' && q != b'`' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}
