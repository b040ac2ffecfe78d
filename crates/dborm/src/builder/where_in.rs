use super::BuiltQuery;
use crate::error::{OrmError, OrmResult};
use crate::ident;
use crate::value::Value;

/// Multi-column IN filter: `WHERE (`a`,`b`) IN ((?),(?))`.
///
/// Each accepted tuple becomes one `(?)` group bound to a [`Value::List`];
/// run the result through [`expand_in`] to flatten it. Tuples whose length
/// differs from the column count are skipped.
pub fn joint_fields_in(fields: &[&str], tuples: &[Vec<Value>]) -> OrmResult<BuiltQuery> {
    if fields.is_empty() {
        return Err(OrmError::FieldsEmpty);
    }

    let args: Vec<Value> = tuples
        .iter()
        .filter(|tuple| tuple.len() == fields.len())
        .map(|tuple| Value::List(tuple.clone()))
        .collect();
    if args.is_empty() {
        return Err(OrmError::InClause(format!(
            "no tuple of {} values for ({})",
            fields.len(),
            fields.join(",")
        )));
    }

    let mut sql = String::from("WHERE (");
    sql.push_str(&ident::quote_list(fields.iter().copied()));
    sql.push_str(") IN (");
    for i in 0..args.len() {
        if i > 0 {
            sql.push(',');
        }
        sql.push_str("(?)");
    }
    sql.push(')');

    Ok(BuiltQuery { sql, args })
}

/// Expand `?` placeholders bound to lists into `?, ?, ...`.
///
/// Arguments are flattened one level. The placeholder count must match the
/// argument count whether or not any list is present. Placeholders inside
/// quoted literals or identifiers are not counted.
pub fn expand_in(sql: &str, args: Vec<Value>) -> OrmResult<BuiltQuery> {
    let mut out = String::with_capacity(sql.len() + args.len() * 3);
    let mut flat = Vec::with_capacity(args.len());
    let mut args = args.into_iter();
    let mut quote: Option<char> = None;
    let mut chars = sql.chars();

    while let Some(ch) = chars.next() {
        match quote {
            Some(q) => {
                out.push(ch);
                if ch == '\\' && q != '`' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if ch == q {
                    quote = None;
                }
            }
            None if matches!(ch, '\'' | '"' | '`') => {
                quote = Some(ch);
                out.push(ch);
            }
            None if ch == '?' => {
                let arg = args.next().ok_or_else(|| {
                    OrmError::InClause("number of placeholders exceeds number of arguments".into())
                })?;
                match arg {
                    Value::List(items) => {
                        if items.is_empty() {
                            return Err(OrmError::InClause("empty list passed to IN".into()));
                        }
                        for i in 0..items.len() {
                            if i > 0 {
                                out.push_str(", ");
                            }
                            out.push('?');
                        }
                        flat.extend(items);
                    }
                    other => {
                        out.push('?');
                        flat.push(other);
                    }
                }
            }
            None => out.push(ch),
        }
    }

    if args.next().is_some() {
        return Err(OrmError::InClause(
            "number of placeholders is less than number of arguments".into(),
        ));
    }

    Ok(BuiltQuery {
        sql: out,
        args: flat,
    })
}
