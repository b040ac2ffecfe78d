use crate::error::{OrmError, OrmResult};
use crate::ident::{self, write_quoted};
use crate::named;

/// `INSERT INTO `t` (`a`,`b`) VALUES (:a,:b)`.
///
/// The template carries named placeholders; values are bound by the
/// executor's named-parameter layer.
pub fn build_insert_query(table: &str, columns: &[&str]) -> OrmResult<String> {
    ident::validate(table)?;
    if columns.is_empty() {
        return Err(OrmError::TagsEmpty {
            table: table.to_string(),
        });
    }

    if let Some(column) = columns.iter().find(|c| !named::is_param_name(c)) {
        return Err(OrmError::Ident(format!(
            "column '{column}' cannot be bound as a named parameter"
        )));
    }

    let mut sql = String::with_capacity(32 + columns.len() * 16);
    sql.push_str("INSERT INTO ");
    write_quoted(&mut sql, table);
    sql.push_str(" (");
    sql.push_str(&ident::quote_list(columns.iter().copied()));
    sql.push_str(") VALUES (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        sql.push(':');
        sql.push_str(column);
    }
    sql.push(')');
    Ok(sql)
}

/// Insert template followed by `ON DUPLICATE KEY UPDATE `a` = VALUES(`a`),...`
/// covering every column.
pub fn build_upsert_query(table: &str, columns: &[&str]) -> OrmResult<String> {
    let mut sql = build_insert_query(table, columns)?;
    sql.push_str(" ON DUPLICATE KEY UPDATE ");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        write_quoted(&mut sql, column);
        sql.push_str(" = VALUES(");
        write_quoted(&mut sql, column);
        sql.push(')');
    }
    Ok(sql)
}
