use super::push_where;
use crate::error::{OrmError, OrmResult};
use crate::ident::{self, write_quoted};

/// `SELECT `a`,`b` FROM `t` <where>`.
pub fn build_search_query(table: &str, columns: &[&str], where_clause: &str) -> OrmResult<String> {
    ident::validate(table)?;
    if columns.is_empty() {
        return Err(OrmError::TagsEmpty {
            table: table.to_string(),
        });
    }

    let mut sql = String::from("SELECT ");
    sql.push_str(&ident::quote_list(columns.iter().copied()));
    sql.push_str(" FROM ");
    write_quoted(&mut sql, table);
    push_where(&mut sql, where_clause);
    Ok(sql)
}

/// `SELECT COUNT(1) FROM `t` <where>`.
pub fn build_count_query(table: &str, where_clause: &str) -> OrmResult<String> {
    ident::validate(table)?;
    let mut sql = String::from("SELECT COUNT(1) FROM ");
    write_quoted(&mut sql, table);
    push_where(&mut sql, where_clause);
    Ok(sql)
}
