use super::push_where;
use crate::error::OrmResult;
use crate::ident::{self, write_quoted};

/// `DELETE FROM `t` <where>`.
///
/// An empty where clause deletes every row; that is the caller's call.
pub fn build_delete_query(table: &str, where_clause: &str) -> OrmResult<String> {
    ident::validate(table)?;
    let mut sql = String::from("DELETE FROM ");
    write_quoted(&mut sql, table);
    push_where(&mut sql, where_clause);
    Ok(sql)
}
