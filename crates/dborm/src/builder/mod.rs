//! Statement builders.
//!
//! Pure functions from table metadata and runtime values to SQL text plus an
//! ordered argument list. No I/O happens here.
//!
//! - Identifiers are backtick-quoted via [`crate::ident`].
//! - Values are always bound (`?` or `:name`), never interpolated.
//! - Where clauses are caller-supplied fragments such as `WHERE id = ?`.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;
pub mod where_in;

pub use delete::build_delete_query;
pub use insert::{build_insert_query, build_upsert_query};
pub use select::{build_count_query, build_search_query};
pub use update::{build_update_batch_query, build_update_query};
pub use where_in::{expand_in, joint_fields_in};

use crate::value::Value;

/// SQL text with its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub args: Vec<Value>,
}

impl BuiltQuery {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

/// Append ` <where>` to `sql` when the clause is not blank.
pub(crate) fn push_where(sql: &mut String, where_clause: &str) {
    let where_clause = where_clause.trim();
    if !where_clause.is_empty() {
        sql.push(' ');
        sql.push_str(where_clause);
    }
}
