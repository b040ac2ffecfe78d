//! The seam between the ORM core and a SQL driver.

use crate::builder::{BuiltQuery, expand_in};
use crate::error::OrmResult;
use crate::named::{bind_named, bind_named_batch};
use crate::rows::Rows;
use crate::value::{Value, ValueMap};

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Auto-increment id generated by the statement. For a multi-row insert
    /// this is the id of the first row.
    pub last_insert_id: Option<u64>,
}

impl ExecResult {
    pub fn new(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_insert_id: None,
        }
    }

    pub fn with_last_insert_id(mut self, id: u64) -> Self {
        self.last_insert_id = Some(id);
        self
    }
}

/// A SQL execution layer: a pool, a connection, or a test double.
///
/// Only [`Executor::execute`] and [`Executor::query`] are required. Driver
/// failures should be returned as [`OrmError::Driver`](crate::OrmError::Driver);
/// the client attaches the statement text.
pub trait Executor: Send + Sync {
    /// Run a statement with positional `?` arguments.
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send;

    /// Run a query with positional `?` arguments and buffer its rows.
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Rows>> + Send;

    /// Run a statement with `:name` placeholders bound from one map.
    fn execute_named(
        &self,
        sql: &str,
        args: &ValueMap,
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send {
        async move {
            let q = bind_named(sql, args)?;
            self.execute(&q.sql, &q.args).await
        }
    }

    /// Run an insert with `:name` placeholders once for many records, as
    /// a single multi-row statement.
    fn execute_named_batch(
        &self,
        sql: &str,
        records: &[ValueMap],
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send {
        async move {
            let q = bind_named_batch(sql, records)?;
            self.execute(&q.sql, &q.args).await
        }
    }

    /// Expand list arguments into `?, ?, ...` groups.
    fn expand_in_clause(&self, sql: &str, args: Vec<Value>) -> OrmResult<BuiltQuery> {
        expand_in(sql, args)
    }
}

impl<E: Executor> Executor for &E {
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send {
        (**self).execute(sql, args)
    }

    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Rows>> + Send {
        (**self).query(sql, args)
    }

    fn execute_named(
        &self,
        sql: &str,
        args: &ValueMap,
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send {
        (**self).execute_named(sql, args)
    }

    fn execute_named_batch(
        &self,
        sql: &str,
        records: &[ValueMap],
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send {
        (**self).execute_named_batch(sql, records)
    }

    fn expand_in_clause(&self, sql: &str, args: Vec<Value>) -> OrmResult<BuiltQuery> {
        (**self).expand_in_clause(sql, args)
    }
}
