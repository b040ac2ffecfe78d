//! An in-memory executor that records every statement.

#![allow(dead_code)]

use dborm::{ExecResult, Executor, OrmError, OrmResult, Rows, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One statement as the driver would receive it.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

#[derive(Default)]
pub struct RecordingExecutor {
    log: Mutex<Vec<Statement>>,
    results: Mutex<VecDeque<Rows>>,
    affected: u64,
    fail_with: Option<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `n` affected rows from every `execute`.
    pub fn affected(mut self, n: u64) -> Self {
        self.affected = n;
        self
    }

    /// Fail every statement with a driver error.
    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    /// Queue a result set for the next `query`.
    pub fn push_rows(&self, columns: &[&str], rows: Vec<Vec<Value>>) {
        let columns = columns.iter().map(|c| c.to_string()).collect();
        self.results.lock().unwrap().push_back(Rows::new(columns, rows));
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.log.lock().unwrap().clone()
    }

    pub fn last(&self) -> Statement {
        self.log.lock().unwrap().last().cloned().expect("no statement ran")
    }

    fn record(&self, sql: &str, args: &[Value]) -> OrmResult<()> {
        self.log.lock().unwrap().push(Statement {
            sql: sql.to_string(),
            args: args.to_vec(),
        });
        match &self.fail_with {
            Some(message) => Err(OrmError::driver(std::io::Error::other(message.clone()))),
            None => Ok(()),
        }
    }
}

impl Executor for RecordingExecutor {
    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<ExecResult> {
        self.record(sql, args)?;
        Ok(ExecResult::new(self.affected))
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Rows> {
        self.record(sql, args)?;
        Ok(self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Rows::empty(Vec::new())))
    }
}
