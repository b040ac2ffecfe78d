use super::types::{HookAction, QueryContext, QueryHook, QueryResult};
use crate::builder::BuiltQuery;
use crate::error::{OrmError, OrmResult};
use crate::executor::{ExecResult, Executor};
use crate::rows::Rows;
use crate::value::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// An executor wrapper that runs every statement through its hooks.
pub struct InstrumentedExecutor<E> {
    inner: E,
    hooks: Vec<Arc<dyn QueryHook>>,
}

impl<E: Executor> InstrumentedExecutor<E> {
    /// Wrap an executor, with no hooks yet.
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            hooks: Vec::new(),
        }
    }

    /// Add a hook. Hooks run in the order they were added.
    pub fn with_hook<H: QueryHook + 'static>(self, hook: H) -> Self {
        self.with_hook_arc(Arc::new(hook))
    }

    pub fn with_hook_arc(mut self, hook: Arc<dyn QueryHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Get a reference to the inner executor.
    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Get the inner executor, consuming this wrapper.
    pub fn into_inner(self) -> E {
        self.inner
    }

    fn apply_hooks(&self, ctx: &mut QueryContext) -> OrmResult<()> {
        for hook in &self.hooks {
            match hook.before_query(ctx) {
                HookAction::Continue => {}
                HookAction::ModifySql(sql) => {
                    ctx.query_type = super::QueryType::from_sql(&sql);
                    ctx.sql = sql;
                }
                HookAction::Abort(reason) => {
                    return Err(OrmError::Other(format!(
                        "Query aborted by hook: {reason}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn report_result(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        for hook in &self.hooks {
            hook.after_query(ctx, duration, result);
        }
    }
}

impl<E: Executor> Executor for InstrumentedExecutor<E> {
    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<ExecResult> {
        let mut ctx = QueryContext::new(sql, args);
        self.apply_hooks(&mut ctx)?;

        let start = Instant::now();
        let result = self.inner.execute(&ctx.sql, args).await;
        let report = match &result {
            Ok(r) => QueryResult::Affected(r.rows_affected),
            Err(e) => QueryResult::error(e.to_string()),
        };
        self.report_result(&ctx, start.elapsed(), &report);
        result
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Rows> {
        let mut ctx = QueryContext::new(sql, args);
        self.apply_hooks(&mut ctx)?;

        let start = Instant::now();
        let result = self.inner.query(&ctx.sql, args).await;
        let report = match &result {
            Ok(rows) => QueryResult::Rows(rows.remaining()),
            Err(e) => QueryResult::error(e.to_string()),
        };
        self.report_result(&ctx, start.elapsed(), &report);
        result
    }

    fn expand_in_clause(&self, sql: &str, args: Vec<Value>) -> OrmResult<BuiltQuery> {
        self.inner.expand_in_clause(sql, args)
    }
}
