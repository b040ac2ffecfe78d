use super::config::MonitorConfig;
use super::truncate_sql_bytes;
use super::types::{QueryContext, QueryHook, QueryResult};
use std::time::Duration;

/// A `tracing`-based SQL log, emitted after each statement under target
/// `dborm.sql`.
///
/// - failures at ERROR, with `err_msg`
/// - statements slower than the threshold at WARN
/// - everything else at INFO, only when `print_sql` is on
///
/// Events carry `query`, `args` (omitted when there are none) and
/// `latency_ms`.
#[derive(Debug, Clone, Default)]
pub struct TracingSqlHook {
    config: MonitorConfig,
}

impl TracingSqlHook {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.config.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }
}

impl QueryHook for TracingSqlHook {
    fn after_query(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        // One event, with or without the `args` field.
        macro_rules! emit {
            ($macro:ident, $($field:tt)*) => {
                if ctx.args.is_empty() {
                    tracing::$macro!(target: "dborm.sql", $($field)*)
                } else {
                    tracing::$macro!(target: "dborm.sql", args = ?ctx.args, $($field)*)
                }
            };
        }

        let query = self.truncate_sql(&ctx.sql);
        let latency_ms = duration.as_millis() as u64;

        if let QueryResult::Error(err_msg) = result {
            emit!(error, query = %query, latency_ms, err_msg = %err_msg, "Sql Exec Err");
        } else if duration > self.config.slow_query_threshold {
            emit!(warn, query = %query, latency_ms, "Sql Exec Slow");
        } else if self.config.print_sql {
            emit!(info, query = %query, latency_ms, "Sql Exec");
        }
    }
}
