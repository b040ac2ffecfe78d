//! Statement monitoring.
//!
//! [`InstrumentedExecutor`] wraps any [`Executor`](crate::Executor), times
//! each statement, and hands the outcome to a [`QueryHook`].
//! [`TracingSqlHook`] is the stock hook: it logs failures, slow statements,
//! and, when enabled, every statement.
//!
//! # Example
//!
//! ```rust,ignore
//! use dborm::monitor::{InstrumentedExecutor, MonitorConfig, TracingSqlHook};
//! use std::time::Duration;
//!
//! let config = MonitorConfig::new()
//!     .with_print_sql(true)
//!     .with_slow_query_threshold(Duration::from_millis(500));
//!
//! let executor = InstrumentedExecutor::new(pool).with_hook(TracingSqlHook::new(config));
//! let client = dborm::Client::new(executor);
//! ```

mod config;
mod instrumented;
mod tracing_hook;
mod types;

#[cfg(test)]
mod tests;

pub use config::MonitorConfig;
pub use instrumented::InstrumentedExecutor;
pub use tracing_hook::TracingSqlHook;
pub use types::{HookAction, QueryContext, QueryHook, QueryResult, QueryType};

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
