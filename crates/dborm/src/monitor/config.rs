use std::time::Duration;

/// Configuration for SQL logging.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Log every statement at INFO.
    pub print_sql: bool,
    /// Statements slower than this are logged at WARN.
    pub slow_query_threshold: Duration,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            print_sql: false,
            slow_query_threshold: Duration::from_secs(1),
            max_sql_length: None,
        }
    }
}

impl MonitorConfig {
    /// Defaults: failures and statements slower than one second only.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_print_sql(mut self, print_sql: bool) -> Self {
        self.print_sql = print_sql;
        self
    }

    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = threshold;
        self
    }

    pub fn with_max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }
}
