use super::*;
use crate::error::{OrmError, OrmResult};
use crate::executor::{ExecResult, Executor};
use crate::rows::Rows;
use crate::value::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Shared DummyExecutor for tests ──

struct DummyExecutor;

impl Executor for DummyExecutor {
    async fn execute(&self, sql: &str, _: &[Value]) -> OrmResult<ExecResult> {
        if sql.contains("boom") {
            return Err(OrmError::Other("boom".into()));
        }
        Ok(ExecResult::new(3))
    }

    async fn query(&self, _: &str, _: &[Value]) -> OrmResult<Rows> {
        Ok(Rows::new(
            vec!["id".into()],
            vec![vec![Value::Int(1)], vec![Value::Int(2)]],
        ))
    }
}

#[derive(Default)]
struct RecordingHook {
    seen: Mutex<Vec<(String, QueryResult)>>,
}

impl QueryHook for RecordingHook {
    fn after_query(&self, ctx: &QueryContext, _: Duration, result: &QueryResult) {
        self.seen
            .lock()
            .unwrap()
            .push((ctx.sql.clone(), result.clone()));
    }
}

struct RewriteHook;

impl QueryHook for RewriteHook {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        if ctx.sql.starts_with("DROP") {
            HookAction::Abort("no drops".into())
        } else if ctx.query_type == QueryType::Select {
            HookAction::ModifySql(format!("/* app */ {}", ctx.sql))
        } else {
            HookAction::Continue
        }
    }
}

#[test]
fn test_query_type_detection() {
    assert_eq!(
        QueryType::from_sql("SELECT * FROM users"),
        QueryType::Select
    );
    assert_eq!(
        QueryType::from_sql("  select `id` FROM `users`"),
        QueryType::Select
    );
    assert_eq!(
        QueryType::from_sql("INSERT INTO `users` (`id`) VALUES (?)"),
        QueryType::Insert
    );
    assert_eq!(
        QueryType::from_sql("UPDATE `users` SET `name` = ?"),
        QueryType::Update
    );
    assert_eq!(
        QueryType::from_sql("DELETE FROM `users` WHERE id = ?"),
        QueryType::Delete
    );
    assert_eq!(
        QueryType::from_sql("CREATE TABLE users (id INT)"),
        QueryType::Other
    );
}

#[test]
fn test_truncation() {
    assert_eq!(truncate_sql_bytes("SELECT * FROM users", 10), "SELECT * F");
    assert_eq!(truncate_sql_bytes("SELECT 1", 10), "SELECT 1");
    // Never splits a multi-byte character.
    assert_eq!(truncate_sql_bytes("ééé", 3), "é");

    let long = "x".repeat(600);
    match QueryResult::error(long) {
        QueryResult::Error(msg) => assert_eq!(msg.len(), 515),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_monitor_config_defaults() {
    let config = MonitorConfig::new();
    assert!(!config.print_sql);
    assert_eq!(config.slow_query_threshold, Duration::from_secs(1));
    assert_eq!(config.max_sql_length, None);

    let config = config
        .with_print_sql(true)
        .with_slow_query_threshold(Duration::from_millis(5))
        .with_max_sql_length(80);
    assert!(config.print_sql);
    assert_eq!(config.max_sql_length, Some(80));
}

#[tokio::test]
async fn test_hooks_see_every_statement() {
    let hook = Arc::new(RecordingHook::default());
    let executor = InstrumentedExecutor::new(DummyExecutor).with_hook_arc(hook.clone());

    executor.execute("UPDATE t SET a = ?", &[Value::Int(1)]).await.unwrap();
    let rows = executor.query("SELECT id FROM t", &[]).await.unwrap();
    assert_eq!(rows.remaining(), 2);
    assert!(executor.execute("boom", &[]).await.is_err());

    let seen = hook.seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].1, QueryResult::Affected(3));
    assert_eq!(seen[1].1, QueryResult::Rows(2));
    assert!(seen[2].1.is_error());
}

#[tokio::test]
async fn test_hook_can_rewrite_and_abort() {
    let recorder = Arc::new(RecordingHook::default());
    let executor = InstrumentedExecutor::new(DummyExecutor)
        .with_hook(RewriteHook)
        .with_hook_arc(recorder.clone());

    executor.query("SELECT 1", &[]).await.unwrap();
    let err = executor.execute("DROP TABLE t", &[]).await.unwrap_err();
    assert!(err.to_string().contains("no drops"));

    let seen = recorder.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "/* app */ SELECT 1");
}

#[tokio::test]
async fn test_tracing_hook_without_subscriber() {
    let config = MonitorConfig::new()
        .with_print_sql(true)
        .with_max_sql_length(16);
    let executor = InstrumentedExecutor::new(DummyExecutor).with_hook(TracingSqlHook::new(config));

    executor
        .execute("UPDATE t SET a = ? WHERE id = ?", &[Value::Int(1), Value::Int(2)])
        .await
        .unwrap();
    assert!(executor.execute("boom", &[]).await.is_err());
}

#[tokio::test]
async fn test_named_defaults_go_through_hooks() {
    let hook = Arc::new(RecordingHook::default());
    let executor = InstrumentedExecutor::new(DummyExecutor).with_hook_arc(hook.clone());

    let map = crate::value::ValueMap::new().with("id", 1);
    executor
        .execute_named("DELETE FROM t WHERE id = :id", &map)
        .await
        .unwrap();

    let seen = hook.seen.lock().unwrap();
    assert_eq!(seen[0].0, "DELETE FROM t WHERE id = ?");
}
