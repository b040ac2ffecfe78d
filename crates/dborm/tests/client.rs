//! Client verbs against a recording executor: the SQL and arguments each
//! verb sends, and how result sets come back.

mod common;

use common::RecordingExecutor;
use dborm::builder::joint_fields_in;
use dborm::{
    Client, ClientConfig, Document, ErrorKind, NamingConvention, OrmError, Record, Tagged, Value,
    ValueMap, args,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Model definitions ────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Document)]
struct Settings {
    theme: String,
    langs: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
#[db(table = "users")]
struct User {
    #[db("id")]
    id: i64,
    #[db("name")]
    name: String,
    #[db("age")]
    age: i32,
    #[db("tags")]
    tags: Vec<String>,
    #[db("settings")]
    settings: Option<Settings>,
    // Not mapped.
    cache: String,
}

#[derive(Debug, Default, Clone, PartialEq, Tagged)]
struct Audit {
    #[db("created_by")]
    created_by: String,
    #[db("name")]
    name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
#[db(table = "accounts")]
struct Account {
    #[db("id")]
    id: i64,
    #[db(flatten)]
    audit: Audit,
    #[db("name")]
    name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
#[db(table = "profiles")]
struct Profile {
    #[db("id")]
    id: i64,
    #[db("langs")]
    langs: Vec<String>,
    #[db("scores")]
    scores: BTreeMap<String, i32>,
    #[db("settings")]
    settings: Settings,
    #[db("dims")]
    dims: [i32; 3],
    #[db("avatar")]
    avatar: Vec<u8>,
}

const USER_COLUMNS: &str = "`id`,`name`,`age`,`tags`,`settings`";

fn alice() -> User {
    User {
        id: 1,
        name: "alice".into(),
        age: 30,
        tags: vec!["a".into(), "b".into()],
        settings: None,
        cache: "ignored".into(),
    }
}

fn bob() -> User {
    User {
        id: 2,
        name: "bob".into(),
        age: 41,
        tags: vec![],
        settings: Some(Settings {
            theme: "dark".into(),
            langs: vec!["en".into()],
        }),
        cache: String::new(),
    }
}

fn user_row(user: &User) -> Vec<Value> {
    vec![
        Value::Int(user.id),
        Value::Bytes(user.name.clone().into_bytes()),
        Value::Int(i64::from(user.age)),
        Value::Bytes(serde_json::to_vec(&user.tags).unwrap()),
        match &user.settings {
            Some(s) => Value::Bytes(serde_json::to_vec(s).unwrap()),
            None => Value::Null,
        },
    ]
}

fn client() -> Client<RecordingExecutor> {
    Client::new(RecordingExecutor::new().affected(1))
}

// ── Writes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_one_record() {
    let client = client();
    let result = client.insert(&alice()).await.unwrap();
    assert_eq!(result.rows_affected, 1);

    let stmt = client.executor().last();
    assert_eq!(
        stmt.sql,
        format!("INSERT INTO `users` ({USER_COLUMNS}) VALUES (?,?,?,?,?)")
    );
    assert_eq!(
        stmt.args,
        vec![
            Value::Int(1),
            Value::Text("alice".into()),
            Value::Int(30),
            Value::Text(r#"["a","b"]"#.into()),
            Value::Null,
        ]
    );
}

#[tokio::test]
async fn insert_batch_is_one_statement() {
    let client = client();
    let users = [alice(), bob()];
    client.insert(&users[..]).await.unwrap();

    let statements = client.executor().statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].sql,
        format!("INSERT INTO `users` ({USER_COLUMNS}) VALUES (?,?,?,?,?),(?,?,?,?,?)")
    );
    assert_eq!(statements[0].args.len(), 10);
    assert_eq!(
        statements[0].args[9],
        Value::Text(r#"{"theme":"dark","langs":["en"]}"#.into())
    );
}

#[tokio::test]
async fn insert_empty_batch_fails_before_executing() {
    let client = client();
    let none: &[User] = &[];
    let err = client.insert(none).await.unwrap_err();
    assert!(matches!(err, OrmError::RecordsEmpty));
    assert_eq!(err.kind(), ErrorKind::InputShape);
    assert!(client.executor().statements().is_empty());
}

#[tokio::test]
async fn upsert_updates_every_column() {
    let client = client();
    client.upsert(&alice()).await.unwrap();

    let sql = client.executor().last().sql;
    assert!(sql.starts_with(&format!(
        "INSERT INTO `users` ({USER_COLUMNS}) VALUES (?,?,?,?,?) ON DUPLICATE KEY UPDATE "
    )));
    assert!(sql.ends_with("`tags` = VALUES(`tags`),`settings` = VALUES(`settings`)"));
}

#[tokio::test]
async fn update_by_struct_single() {
    let client = client();
    client.update_by_struct(&alice(), &["id"]).await.unwrap();

    let stmt = client.executor().last();
    assert_eq!(
        stmt.sql,
        "UPDATE `users` SET `name` = ?, `age` = ?, `tags` = ?, `settings` = ? WHERE true AND `id` = ?"
    );
    assert_eq!(stmt.args.first(), Some(&Value::Text("alice".into())));
    assert_eq!(stmt.args.last(), Some(&Value::Int(1)));
}

#[tokio::test]
async fn update_by_struct_batch_uses_case_when() {
    let client = client();
    let users = [alice(), bob()];
    client.update_by_struct(&users[..], &["id"]).await.unwrap();

    let stmt = client.executor().last();
    assert!(stmt.sql.starts_with(
        "UPDATE `users` SET `name` = CASE WHEN `id` = ? THEN ? WHEN `id` = ? THEN ? END, "
    ));
    assert!(stmt.sql.ends_with("WHERE (`id`) IN ((?),(?))"));
    // 4 columns x 2 records x (1 key + 1 value) + 2 key tuples
    assert_eq!(stmt.args.len(), 18);
    assert_eq!(
        &stmt.args[..4],
        &[
            Value::Int(1),
            Value::Text("alice".into()),
            Value::Int(2),
            Value::Text("bob".into())
        ]
    );
    assert_eq!(&stmt.args[16..], &[Value::Int(1), Value::Int(2)]);
}

#[tokio::test]
async fn update_requires_keys() {
    let client = client();
    let err = client.update_by_struct(&alice(), &[]).await.unwrap_err();
    assert!(matches!(err, OrmError::FieldsEmpty));

    let err = client
        .update_by_struct(&alice(), &["missing"])
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::MissingKeyField { .. }));
}

#[tokio::test]
async fn update_by_map_stringifies_nested_values() {
    let client = client();
    let map = ValueMap::new()
        .with("id", 7)
        .with("meta", serde_json::json!({"k": 1}));
    client.update_by_map("users", map, &["id"]).await.unwrap();

    let stmt = client.executor().last();
    assert_eq!(stmt.sql, "UPDATE `users` SET `meta` = ? WHERE true AND `id` = ?");
    assert_eq!(
        stmt.args,
        vec![Value::Text(r#"{"k":1}"#.into()), Value::Int(7)]
    );
}

#[tokio::test]
async fn update_by_map_batch_rejects_missing_columns() {
    let client = client();
    let maps = vec![
        ValueMap::new().with("id", 1).with("name", "a"),
        ValueMap::new().with("id", 2),
    ];
    let err = client.update_by_map("users", maps, &["id"]).await.unwrap_err();
    assert!(matches!(err, OrmError::FieldNotFound { ref field, record: 1 } if field == "name"));
}

#[tokio::test]
async fn delete_expands_list_arguments() {
    let client = client();
    client
        .delete("users", "WHERE id IN (?)", args![Value::list([1, 2])])
        .await
        .unwrap();

    let stmt = client.executor().last();
    assert_eq!(stmt.sql, "DELETE FROM `users` WHERE id IN (?, ?)");
    assert_eq!(stmt.args, vec![Value::Int(1), Value::Int(2)]);
}

#[tokio::test]
async fn multi_field_in_flattens_tuples() {
    let client = client();
    let filter = joint_fields_in(&["a", "b"], &[args![1, 2], args![3, 4]]).unwrap();
    assert_eq!(filter.sql, "WHERE (`a`,`b`) IN ((?),(?))");

    client.delete("t", &filter.sql, filter.args).await.unwrap();
    let stmt = client.executor().last();
    assert_eq!(stmt.sql, "DELETE FROM `t` WHERE (`a`,`b`) IN ((?, ?),(?, ?))");
    assert_eq!(stmt.args, args![1, 2, 3, 4]);
}

// ── Reads ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_decodes_complex_columns() {
    let client = client();
    client.executor().push_rows(
        &["id", "name", "age", "tags", "settings"],
        vec![user_row(&alice()), user_row(&bob())],
    );

    let users: Vec<User> = client.search("WHERE age > ?", args![18]).await.unwrap();
    assert_eq!(
        client.executor().last().sql,
        format!("SELECT {USER_COLUMNS} FROM `users` WHERE age > ?")
    );

    let mut expected = vec![alice(), bob()];
    for user in &mut expected {
        user.cache.clear();
    }
    assert_eq!(users, expected);
}

#[tokio::test]
async fn written_complex_fields_read_back() {
    let profile = Profile {
        id: 7,
        langs: vec!["en".into(), "nb".into()],
        scores: BTreeMap::from([("math".to_string(), 90), ("art".to_string(), 75)]),
        settings: Settings {
            theme: "dark".into(),
            langs: vec!["en".into()],
        },
        dims: [3, 4, 5],
        avatar: vec![0x89, b'P', b'N', b'G'],
    };

    let client = client();
    client.insert(&profile).await.unwrap();
    let written = client.executor().last().args;
    assert_eq!(written[2], Value::Text(r#"{"art":75,"math":90}"#.into()));
    assert_eq!(
        written[3],
        Value::Text(r#"{"theme":"dark","langs":["en"]}"#.into())
    );
    assert_eq!(written[4], Value::Text("[3,4,5]".into()));
    assert_eq!(written[5], Value::Bytes(vec![0x89, b'P', b'N', b'G']));

    client.executor().push_rows(
        &["id", "langs", "scores", "settings", "dims", "avatar"],
        vec![written],
    );
    let found: Profile = client.search("WHERE id = ?", args![7]).await.unwrap();
    assert_eq!(found, profile);
}

#[tokio::test]
async fn search_into_boxed_records() {
    let client = client();
    client.executor().push_rows(
        &["id", "name", "age", "tags", "settings"],
        vec![user_row(&alice()), user_row(&bob())],
    );

    let users: Vec<Box<User>> = client.search("WHERE age > ?", args![18]).await.unwrap();
    assert_eq!(
        client.executor().last().sql,
        format!("SELECT {USER_COLUMNS} FROM `users` WHERE age > ?")
    );
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, alice().name);
    assert_eq!(users[1].tags, bob().tags);
}

#[tokio::test]
async fn search_without_rows_is_empty() {
    let client = client();

    let user: User = client.search("WHERE id = ?", args![9]).await.unwrap();
    assert_eq!(user, User::default());

    let user: Option<User> = client.search("WHERE id = ?", args![9]).await.unwrap();
    assert_eq!(user, None);

    let users: Vec<User> = client.search("", args![]).await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn search_single_takes_first_row() {
    let client = client();
    client.executor().push_rows(
        &["ID", "Name", "age", "tags", "settings"],
        vec![user_row(&bob()), user_row(&alice())],
    );

    let user: User = client.search("", args![]).await.unwrap();
    assert_eq!(user.id, 2);
    assert_eq!(user.settings.unwrap().theme, "dark");
}

#[tokio::test]
async fn strict_mapping_rejects_unknown_columns() {
    let executor = RecordingExecutor::new();
    executor.push_rows(&["id", "nickname"], vec![vec![Value::Int(1), Value::Null]]);
    let client = Client::new(executor);
    let err = client
        .search::<Vec<User>>("", args![])
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::MissingDestinationField { ref column, .. } if column == "nickname"));

    let executor = RecordingExecutor::new();
    executor.push_rows(&["id", "nickname"], vec![vec![Value::Int(1), Value::Null]]);
    let client = Client::with_config(executor, ClientConfig::new().strict(false));
    let users: Vec<User> = client.search("", args![]).await.unwrap();
    assert_eq!(users[0].id, 1);
}

#[tokio::test]
async fn exact_naming_is_case_sensitive() {
    let executor = RecordingExecutor::new();
    executor.push_rows(&["ID"], vec![vec![Value::Int(1)]]);
    let config = ClientConfig::new().naming(NamingConvention::Exact);
    let client = Client::with_config(executor, config);

    let err = client.search::<User>("", args![]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}

#[tokio::test]
async fn search_fields_into_maps() {
    let client = client();
    client.executor().push_rows(
        &["id", "name"],
        vec![
            vec![Value::Int(1), Value::Text("a".into())],
            vec![Value::Int(2), Value::Text("b".into())],
        ],
    );
    let rows: Vec<ValueMap> = client
        .search_fields("users", &["id", "name"], "WHERE id IN (?)", args![Value::list([1, 2])])
        .await
        .unwrap();
    assert_eq!(
        client.executor().last().sql,
        "SELECT `id`,`name` FROM `users` WHERE id IN (?, ?)"
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].get("name"), Some(&Value::Text("b".into())));

    let row: ValueMap = client
        .search_fields("users", &["id"], "WHERE id = ?", args![3])
        .await
        .unwrap();
    assert!(row.is_empty());
}

#[tokio::test]
async fn search_one_field_decodes_documents() {
    let client = client();
    client
        .executor()
        .push_rows(&["tags"], vec![vec![Value::Bytes(br#"["x","y"]"#.to_vec())]]);
    let tags: Vec<String> = client
        .search_one_field("users", "tags", "WHERE id = ?", args![1])
        .await
        .unwrap();
    assert_eq!(tags, ["x", "y"]);

    let missing: String = client
        .search_one_field("users", "name", "WHERE id = ?", args![404])
        .await
        .unwrap();
    assert_eq!(missing, "");
}

#[tokio::test]
async fn search_one_field_multi_and_count() {
    let client = client();
    client.executor().push_rows(
        &["name"],
        vec![vec![Value::Text("a".into())], vec![Value::Text("b".into())]],
    );
    let names: Vec<String> = client
        .search_one_field_multi("users", "name", "", args![])
        .await
        .unwrap();
    assert_eq!(names, ["a", "b"]);

    client
        .executor()
        .push_rows(&["COUNT(1)"], vec![vec![Value::Int(3)]]);
    let n: i64 = client.count("users", "WHERE age > ?", args![18]).await.unwrap();
    assert_eq!(n, 3);
    assert_eq!(
        client.executor().last().sql,
        "SELECT COUNT(1) FROM `users` WHERE age > ?"
    );
}

// ── Embedded structs ─────────────────────────────────────────────────────────

#[tokio::test]
async fn embedded_fields_flatten_and_outer_wins() {
    let client = client();
    let account = Account {
        id: 5,
        audit: Audit {
            created_by: "root".into(),
            name: "inner".into(),
        },
        name: "outer".into(),
    };
    client.insert(&account).await.unwrap();

    let stmt = client.executor().last();
    assert_eq!(
        stmt.sql,
        "INSERT INTO `accounts` (`id`,`created_by`,`name`) VALUES (?,?,?)"
    );
    assert_eq!(stmt.args[2], Value::Text("outer".into()));

    client.executor().push_rows(
        &["id", "created_by", "name"],
        vec![vec![
            Value::Int(5),
            Value::Text("root".into()),
            Value::Text("outer".into()),
        ]],
    );
    let found: Account = client.search("WHERE id = ?", args![5]).await.unwrap();
    assert_eq!(found.audit.created_by, "root");
    assert_eq!(found.audit.name, "");
    assert_eq!(found.name, "outer");
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn driver_errors_carry_the_statement() {
    let client = Client::new(RecordingExecutor::new().failing("connection reset"));
    let err = client.delete("users", "WHERE id = ?", args![1]).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Execution);
    match err {
        OrmError::Execution { sql, source } => {
            assert_eq!(sql, "DELETE FROM `users` WHERE id = ?");
            assert_eq!(source.to_string(), "connection reset");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn decode_errors_name_the_column() {
    let client = client();
    client
        .executor()
        .push_rows(&["id", "tags"], vec![vec![Value::Int(1), Value::Bytes(b"not json".to_vec())]]);
    let err = client.search::<Vec<User>>("", args![]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialization);
}
