//! # dborm
//!
//! A tag-driven MySQL ORM for Rust.
//!
//! ## Features
//!
//! - **Tag-driven mapping**: fields declare the column they bind to with `#[db("name")]`
//! - **Parameterized SQL only**: every value travels as a bind argument
//! - **Batch writes in one round trip**: multi-row `INSERT`, `CASE WHEN` batch `UPDATE`
//! - **Complex fields as documents**: `Vec`, maps and `#[derive(Document)]` structs are
//!   serialized on write and decoded on read with a pluggable [`Codec`]
//! - **Query monitoring**: `tracing`-based SQL log with slow-query warnings
//!
//! ## Example
//!
//! ```ignore
//! use dborm::{Client, Record, args};
//!
//! #[derive(Debug, Default, Record)]
//! #[db(table = "users")]
//! struct User {
//!     #[db("id")]
//!     id: i64,
//!     #[db("name")]
//!     name: String,
//!     #[db("tags")]
//!     tags: Vec<String>,
//! }
//!
//! let client = Client::new(mysql_async::Pool::new(url.as_str()));
//!
//! // INSERT INTO `users` (`id`,`name`,`tags`) VALUES (?,?,?)
//! client.insert(&user).await?;
//!
//! // SELECT `id`,`name`,`tags` FROM `users` WHERE id IN (?, ?, ?)
//! let users: Vec<User> = client
//!     .search("WHERE id IN (?)", args![dborm::Value::list([1, 2, 3])])
//!     .await?;
//!
//! // UPDATE `users` SET `name` = ?, `tags` = ? WHERE true AND `id` = ?
//! client.update_by_struct(&user, &["id"]).await?;
//! ```

// Lets derive output (`::dborm::...`) resolve inside this crate's own tests.
extern crate self as dborm;

pub mod builder;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
pub mod ident;
pub mod mapper;
pub mod monitor;
pub mod named;
pub mod reflect;
pub mod rows;
pub mod schema;
pub mod shape;
pub mod value;

#[cfg(feature = "mysql")]
pub mod mysql;

pub use builder::BuiltQuery;
pub use client::{Client, IntoRecords, UpdateInput};
pub use codec::{Codec, JsonCodec, SharedCodec};
pub use config::ClientConfig;
pub use error::{DriverError, ErrorKind, OrmError, OrmResult};
pub use executor::{ExecResult, Executor};
pub use mapper::{Destination, MapTarget, RowMapper};
pub use monitor::{
    HookAction, InstrumentedExecutor, MonitorConfig, QueryContext, QueryHook, QueryResult,
    QueryType, TracingSqlHook,
};
pub use reflect::{DEFAULT_TAG, Field, FieldVisitor, Record, Tagged, tag_names, to_field_map};
pub use rows::{Row, Rows};
pub use schema::{FieldIndex, NamingConvention, SchemaResolver};
pub use shape::{Classify, Shape};
pub use value::{FromValue, ToValue, Value, ValueMap};

#[cfg(feature = "derive")]
pub use dborm_derive::{Document, Record, Tagged};

/// Build a `Vec<Value>` of bind arguments.
///
/// ```
/// let args = dborm::args![1, "alice", dborm::Value::list([1, 2])];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}
