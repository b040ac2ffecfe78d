//! The client façade.
//!
//! [`Client`] composes the statement builders and the row mapper around an
//! [`Executor`]. Read verbs treat "no rows" as an empty result; write verbs
//! pick the single-row or batch statement from the number of records.

use crate::builder::{
    build_count_query, build_delete_query, build_insert_query, build_search_query,
    build_update_batch_query, build_update_query, build_upsert_query,
};
use crate::config::ClientConfig;
use crate::error::{OrmError, OrmResult};
use crate::executor::{ExecResult, Executor};
use crate::mapper::{Destination, MapTarget, RowMapper};
use crate::reflect::{Record, stringify_map, tag_names, to_field_map};
use crate::rows::Rows;
use crate::schema::SchemaResolver;
use crate::shape::Classify;
use crate::value::{FromValue, Value, ValueMap};

/// One record or a slice of records.
pub trait IntoRecords<'a, R: Record> {
    fn into_records(self) -> &'a [R];
}

impl<'a, R: Record> IntoRecords<'a, R> for &'a R {
    fn into_records(self) -> &'a [R] {
        std::slice::from_ref(self)
    }
}

impl<'a, R: Record> IntoRecords<'a, R> for &'a [R] {
    fn into_records(self) -> &'a [R] {
        self
    }
}

/// Input of [`Client::update_by_map`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateInput {
    One(ValueMap),
    Many(Vec<ValueMap>),
}

impl From<ValueMap> for UpdateInput {
    fn from(map: ValueMap) -> Self {
        Self::One(map)
    }
}

impl From<Vec<ValueMap>> for UpdateInput {
    fn from(maps: Vec<ValueMap>) -> Self {
        Self::Many(maps)
    }
}

impl From<&[ValueMap]> for UpdateInput {
    fn from(maps: &[ValueMap]) -> Self {
        Self::Many(maps.to_vec())
    }
}

/// ORM client over an [`Executor`].
///
/// # Example
///
/// ```ignore
/// let client = Client::new(pool);
///
/// client.insert(&user).await?;
/// let adults: Vec<User> = client.search("WHERE age >= ?", args![18]).await?;
/// client.update_by_struct(&user, &["id"]).await?;
/// ```
pub struct Client<E> {
    executor: E,
    config: ClientConfig,
    resolver: SchemaResolver,
}

impl<E: Executor> Client<E> {
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, ClientConfig::default())
    }

    pub fn with_config(executor: E, config: ClientConfig) -> Self {
        let resolver = SchemaResolver::new(config.naming.clone());
        Self {
            executor,
            config,
            resolver,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn resolver(&self) -> &SchemaResolver {
        &self.resolver
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_inner(self) -> E {
        self.executor
    }

    /// Mapper sharing this client's resolver, codec, and tag.
    pub fn mapper(&self) -> RowMapper<'_> {
        RowMapper::new(&self.resolver, self.config.codec.as_ref(), &self.config.tag)
            .strict(self.config.strict)
    }

    // ── Raw access ──────────────────────────────────────────────────────────

    /// Run a statement.
    pub async fn exec(&self, sql: &str, args: &[Value]) -> OrmResult<ExecResult> {
        tracing::debug!(target: "dborm", sql, args = args.len(), "exec");
        self.executor
            .execute(sql, args)
            .await
            .map_err(|e| e.with_sql(sql))
    }

    /// Run a statement with `:name` placeholders.
    pub async fn exec_named(&self, sql: &str, args: &ValueMap) -> OrmResult<ExecResult> {
        tracing::debug!(target: "dborm", sql, args = args.len(), "exec named");
        self.executor
            .execute_named(sql, args)
            .await
            .map_err(|e| e.with_sql(sql))
    }

    /// Run a query and return its buffered rows.
    pub async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Rows> {
        tracing::debug!(target: "dborm", sql, args = args.len(), "query");
        self.executor
            .query(sql, args)
            .await
            .map_err(|e| e.with_sql(sql))
    }

    /// Run arbitrary SQL into a destination; no rows yields the empty
    /// destination.
    pub async fn get<D: Destination>(&self, sql: &str, args: &[Value]) -> OrmResult<D> {
        let rows = self.query(sql, args).await?;
        or_empty(D::from_rows(rows, &self.mapper()), D::empty)
    }

    /// Run arbitrary SQL into records.
    pub async fn select<T: Record>(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<T>> {
        let rows = self.query(sql, args).await?;
        self.mapper().scan_all(rows)
    }

    // ── Reads ───────────────────────────────────────────────────────────────

    /// Select every tagged column of the destination's record type.
    ///
    /// `where_clause` is a fragment such as `WHERE id IN (?)`; list
    /// arguments are expanded. Zero matching rows is not an error: a
    /// record destination comes back as `Default`, a `Vec` empty, an
    /// `Option` as `None`.
    pub async fn search<D: Destination>(&self, where_clause: &str, args: Vec<Value>) -> OrmResult<D> {
        let columns = tag_names::<D::Record>(&self.config.tag);
        let filter = self.executor.expand_in_clause(where_clause, args)?;
        let sql = build_search_query(<D::Record as Record>::table_name(), &columns, &filter.sql)?;

        let rows = self.query(&sql, &filter.args).await?;
        or_empty(D::from_rows(rows, &self.mapper()), D::empty)
    }

    /// Select named columns into an untyped map (first row) or maps
    /// (every row).
    pub async fn search_fields<M: MapTarget>(
        &self,
        table: &str,
        columns: &[&str],
        where_clause: &str,
        args: Vec<Value>,
    ) -> OrmResult<M> {
        let filter = self.executor.expand_in_clause(where_clause, args)?;
        let sql = build_search_query(table, columns, &filter.sql)?;

        let rows = self.query(&sql, &filter.args).await?;
        or_empty(M::from_rows(rows, &self.mapper()), M::empty)
    }

    /// Select one column of the first matching row.
    ///
    /// Complex destination types (`Vec<String>`, maps, documents) are
    /// decoded from the stored text. No rows yields `T::default()`.
    pub async fn search_one_field<T>(
        &self,
        table: &str,
        column: &str,
        where_clause: &str,
        args: Vec<Value>,
    ) -> OrmResult<T>
    where
        T: FromValue + Classify + Default,
    {
        let rows = self.one_field(table, column, where_clause, args).await?;
        or_empty(self.mapper().scan_value(rows), T::default)
    }

    /// Select one column of every matching row.
    pub async fn search_one_field_multi<T>(
        &self,
        table: &str,
        column: &str,
        where_clause: &str,
        args: Vec<Value>,
    ) -> OrmResult<Vec<T>>
    where
        T: FromValue + Classify,
    {
        let rows = self.one_field(table, column, where_clause, args).await?;
        self.mapper().scan_values(rows)
    }

    async fn one_field(
        &self,
        table: &str,
        column: &str,
        where_clause: &str,
        args: Vec<Value>,
    ) -> OrmResult<Rows> {
        let filter = self.executor.expand_in_clause(where_clause, args)?;
        let sql = build_search_query(table, &[column], &filter.sql)?;
        self.query(&sql, &filter.args).await
    }

    /// `SELECT COUNT(1)` over `table`.
    pub async fn count<T>(&self, table: &str, where_clause: &str, args: Vec<Value>) -> OrmResult<T>
    where
        T: FromValue + Classify + Default,
    {
        let filter = self.executor.expand_in_clause(where_clause, args)?;
        let sql = build_count_query(table, &filter.sql)?;

        let rows = self.query(&sql, &filter.args).await?;
        or_empty(self.mapper().scan_value(rows), T::default)
    }

    // ── Writes ──────────────────────────────────────────────────────────────

    /// Insert one record or many records in a single statement.
    ///
    /// Complex fields are stored as serialized text.
    pub async fn insert<'r, R, I>(&self, records: I) -> OrmResult<ExecResult>
    where
        R: Record,
        I: IntoRecords<'r, R>,
    {
        let records = records.into_records();
        let columns = tag_names::<R>(&self.config.tag);
        let sql = build_insert_query(R::table_name(), &columns)?;
        self.write_named(&sql, records).await
    }

    /// Insert, or update every column when the row already exists.
    ///
    /// Relies on a primary or unique key of the table.
    pub async fn upsert<'r, R, I>(&self, records: I) -> OrmResult<ExecResult>
    where
        R: Record,
        I: IntoRecords<'r, R>,
    {
        let records = records.into_records();
        let columns = tag_names::<R>(&self.config.tag);
        let sql = build_upsert_query(R::table_name(), &columns)?;
        self.write_named(&sql, records).await
    }

    async fn write_named<R: Record>(&self, sql: &str, records: &[R]) -> OrmResult<ExecResult> {
        let maps = self.field_maps(records)?;
        tracing::debug!(target: "dborm", sql, records = maps.len(), "exec named batch");
        self.executor
            .execute_named_batch(sql, &maps)
            .await
            .map_err(|e| e.with_sql(sql))
    }

    /// Update rows matched by `keys` with every other tagged field.
    ///
    /// One record produces a plain `UPDATE ... WHERE`; several produce one
    /// `CASE WHEN` statement covering all of them.
    pub async fn update_by_struct<'r, R, I>(&self, records: I, keys: &[&str]) -> OrmResult<ExecResult>
    where
        R: Record,
        I: IntoRecords<'r, R>,
    {
        if keys.is_empty() {
            return Err(OrmError::FieldsEmpty);
        }
        let maps = self.field_maps(records.into_records())?;
        let q = match maps.as_slice() {
            [] => return Err(OrmError::RecordsEmpty),
            [one] => build_update_query(R::table_name(), one, keys)?,
            many => build_update_batch_query(R::table_name(), many, keys)?,
        };
        self.exec(&q.sql, &q.args).await
    }

    /// Partial update from one map or a batch of maps.
    ///
    /// Nested values are stored as serialized text.
    pub async fn update_by_map(
        &self,
        table: &str,
        input: impl Into<UpdateInput>,
        keys: &[&str],
    ) -> OrmResult<ExecResult> {
        if keys.is_empty() {
            return Err(OrmError::FieldsEmpty);
        }
        let codec = self.config.codec.as_ref();
        let q = match input.into() {
            UpdateInput::One(map) => build_update_query(table, &stringify_map(map, codec)?, keys)?,
            UpdateInput::Many(maps) => {
                let maps = maps
                    .into_iter()
                    .map(|map| stringify_map(map, codec))
                    .collect::<OrmResult<Vec<_>>>()?;
                build_update_batch_query(table, &maps, keys)?
            }
        };
        self.exec(&q.sql, &q.args).await
    }

    /// `DELETE FROM table <where>`.
    pub async fn delete(&self, table: &str, where_clause: &str, args: Vec<Value>) -> OrmResult<ExecResult> {
        let filter = self.executor.expand_in_clause(where_clause, args)?;
        let sql = build_delete_query(table, &filter.sql)?;
        self.exec(&sql, &filter.args).await
    }

    fn field_maps<R: Record>(&self, records: &[R]) -> OrmResult<Vec<ValueMap>> {
        if records.is_empty() {
            return Err(OrmError::RecordsEmpty);
        }
        let codec = self.config.codec.as_ref();
        records
            .iter()
            .map(|record| to_field_map(record, &self.config.tag, codec, true))
            .collect()
    }
}

fn or_empty<T>(result: OrmResult<T>, empty: impl FnOnce() -> T) -> OrmResult<T> {
    match result {
        Err(e) if e.is_not_found() => Ok(empty()),
        other => other,
    }
}
