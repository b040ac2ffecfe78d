//! Row mapper: result sets into records, scalars, and untyped maps.
//!
//! Struct destinations resolve each result column to a field path once per
//! result set. Columns whose field type is complex carry a serialized
//! document; they are decoded with the shared [`Codec`] before assignment.
//! Everything else is assigned directly.

use crate::codec::Codec;
use crate::error::{OrmError, OrmResult};
use crate::reflect::Record;
use crate::rows::{Row, Rows};
use crate::schema::{FieldIndex, SchemaResolver};
use crate::shape::Classify;
use crate::value::{FromValue, Value, ValueMap};

/// How one result column is bound.
#[derive(Debug, Clone)]
struct Slot {
    path: Vec<usize>,
    decode: bool,
}

/// Maps [`Rows`] into destinations.
#[derive(Clone, Copy)]
pub struct RowMapper<'a> {
    resolver: &'a SchemaResolver,
    codec: &'a dyn Codec,
    tag: &'a str,
    strict: bool,
}

impl<'a> RowMapper<'a> {
    pub fn new(resolver: &'a SchemaResolver, codec: &'a dyn Codec, tag: &'a str) -> Self {
        Self {
            resolver,
            codec,
            tag,
            strict: true,
        }
    }

    /// In strict mode a column without a destination field is an error;
    /// otherwise it is skipped.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn tag(&self) -> &str {
        self.tag
    }

    /// First row as a record. Zero rows yields a not-found error.
    pub fn scan_one<T: Record>(&self, mut rows: Rows) -> OrmResult<T> {
        let plan = self.plan::<T>(rows.columns())?;
        let columns = rows.columns().to_vec();
        let row = rows
            .next()
            .ok_or_else(|| OrmError::not_found(std::any::type_name::<T>()))?;
        self.fill(row, &columns, &plan)
    }

    /// Every row as a record.
    pub fn scan_all<T: Record>(&self, rows: Rows) -> OrmResult<Vec<T>> {
        let plan = self.plan::<T>(rows.columns())?;
        let columns = rows.columns().to_vec();
        let mut out = Vec::with_capacity(rows.remaining());
        for row in rows {
            out.push(self.fill(row, &columns, &plan)?);
        }
        Ok(out)
    }

    pub fn scan_all_boxed<T: Record>(&self, rows: Rows) -> OrmResult<Vec<Box<T>>> {
        Ok(self.scan_all(rows)?.into_iter().map(Box::new).collect())
    }

    /// First row of a single-column result as a scalar or a decoded
    /// complex value.
    pub fn scan_value<T: FromValue + Classify>(&self, mut rows: Rows) -> OrmResult<T> {
        if rows.remaining() == 0 {
            return Err(OrmError::not_found(std::any::type_name::<T>()));
        }
        let column = single_column::<T>(&rows)?;
        match rows.next() {
            Some(row) => self.value_of(row, &column),
            None => Err(OrmError::not_found(std::any::type_name::<T>())),
        }
    }

    pub fn scan_values<T: FromValue + Classify>(&self, rows: Rows) -> OrmResult<Vec<T>> {
        if rows.remaining() == 0 {
            return Ok(Vec::new());
        }
        let column = single_column::<T>(&rows)?;
        rows.map(|row| self.value_of(row, &column)).collect()
    }

    /// First row as an untyped map. Zero rows yields a not-found error.
    pub fn scan_map_once(&self, mut rows: Rows) -> OrmResult<ValueMap> {
        rows.next()
            .map(Row::into_map)
            .ok_or_else(|| OrmError::not_found("map"))
    }

    pub fn scan_maps(&self, rows: Rows) -> OrmResult<Vec<ValueMap>> {
        Ok(rows.map(Row::into_map).collect())
    }

    fn plan<T: Record>(&self, columns: &[String]) -> OrmResult<Vec<Option<Slot>>> {
        let index = self.resolver.index::<T>(self.tag);
        columns
            .iter()
            .map(|column| self.slot(&index, column))
            .collect()
    }

    fn slot(&self, index: &FieldIndex, column: &str) -> OrmResult<Option<Slot>> {
        match index.resolve(column) {
            Some(entry) => Ok(Some(Slot {
                path: entry.path.clone(),
                decode: entry.shape.is_complex(),
            })),
            None if self.strict => Err(OrmError::MissingDestinationField {
                column: column.to_string(),
                target: index.target(),
            }),
            None => Ok(None),
        }
    }

    fn fill<T: Record>(&self, row: Row, columns: &[String], plan: &[Option<Slot>]) -> OrmResult<T> {
        let mut record = T::default();
        for ((value, slot), column) in row.into_values().into_iter().zip(plan).zip(columns) {
            let Some(slot) = slot else {
                continue;
            };
            let value = if slot.decode {
                self.decode(column, value)?
            } else {
                value
            };
            record
                .assign(&slot.path, value)
                .map_err(|e| e.in_column(column))?;
        }
        Ok(record)
    }

    fn value_of<T: FromValue + Classify>(&self, row: Row, column: &str) -> OrmResult<T> {
        let value = row.into_values().into_iter().next().unwrap_or(Value::Null);
        let value = if T::SHAPE.is_complex() {
            self.decode(column, value)?
        } else {
            value
        };
        T::from_value(value).map_err(|e| e.in_column(column))
    }

    /// Raw column bytes to a document.
    fn decode(&self, column: &str, value: Value) -> OrmResult<Value> {
        match value {
            Value::Null | Value::Json(_) => Ok(value),
            Value::Bytes(bytes) => Ok(Value::Json(self.codec.decode(&bytes)?)),
            Value::Text(text) => Ok(Value::Json(self.codec.decode(text.as_bytes())?)),
            other => Err(OrmError::decode(
                column,
                format!("expected a serialized document, got {}", other.type_name()),
            )),
        }
    }
}

fn single_column<T>(rows: &Rows) -> OrmResult<String> {
    match rows.columns() {
        [column] => Ok(column.clone()),
        columns => Err(OrmError::ColumnCount {
            target: std::any::type_name::<T>(),
            got: columns.len(),
        }),
    }
}

/// A destination for [`Client::search`](crate::Client::search).
///
/// `#[derive(Record)]` implements it for the record itself (first row).
/// `Vec<T>` and `Option<T>` are provided; `Vec<Box<T>>` goes through the
/// `Record` impl of `Box<T>`.
pub trait Destination: Sized {
    /// Record type that names the table and columns.
    type Record: Record;

    fn from_rows(rows: Rows, mapper: &RowMapper<'_>) -> OrmResult<Self>;

    /// Value returned when no rows match.
    fn empty() -> Self;
}

impl<T: Record> Destination for Vec<T> {
    type Record = T;

    fn from_rows(rows: Rows, mapper: &RowMapper<'_>) -> OrmResult<Self> {
        mapper.scan_all(rows)
    }

    fn empty() -> Self {
        Vec::new()
    }
}

impl<T: Record> Destination for Option<T> {
    type Record = T;

    fn from_rows(rows: Rows, mapper: &RowMapper<'_>) -> OrmResult<Self> {
        match mapper.scan_one(rows) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn empty() -> Self {
        None
    }
}

/// A destination for [`Client::search_fields`](crate::Client::search_fields).
pub trait MapTarget: Sized {
    fn from_rows(rows: Rows, mapper: &RowMapper<'_>) -> OrmResult<Self>;

    fn empty() -> Self;
}

impl MapTarget for ValueMap {
    fn from_rows(rows: Rows, mapper: &RowMapper<'_>) -> OrmResult<Self> {
        mapper.scan_map_once(rows)
    }

    fn empty() -> Self {
        ValueMap::new()
    }
}

impl MapTarget for Vec<ValueMap> {
    fn from_rows(rows: Rows, mapper: &RowMapper<'_>) -> OrmResult<Self> {
        mapper.scan_maps(rows)
    }

    fn empty() -> Self {
        Vec::new()
    }
}
