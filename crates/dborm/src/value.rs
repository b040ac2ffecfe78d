//! Dynamically typed values and the conversions in and out of them.
//!
//! [`Value`] is what flows between records, builders, the executor, and the
//! row mapper. [`ValueMap`] is an insertion-ordered column-name keyed map of
//! values, used both as the per-statement field map and as an untyped row.

use crate::error::{OrmError, OrmResult};
use crate::shape::Classify;
use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hash};

/// A bind argument or a column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// An unserialized complex value.
    Json(serde_json::Value),
    /// A list argument, flattened by IN-clause expansion.
    List(Vec<Value>),
}

impl Value {
    /// Build a list argument.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Variant name, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Json(_) => "json",
            Value::List(_) => "list",
        }
    }

    /// Convert a JSON value, keeping arrays and objects nested.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Json(other),
        }
    }

    fn as_text(&self) -> Option<std::borrow::Cow<'_, str>> {
        match self {
            Value::Text(s) => Some(std::borrow::Cow::Borrowed(s.as_str())),
            Value::Bytes(b) => std::str::from_utf8(b).ok().map(std::borrow::Cow::Borrowed),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bytes(b) => match std::str::from_utf8(b) {
                Ok(s) => serializer.serialize_str(s),
                Err(_) => serializer.serialize_bytes(b),
            },
            Value::Json(j) => j.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident as $cast:ty),* $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(<$cast>::from(v))
            }
        })*
    };
}

value_from!(
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    f32 => Float as f64,
    f64 => Float as f64,
    bool => Bool as bool,
    String => Text as String,
    Vec<u8> => Bytes as Vec<u8>,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ── ValueMap ────────────────────────────────────────────────────────────────

/// Insertion-ordered map from column name to value.
///
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: Vec<(String, Value)>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Chainable insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value.into());
        self
    }

    /// Insert a value, returning the previous one for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.position(key).map(move |i| &mut self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Typed read of one entry.
    pub fn get_as<T: FromValue>(&self, key: &str) -> OrmResult<T> {
        let value = self
            .get(key)
            .cloned()
            .ok_or_else(|| OrmError::not_found(format!("key '{key}'")))?;
        T::from_value(value).map_err(|e| e.in_column(key))
    }

    /// Build a map from any value that serializes to a struct-like object.
    ///
    /// Arrays and objects inside the value stay nested as [`Value::Json`].
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> OrmResult<Self> {
        match serde_json::to_value(value)? {
            serde_json::Value::Object(object) => Ok(object
                .into_iter()
                .map(|(k, v)| (k, Value::from_json(v)))
                .collect()),
            other => Err(OrmError::ExpectStruct {
                found: json_kind(&other),
            }),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>> Extend<(K, Value)> for ValueMap {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ValueMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ── Conversion traits ───────────────────────────────────────────────────────

/// Convert a Rust value into a [`Value`].
///
/// Complex types produce [`Value::Json`]; the reflector decides whether to
/// serialize them further.
pub trait ToValue {
    fn to_value(&self) -> OrmResult<Value>;

    #[doc(hidden)]
    fn as_byte(&self) -> Option<u8> {
        None
    }
}

/// Convert a [`Value`] into a Rust value.
///
/// Complex types accept only [`Value::Json`]; the row mapper decodes the raw
/// column bytes before calling in.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> OrmResult<Self>;

    #[doc(hidden)]
    fn from_byte(byte: u8) -> Option<Self> {
        let _ = byte;
        None
    }
}

fn mismatch(expected: &str, got: &Value) -> OrmError {
    OrmError::decode("", format!("expected {expected}, got {}", got.type_name()))
}

fn parse_text<T: std::str::FromStr>(expected: &str, value: &Value) -> OrmResult<T> {
    value
        .as_text()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| mismatch(expected, value))
}

macro_rules! int_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> OrmResult<Value> {
                    Ok(Value::$variant((*self).try_into().map_err(|_| {
                        OrmError::Serialization(format!("{} out of range", self))
                    })?))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> OrmResult<Self> {
                    let expected = stringify!($ty);
                    match &value {
                        Value::Int(i) => (*i).try_into().map_err(|_| mismatch(expected, &value)),
                        Value::UInt(u) => (*u).try_into().map_err(|_| mismatch(expected, &value)),
                        Value::Bool(b) => Ok(<$ty>::from(*b)),
                        Value::Text(_) | Value::Bytes(_) => parse_text(expected, &value),
                        _ => Err(mismatch(expected, &value)),
                    }
                }
            }
        )*
    };
}

int_conversions!(
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    isize => Int,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    usize => UInt,
);

impl ToValue for u8 {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(Value::UInt(u64::from(*self)))
    }

    fn as_byte(&self) -> Option<u8> {
        Some(*self)
    }
}

impl FromValue for u8 {
    fn from_value(value: Value) -> OrmResult<Self> {
        match &value {
            Value::Int(i) => (*i).try_into().map_err(|_| mismatch("u8", &value)),
            Value::UInt(u) => (*u).try_into().map_err(|_| mismatch("u8", &value)),
            Value::Bool(b) => Ok(u8::from(*b)),
            Value::Text(_) | Value::Bytes(_) => parse_text("u8", &value),
            _ => Err(mismatch("u8", &value)),
        }
    }

    fn from_byte(byte: u8) -> Option<Self> {
        Some(byte)
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(Value::Float(*self))
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(Value::Float(f64::from(*self)))
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> OrmResult<Self> {
        match &value {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            Value::UInt(u) => Ok(*u as f64),
            Value::Text(_) | Value::Bytes(_) => parse_text("f64", &value),
            _ => Err(mismatch("f64", &value)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> OrmResult<Self> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(Value::Bool(*self))
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> OrmResult<Self> {
        match &value {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            Value::UInt(u) => Ok(*u != 0),
            Value::Text(_) | Value::Bytes(_) => match value.as_text().as_deref().map(str::trim) {
                Some("1") | Some("true") | Some("TRUE") => Ok(true),
                Some("0") | Some("false") | Some("FALSE") => Ok(false),
                _ => Err(mismatch("bool", &value)),
            },
            _ => Err(mismatch("bool", &value)),
        }
    }
}

impl ToValue for String {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(Value::Text(self.clone()))
    }
}

impl ToValue for str {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(Value::Text(self.to_string()))
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Bytes(b) => String::from_utf8(b)
                .map_err(|e| OrmError::decode("", format!("invalid utf-8: {e}"))),
            Value::Int(i) => Ok(i.to_string()),
            Value::UInt(u) => Ok(u.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Json(serde_json::Value::String(s)) => Ok(s),
            Value::Json(j) => Ok(j.to_string()),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl ToValue for char {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(Value::Text(self.to_string()))
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> OrmResult<Self> {
        let s = String::from_value(value)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(OrmError::decode("", format!("expected one char, got {s:?}"))),
        }
    }
}

impl ToValue for Value {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(self.clone())
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> OrmResult<Self> {
        Ok(value)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> OrmResult<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> OrmResult<Value> {
        (**self).to_value()
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: Value) -> OrmResult<Self> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> OrmResult<Value> {
        (**self).to_value()
    }
}

// ── Sequences: bytes or documents ───────────────────────────────────────────

fn bytes_of<'a, T: ToValue + 'a>(items: impl IntoIterator<Item = &'a T>) -> Value {
    Value::Bytes(items.into_iter().filter_map(ToValue::as_byte).collect())
}

fn document<T: Serialize + ?Sized>(value: &T) -> OrmResult<Value> {
    Ok(Value::Json(serde_json::to_value(value)?))
}

fn from_document<T: DeserializeOwned>(value: Value) -> OrmResult<T> {
    match value {
        Value::Json(doc) => Ok(serde_json::from_value(doc)?),
        other => Err(mismatch("document", &other)),
    }
}

fn byte_vec<T: FromValue>(value: Value) -> OrmResult<Vec<T>> {
    let bytes = match value {
        Value::Bytes(b) => b,
        Value::Text(s) => s.into_bytes(),
        other => return Err(mismatch("bytes", &other)),
    };
    bytes
        .into_iter()
        .map(|b| T::from_byte(b).ok_or_else(|| OrmError::decode("", "byte conversion")))
        .collect()
}

impl<T: Classify + ToValue + Serialize> ToValue for Vec<T> {
    fn to_value(&self) -> OrmResult<Value> {
        if T::IS_BYTE {
            Ok(bytes_of(self))
        } else {
            document(self)
        }
    }
}

impl<T: Classify + FromValue + DeserializeOwned> FromValue for Vec<T> {
    fn from_value(value: Value) -> OrmResult<Self> {
        if T::IS_BYTE {
            byte_vec(value)
        } else {
            from_document(value)
        }
    }
}

impl<T: Classify + ToValue + Serialize> ToValue for [T] {
    fn to_value(&self) -> OrmResult<Value> {
        if T::IS_BYTE {
            Ok(bytes_of(self))
        } else {
            document(self)
        }
    }
}

impl<T: Classify + ToValue + Serialize, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> OrmResult<Value> {
        self.as_slice().to_value()
    }
}

impl<T: Classify + FromValue + DeserializeOwned, const N: usize> FromValue for [T; N] {
    fn from_value(value: Value) -> OrmResult<Self> {
        let items = Vec::<T>::from_value(value)?;
        let got = items.len();
        items
            .try_into()
            .map_err(|_| OrmError::decode("", format!("expected {N} elements, got {got}")))
    }
}

impl<T: Serialize> ToValue for HashSet<T> {
    fn to_value(&self) -> OrmResult<Value> {
        document(self)
    }
}

impl<T: DeserializeOwned + Eq + Hash> FromValue for HashSet<T> {
    fn from_value(value: Value) -> OrmResult<Self> {
        from_document(value)
    }
}

impl<T: Serialize> ToValue for BTreeSet<T> {
    fn to_value(&self) -> OrmResult<Value> {
        document(self)
    }
}

impl<T: DeserializeOwned + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: Value) -> OrmResult<Self> {
        from_document(value)
    }
}

impl<K: Serialize + Eq + Hash, V: Serialize, S: BuildHasher> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> OrmResult<Value> {
        document(self)
    }
}

impl<K, V, S> FromValue for HashMap<K, V, S>
where
    K: DeserializeOwned + Eq + Hash,
    V: DeserializeOwned,
    S: BuildHasher + Default,
{
    fn from_value(value: Value) -> OrmResult<Self> {
        from_document(value)
    }
}

impl<K: Serialize, V: Serialize> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> OrmResult<Value> {
        document(self)
    }
}

impl<K: DeserializeOwned + Ord, V: DeserializeOwned> FromValue for BTreeMap<K, V> {
    fn from_value(value: Value) -> OrmResult<Self> {
        from_document(value)
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(Value::Json(self.clone()))
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Json(doc) => Ok(doc),
            Value::Null => Ok(serde_json::Value::Null),
            other => Err(mismatch("document", &other)),
        }
    }
}

/// Serde-backed conversions for a struct stored as a document column.
///
/// Used by `#[derive(Document)]`.
pub fn document_to_value<T: Serialize>(value: &T) -> OrmResult<Value> {
    document(value)
}

/// Counterpart of [`document_to_value`].
pub fn document_from_value<T: DeserializeOwned>(value: Value) -> OrmResult<T> {
    from_document(value)
}

// ── chrono / uuid ───────────────────────────────────────────────────────────

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M:%S%.f";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S%.f";

fn parse_datetime(s: &str) -> Option<chrono::NaiveDateTime> {
    let s = s.trim();
    chrono::NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, DATE_FMT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl ToValue for chrono::NaiveDate {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(Value::Text(self.format(DATE_FMT).to_string()))
    }
}

impl FromValue for chrono::NaiveDate {
    fn from_value(value: Value) -> OrmResult<Self> {
        value
            .as_text()
            .and_then(|s| {
                let s = s.trim();
                chrono::NaiveDate::parse_from_str(s, DATE_FMT)
                    .ok()
                    .or_else(|| parse_datetime(s).map(|dt| dt.date()))
            })
            .ok_or_else(|| mismatch("date", &value))
    }
}

impl ToValue for chrono::NaiveTime {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(Value::Text(self.format(TIME_FMT).to_string()))
    }
}

impl FromValue for chrono::NaiveTime {
    fn from_value(value: Value) -> OrmResult<Self> {
        value
            .as_text()
            .and_then(|s| chrono::NaiveTime::parse_from_str(s.trim(), TIME_FMT).ok())
            .ok_or_else(|| mismatch("time", &value))
    }
}

impl ToValue for chrono::NaiveDateTime {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(Value::Text(self.format(DATETIME_FMT).to_string()))
    }
}

impl FromValue for chrono::NaiveDateTime {
    fn from_value(value: Value) -> OrmResult<Self> {
        value
            .as_text()
            .and_then(|s| parse_datetime(&s))
            .ok_or_else(|| mismatch("datetime", &value))
    }
}

impl<Tz: chrono::TimeZone> ToValue for chrono::DateTime<Tz> {
    fn to_value(&self) -> OrmResult<Value> {
        self.naive_utc().to_value()
    }
}

impl FromValue for chrono::DateTime<chrono::Utc> {
    fn from_value(value: Value) -> OrmResult<Self> {
        chrono::NaiveDateTime::from_value(value).map(|dt| dt.and_utc())
    }
}

impl ToValue for uuid::Uuid {
    fn to_value(&self) -> OrmResult<Value> {
        Ok(Value::Text(self.hyphenated().to_string()))
    }
}

impl FromValue for uuid::Uuid {
    fn from_value(value: Value) -> OrmResult<Self> {
        if let Value::Bytes(b) = &value {
            if b.len() == 16 {
                return uuid::Uuid::from_slice(b).map_err(|e| OrmError::decode("", e.to_string()));
            }
        }
        value
            .as_text()
            .and_then(|s| uuid::Uuid::parse_str(s.trim()).ok())
            .ok_or_else(|| mismatch("uuid", &value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_map_keeps_insertion_order_and_replaces_in_place() {
        let mut map = ValueMap::new().with("b", 1).with("a", 2);
        assert_eq!(map.insert("b", Value::Int(3)), Some(Value::Int(1)));
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(map.get("b"), Some(&Value::Int(3)));
        assert_eq!(map.remove("b"), Some(Value::Int(3)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn from_serialize_requires_an_object() {
        #[derive(serde::Serialize)]
        struct Patch {
            name: String,
            tags: Vec<String>,
        }

        let map = ValueMap::from_serialize(&Patch {
            name: "a".into(),
            tags: vec!["x".into()],
        })
        .unwrap();
        assert_eq!(map.get("name"), Some(&Value::Text("a".into())));
        assert_eq!(map.get("tags"), Some(&Value::Json(serde_json::json!(["x"]))));

        let err = ValueMap::from_serialize(&vec![1, 2]).unwrap_err();
        assert!(matches!(err, OrmError::ExpectStruct { found: "array" }));
    }

    #[test]
    fn integers_decode_leniently() {
        assert_eq!(i64::from_value(Value::Int(-3)).unwrap(), -3);
        assert_eq!(i32::from_value(Value::Bytes(b"42".to_vec())).unwrap(), 42);
        assert_eq!(u8::from_value(Value::UInt(7)).unwrap(), 7);
        assert!(u8::from_value(Value::Int(-1)).is_err());
        assert!(i64::from_value(Value::Null).is_err());
        assert_eq!(Option::<i64>::from_value(Value::Null).unwrap(), None);
    }

    #[test]
    fn byte_vectors_stay_binary() {
        let bytes = vec![0u8, 159, 146, 150];
        assert_eq!(bytes.to_value().unwrap(), Value::Bytes(bytes.clone()));
        assert_eq!(
            Vec::<u8>::from_value(Value::Bytes(bytes.clone())).unwrap(),
            bytes
        );
        assert_eq!([1u8, 2].to_value().unwrap(), Value::Bytes(vec![1, 2]));
    }

    #[test]
    fn sequences_become_documents() {
        let tags = vec!["a".to_string(), "b".to_string()];
        let value = tags.to_value().unwrap();
        assert_eq!(value, Value::Json(serde_json::json!(["a", "b"])));
        assert_eq!(Vec::<String>::from_value(value).unwrap(), tags);

        let arr: [i32; 2] = FromValue::from_value(Value::Json(serde_json::json!([1, 2]))).unwrap();
        assert_eq!(arr, [1, 2]);
        assert!(<[i32; 3]>::from_value(Value::Json(serde_json::json!([1, 2]))).is_err());
    }

    #[test]
    fn chrono_round_trips_through_text() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(12, 30, 1)
            .unwrap();
        let value = dt.to_value().unwrap();
        assert_eq!(value, Value::Text("2024-02-29 12:30:01".into()));
        assert_eq!(chrono::NaiveDateTime::from_value(value).unwrap(), dt);
        assert_eq!(
            chrono::NaiveDate::from_value(Value::Bytes(b"2024-02-29 00:00:00".to_vec())).unwrap(),
            dt.date()
        );
    }

    #[test]
    fn uuid_from_text_and_bytes() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(uuid::Uuid::from_value(id.to_value().unwrap()).unwrap(), id);
        assert_eq!(
            uuid::Uuid::from_value(Value::Bytes(id.as_bytes().to_vec())).unwrap(),
            id
        );
    }
}
