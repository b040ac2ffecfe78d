//! Tag reflection: from a tagged record to a column-keyed field map.
//!
//! Types opt in with `#[derive(Tagged)]` (embeddable field groups) or
//! `#[derive(Record)]` (a table row). The derive records, per field, the tag
//! names it declares and its [`Shape`]; untagged fields are invisible here.
//!
//! Embedded structs (`#[db(flatten)]`) are expanded in place. When an embedded
//! field and an outer field share a name the outer field wins; among fields at
//! the same depth the later declaration wins.

use crate::codec::Codec;
use crate::error::OrmResult;
use crate::shape::Shape;
use crate::value::{ToValue, Value, ValueMap};
use std::collections::HashMap;

/// Default tag key.
pub const DEFAULT_TAG: &str = "db";

/// Static description of one tagged field.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Rust field name.
    pub ident: &'static str,
    /// `(tag key, column name)` pairs.
    pub tags: &'static [(&'static str, &'static str)],
    /// Shape of the field type.
    pub shape: Shape,
    /// Descriptors of an embedded struct, for flattened fields.
    pub embedded: Option<fn() -> &'static [Field]>,
}

impl Field {
    /// Column name this field declares under `tag`.
    pub fn tag(&self, tag: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find_map(|(key, name)| (*key == tag).then_some(*name))
    }
}

/// Receives field values from [`Tagged::visit_fields`].
pub trait FieldVisitor {
    fn visit(&mut self, name: &'static str, shape: Shape, value: &dyn ToValue) -> OrmResult<()>;

    /// Entering an embedded struct.
    fn descend(&mut self) {}

    /// Leaving an embedded struct.
    fn ascend(&mut self) {}
}

/// Field-level access generated by `#[derive(Tagged)]`.
pub trait Tagged {
    /// Tagged and flattened fields, in declaration order.
    fn fields() -> &'static [Field];

    /// Visit every field declaring `tag`, descending into embedded structs.
    fn visit_fields(&self, tag: &str, visitor: &mut dyn FieldVisitor) -> OrmResult<()>;

    /// Write `value` into the field at `path` (indexes into [`Tagged::fields`],
    /// one level per embedded struct).
    fn assign(&mut self, path: &[usize], value: Value) -> OrmResult<()>;
}

/// A table row.
///
/// # Example
///
/// ```ignore
/// use dborm::Record;
///
/// #[derive(Debug, Default, Record)]
/// #[db(table = "users")]
/// struct User {
///     #[db("id")]
///     id: i64,
///     #[db("name")]
///     name: String,
///     #[db("tags")]
///     tags: Vec<String>, // stored as a JSON document
/// }
/// ```
pub trait Record: Tagged + Default + Send + Sync + 'static {
    fn table_name() -> &'static str;
}

impl<T: Tagged> Tagged for Box<T> {
    fn fields() -> &'static [Field] {
        T::fields()
    }

    fn visit_fields(&self, tag: &str, visitor: &mut dyn FieldVisitor) -> OrmResult<()> {
        (**self).visit_fields(tag, visitor)
    }

    fn assign(&mut self, path: &[usize], value: Value) -> OrmResult<()> {
        (**self).assign(path, value)
    }
}

impl<T: Record> Record for Box<T> {
    fn table_name() -> &'static str {
        T::table_name()
    }
}

/// Walk the static descriptors of `fields`, calling `f(name, path, depth, field)`
/// for every leaf declaring `tag`.
pub(crate) fn walk(
    fields: &'static [Field],
    tag: &str,
    f: &mut dyn FnMut(&'static str, &[usize], usize, &'static Field),
) {
    fn inner(
        fields: &'static [Field],
        tag: &str,
        path: &mut Vec<usize>,
        f: &mut dyn FnMut(&'static str, &[usize], usize, &'static Field),
    ) {
        for (i, field) in fields.iter().enumerate() {
            path.push(i);
            if let Some(embedded) = field.embedded {
                inner(embedded(), tag, path, f);
            } else if let Some(name) = field.tag(tag) {
                f(name, path, path.len() - 1, field);
            }
            path.pop();
        }
    }

    inner(fields, tag, &mut Vec::new(), f);
}

/// Column names `T` declares under `tag`, in field map order.
pub fn tag_names<T: Tagged + ?Sized>(tag: &str) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    walk(T::fields(), tag, &mut |name, _, _, _| {
        if !names.contains(&name) {
            names.push(name);
        }
    });
    names
}

struct Collector<'a> {
    map: ValueMap,
    depths: HashMap<&'static str, usize>,
    depth: usize,
    codec: &'a dyn Codec,
    stringify: bool,
}

impl FieldVisitor for Collector<'_> {
    fn visit(&mut self, name: &'static str, shape: Shape, value: &dyn ToValue) -> OrmResult<()> {
        if matches!(self.depths.get(name), Some(&d) if d < self.depth) {
            return Ok(());
        }

        let mut value = value.to_value()?;
        if self.stringify && shape.is_complex() {
            value = stringify(value, self.codec)?;
        }
        self.depths.insert(name, self.depth);
        self.map.insert(name, value);
        Ok(())
    }

    fn descend(&mut self) {
        self.depth += 1;
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Build the field map of `record` for `tag`.
///
/// With `stringify`, complex fields are serialized with `codec` to text.
/// Otherwise they stay as [`Value::Json`].
pub fn to_field_map<T: Tagged + ?Sized>(
    record: &T,
    tag: &str,
    codec: &dyn Codec,
    stringify: bool,
) -> OrmResult<ValueMap> {
    let mut collector = Collector {
        map: ValueMap::with_capacity(T::fields().len()),
        depths: HashMap::new(),
        depth: 0,
        codec,
        stringify,
    };
    record.visit_fields(tag, &mut collector)?;
    Ok(collector.map)
}

/// Serialize every nested value of `map` to text.
pub fn stringify_map(mut map: ValueMap, codec: &dyn Codec) -> OrmResult<ValueMap> {
    for (_, value) in map.iter_mut() {
        if matches!(value, Value::Json(_)) {
            *value = stringify(std::mem::replace(value, Value::Null), codec)?;
        }
    }
    Ok(map)
}

fn stringify(value: Value, codec: &dyn Codec) -> OrmResult<Value> {
    match value {
        Value::Json(doc) => Ok(Value::Text(codec.encode(&doc)?)),
        other => Ok(other),
    }
}
