//! Complex-type classification.
//!
//! A type is *complex* when its shape is a struct, map, sequence, or array and
//! has to travel through the wire as a serialized document. Sequences and
//! arrays of single bytes are the exception: they bind to a binary column
//! directly.
//!
//! The classification is a pure function of the type, resolved at compile time
//! through [`Classify::SHAPE`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Structural kind of a bindable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Bound directly to a driver parameter.
    Scalar,
    /// Byte sequence or byte array, bound as binary.
    Bytes,
    /// A struct with its own fields.
    Struct,
    /// A key/value map.
    Map,
    /// A growable sequence of non-byte elements.
    Sequence,
    /// A fixed-size array of non-byte elements.
    Array,
}

impl Shape {
    /// Whether values of this shape are serialized to text on write and
    /// deserialized from bytes on read.
    pub const fn is_complex(self) -> bool {
        matches!(
            self,
            Shape::Struct | Shape::Map | Shape::Sequence | Shape::Array
        )
    }
}

/// Static shape of a type.
pub trait Classify {
    /// Shape of this type.
    const SHAPE: Shape;

    /// True only for single-byte element types.
    const IS_BYTE: bool = false;
}

/// Shape of `T`, convenient where a const expression is awkward.
pub const fn shape_of<T: Classify + ?Sized>() -> Shape {
    T::SHAPE
}

/// Whether `T` is complex.
pub const fn is_complex<T: Classify + ?Sized>() -> bool {
    T::SHAPE.is_complex()
}

macro_rules! scalar {
    ($($ty:ty),* $(,)?) => {
        $(impl Classify for $ty {
            const SHAPE: Shape = Shape::Scalar;
        })*
    };
}

scalar!(
    i8,
    i16,
    i32,
    i64,
    isize,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    bool,
    char,
    String,
    str,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    uuid::Uuid,
    crate::value::Value,
);

impl<Tz: chrono::TimeZone> Classify for chrono::DateTime<Tz> {
    const SHAPE: Shape = Shape::Scalar;
}

impl Classify for u8 {
    const SHAPE: Shape = Shape::Scalar;
    const IS_BYTE: bool = true;
}

impl<T: Classify> Classify for Vec<T> {
    const SHAPE: Shape = if T::IS_BYTE {
        Shape::Bytes
    } else {
        Shape::Sequence
    };
}

impl<T: Classify> Classify for [T] {
    const SHAPE: Shape = if T::IS_BYTE {
        Shape::Bytes
    } else {
        Shape::Sequence
    };
}

impl<T: Classify, const N: usize> Classify for [T; N] {
    const SHAPE: Shape = if T::IS_BYTE {
        Shape::Bytes
    } else {
        Shape::Array
    };
}

impl<T: Classify> Classify for HashSet<T> {
    const SHAPE: Shape = Shape::Sequence;
}

impl<T: Classify> Classify for BTreeSet<T> {
    const SHAPE: Shape = Shape::Sequence;
}

impl<K, V, S> Classify for HashMap<K, V, S> {
    const SHAPE: Shape = Shape::Map;
}

impl<K, V> Classify for BTreeMap<K, V> {
    const SHAPE: Shape = Shape::Map;
}

impl Classify for serde_json::Value {
    const SHAPE: Shape = Shape::Map;
}

// Indirection does not change the shape.
impl<T: Classify> Classify for Option<T> {
    const SHAPE: Shape = T::SHAPE;
}

impl<T: Classify + ?Sized> Classify for Box<T> {
    const SHAPE: Shape = T::SHAPE;
}

impl<T: Classify + ?Sized> Classify for &T {
    const SHAPE: Shape = T::SHAPE;
}
