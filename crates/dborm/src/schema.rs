//! Column-name to field resolution.
//!
//! A [`SchemaResolver`] memoizes one [`FieldIndex`] per (type, tag) pair. The
//! memo is tied to the resolver's [`NamingConvention`]; switching conventions
//! drops it and indexes are rebuilt on demand.

use crate::reflect::{Tagged, walk};
use crate::shape::Shape;
use heck::ToSnakeCase;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// How column names and tag names are normalized before matching.
#[derive(Clone, Default)]
pub enum NamingConvention {
    /// Case-insensitive match.
    #[default]
    Lowercase,
    /// Byte-for-byte match.
    Exact,
    /// `userName`, `UserName` and `user_name` all match.
    SnakeCase,
    /// Caller-supplied normalization.
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl NamingConvention {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Lowercase => name.to_lowercase(),
            Self::Exact => name.to_string(),
            Self::SnakeCase => name.to_snake_case(),
            Self::Custom(f) => f(name),
        }
    }
}

// Custom conventions are equal only when they share the same function.
impl PartialEq for NamingConvention {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Lowercase, Self::Lowercase)
            | (Self::Exact, Self::Exact)
            | (Self::SnakeCase, Self::SnakeCase) => true,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lowercase => f.write_str("Lowercase"),
            Self::Exact => f.write_str("Exact"),
            Self::SnakeCase => f.write_str("SnakeCase"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Where a column lands in the destination type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Path for [`Tagged::assign`].
    pub path: Vec<usize>,
    pub shape: Shape,
    depth: usize,
}

/// Normalized tag name → field path for one type.
#[derive(Debug)]
pub struct FieldIndex {
    target: &'static str,
    naming: NamingConvention,
    entries: HashMap<String, FieldEntry>,
}

impl FieldIndex {
    pub fn build<T: Tagged + ?Sized>(tag: &str, naming: NamingConvention) -> Self {
        let mut entries: HashMap<String, FieldEntry> = HashMap::new();
        walk(T::fields(), tag, &mut |name, path, depth, field| {
            let key = naming.apply(name);
            if matches!(entries.get(&key), Some(existing) if existing.depth < depth) {
                return;
            }
            entries.insert(
                key,
                FieldEntry {
                    path: path.to_vec(),
                    shape: field.shape,
                    depth,
                },
            );
        });

        Self {
            target: std::any::type_name::<T>(),
            naming,
            entries,
        }
    }

    /// Destination type name, for error messages.
    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn resolve(&self, column: &str) -> Option<&FieldEntry> {
        self.entries.get(&self.naming.apply(column))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Default)]
struct State {
    naming: NamingConvention,
    indexes: HashMap<(TypeId, String), Arc<FieldIndex>>,
}

/// Caller-owned memo of field indexes.
#[derive(Default)]
pub struct SchemaResolver {
    state: Mutex<State>,
}

impl SchemaResolver {
    pub fn new(naming: NamingConvention) -> Self {
        Self {
            state: Mutex::new(State {
                naming,
                indexes: HashMap::new(),
            }),
        }
    }

    pub fn naming(&self) -> NamingConvention {
        self.lock().naming.clone()
    }

    /// Switch conventions; a different convention drops every memoized index.
    pub fn set_naming(&self, naming: NamingConvention) {
        let mut state = self.lock();
        if state.naming != naming {
            state.naming = naming;
            state.indexes.clear();
        }
    }

    /// Drop every memoized index.
    pub fn reset(&self) {
        self.lock().indexes.clear();
    }

    /// Index of `T` under `tag`, built on first use.
    pub fn index<T: Tagged + 'static>(&self, tag: &str) -> Arc<FieldIndex> {
        let mut state = self.lock();
        let key = (TypeId::of::<T>(), tag.to_string());
        if let Some(index) = state.indexes.get(&key) {
            return Arc::clone(index);
        }
        let index = Arc::new(FieldIndex::build::<T>(tag, state.naming.clone()));
        state.indexes.insert(key, Arc::clone(&index));
        index
    }

    /// Number of memoized indexes.
    pub fn cached(&self) -> usize {
        self.lock().indexes.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SchemaResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("SchemaResolver")
            .field("naming", &state.naming)
            .field("cached", &state.indexes.len())
            .finish()
    }
}
