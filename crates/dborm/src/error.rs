//! Error types for dborm

use thiserror::Error;

/// Result type alias for dborm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Boxed driver error, preserved as the `source` of execution failures.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of an [`OrmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong input shape: non-struct value, empty batch, empty column list.
    InputShape,
    /// Input and schema disagree: missing key field, unresolved column.
    SchemaMismatch,
    /// A complex value could not be encoded or decoded.
    Serialization,
    /// The executor (driver) failed.
    Execution,
    /// No rows matched. Read paths turn this into an empty result.
    NotFound,
}

/// Error types for database operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// The value does not serialize to a struct-like object
    #[error("expect struct, got {found}")]
    ExpectStruct { found: &'static str },

    /// SELECT was requested with no columns
    #[error("tags is empty for table '{table}'")]
    TagsEmpty { table: String },

    /// UPDATE was requested with nothing to SET
    #[error("update map is empty for table '{table}'")]
    EmptyUpdateMap { table: String },

    /// A declared key field is absent from the single-row update map
    #[error("field '{field}' not found in update map")]
    MissingKeyField { field: String },

    /// No key fields were given for an update
    #[error("update key fields are empty")]
    FieldsEmpty,

    /// An operation that needs at least one record got none
    #[error("records are empty")]
    RecordsEmpty,

    /// A record in a batch lacks a field every record must carry
    #[error("field '{field}' not found in record #{record}")]
    FieldNotFound { field: String, record: usize },

    /// A result column has no matching field in the destination type
    #[error("missing destination name '{column}' in {target}")]
    MissingDestinationField { column: String, target: &'static str },

    /// A scalar destination received more than one column
    #[error("scannable destination {target} expects 1 column, result has {got}")]
    ColumnCount { target: &'static str, got: usize },

    /// A named placeholder has no value in the argument map
    #[error("could not find name '{name}' in argument map")]
    MissingNamedArg { name: String },

    /// IN-clause construction or expansion failed
    #[error("in clause: {0}")]
    InClause(String),

    /// Invalid identifier
    #[error("invalid identifier: {0}")]
    Ident(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Driver failure before it has been tied to a statement
    #[error("Driver error: {0}")]
    Driver(#[source] DriverError),

    /// Statement execution failed
    #[error("statement failed: {source} (sql: {sql})")]
    Execution {
        sql: String,
        #[source]
        source: DriverError,
    },

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Wrap any driver error.
    pub fn driver<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Driver(Box::new(err))
    }

    /// Attach the statement text to a driver failure.
    ///
    /// Non-driver errors are returned unchanged.
    pub fn with_sql(self, sql: &str) -> Self {
        match self {
            Self::Driver(source) => Self::Execution {
                sql: sql.to_string(),
                source,
            },
            other => other,
        }
    }

    /// Re-label a decode error with the column it came from.
    pub(crate) fn in_column(self, column: &str) -> Self {
        match self {
            Self::Decode { message, .. } => Self::Decode {
                column: column.to_string(),
                message,
            },
            other => other,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ExpectStruct { .. }
            | Self::TagsEmpty { .. }
            | Self::EmptyUpdateMap { .. }
            | Self::FieldsEmpty
            | Self::RecordsEmpty
            | Self::ColumnCount { .. }
            | Self::InClause(_)
            | Self::Ident(_)
            | Self::Other(_) => ErrorKind::InputShape,
            Self::MissingKeyField { .. }
            | Self::FieldNotFound { .. }
            | Self::MissingDestinationField { .. }
            | Self::MissingNamedArg { .. }
            | Self::Decode { .. } => ErrorKind::SchemaMismatch,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Driver(_) | Self::Execution { .. } => ErrorKind::Execution,
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Boom;

    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("boom")
        }
    }

    impl std::error::Error for Boom {}

    #[test]
    fn with_sql_wraps_driver_errors_only() {
        let err = OrmError::driver(Boom).with_sql("DELETE FROM `t`");
        match &err {
            OrmError::Execution { sql, source } => {
                assert_eq!(sql, "DELETE FROM `t`");
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::Execution);
        assert!(std::error::Error::source(&err).is_some());

        let err = OrmError::RecordsEmpty.with_sql("SELECT 1");
        assert!(matches!(err, OrmError::RecordsEmpty));
    }

    #[test]
    fn kinds() {
        assert_eq!(
            OrmError::MissingKeyField { field: "id".into() }.kind(),
            ErrorKind::SchemaMismatch
        );
        assert_eq!(OrmError::RecordsEmpty.kind(), ErrorKind::InputShape);
        assert_eq!(
            OrmError::Serialization("x".into()).kind(),
            ErrorKind::Serialization
        );
    }
}
