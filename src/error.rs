use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Column, Record, Value};

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for storage adapter operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience result type for predicate parsing and query execution.
pub type QueryResult<T> = Result<T, QueryError>;

/// A single raw cell failed its typed-parse rule.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot coerce column '{column}': {message} (raw='{raw}')")]
pub struct CoercionError {
    /// Column whose rule rejected the value.
    pub column: Column,
    /// The offending raw cell text.
    pub raw: String,
    /// Human-readable reason.
    pub message: String,
}

impl CoercionError {
    pub(crate) fn new(column: Column, raw: &str, message: impl Into<String>) -> Self {
        Self {
            column,
            raw: raw.to_owned(),
            message: message.into(),
        }
    }
}

/// A second record carried an already-seen identity value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("duplicate {column} {value}: record {} ('{}') collides with an earlier record", .record.id, .record.title)]
pub struct DuplicateKeyError {
    /// Identity column that collided (`id` or `title`).
    pub column: Column,
    /// The colliding value.
    pub value: Value,
    /// The record that triggered the collision.
    pub record: Box<Record>,
}

/// Error type returned by ingestion functions.
///
/// Shared by CSV ingestion and parsed-artifact loading.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parsed-artifact (JSON) read/write error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not have the expected shape (missing header, unknown format, empty artifact).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A cell could not be coerced into its column type.
    #[error("row {row}: {source}")]
    Coercion {
        row: usize,
        #[source]
        source: CoercionError,
    },

    /// An identity field (`id` or `title`) was seen twice.
    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKeyError),
}

/// Error type returned by the storage adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite failure, including lock contention (`database is locked`).
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The store file or its parent directory could not be created.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema creation or population failed; any store file this call created has been removed.
    #[error("bootstrap of {path} failed: {source}")]
    Bootstrap {
        path: PathBuf,
        #[source]
        source: Box<StoreError>,
    },

    /// The store is empty and there is nothing to populate it from.
    #[error("store at {path} is empty and no population source was given")]
    MissingSource { path: PathBuf },

    /// The population source failed to ingest.
    #[error("population source rejected: {0}")]
    Ingestion(#[from] IngestionError),

    /// A persisted row does not decode into a [`Record`].
    #[error("corrupt row {rowid}: {source}")]
    CorruptRow {
        rowid: i64,
        #[source]
        source: CoercionError,
    },
}

/// Error type returned by predicate parsing and query execution.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The predicate names a column outside the catalog schema.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// The predicate uses an operator spelling that is not recognized.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// The operand does not fit the column's type.
    #[error("invalid operand for column '{column}': {message} (raw='{raw}')")]
    InvalidOperand {
        column: Column,
        raw: String,
        message: String,
    },

    /// A page was requested with a page size of zero.
    #[error("page size must be positive")]
    InvalidPageSize,

    /// Reading the backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
