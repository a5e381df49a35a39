//! Error types for the ingest pipeline
//!
//! One domain error enum covers the whole run: input problems surface
//! before any table is touched, lock contention is retried and only
//! reported once exhausted, and every other storage failure propagates
//! unchanged.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The input file could not be read, or its content is not valid JSON.
    #[error("malformed input '{}': {message}", .path.display())]
    MalformedInput { path: PathBuf, message: String },

    /// The parsed document is not an object or an array of objects.
    #[error("invalid document structure: {0}")]
    InvalidStructure(String),

    /// Two distinct keys of one record map to the same column, which
    /// would silently drop one of the values.
    #[error("keys '{first}' and '{second}' both sanitize to column '{column}'")]
    ColumnCollision {
        first: String,
        second: String,
        column: String,
    },

    /// A data key sanitizes to the surrogate primary key name.
    #[error("key '{0}' sanitizes to the reserved column 'row_id'")]
    ReservedColumn(String),

    /// The database stayed locked through every configured attempt.
    #[error("database still locked after {attempts} attempts")]
    Locked {
        attempts: u32,
        #[source]
        source: rusqlite::Error,
    },

    /// Any other storage failure; never retried.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}
