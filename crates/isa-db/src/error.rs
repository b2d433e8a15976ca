//! Errors raised while loading or querying the database.

use std::path::PathBuf;

use thiserror::Error;

/// Failure constructing or querying a [`crate::Database`].
#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be read.
    #[error("failed to read database {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The database document is not valid JSON for the record schema.
    #[cfg(feature = "serde")]
    #[error("malformed database document: {0}")]
    Json(#[from] serde_json::Error),
    /// Two enumerations share a name.
    #[error("duplicate enumeration '{0}'")]
    DuplicateEnum(String),
    /// A lookup named an enumeration that does not exist.
    #[error("unknown enumeration '{0}'")]
    UnknownEnum(String),
}

/// Result alias for database operations.
pub type DbResult<T> = Result<T, DbError>;
