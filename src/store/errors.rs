//! Store error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::engine::ParentNotFound;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the persistence backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert named a top-level parent that does not exist.
    #[error("parent phase not found: {0}")]
    ParentNotFound(String),

    /// The relational schema models one level of nesting; deeper
    /// records cannot be stored there.
    #[error("record nesting exceeds the one level the database schema supports")]
    NestingTooDeep,

    /// Underlying file I/O failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored document could not be parsed or serialized.
    #[error("invalid record document: {0}")]
    Serde(#[from] serde_json::Error),

    /// SQLite failure.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_owned(),
            source,
        }
    }
}

impl From<ParentNotFound> for StoreError {
    fn from(err: ParentNotFound) -> Self {
        Self::ParentNotFound(err.0)
    }
}
