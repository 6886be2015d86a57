//! Error types for imessage-wrapped-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the imessage-wrapped-core library
#[derive(Error, Debug)]
pub enum Error {
    /// The message database does not exist at the expected path
    #[error("database not found at {}", .0.display())]
    DatabaseNotFound(PathBuf),

    /// The message database exists but could not be opened or read
    #[error("can't open database at {}: {source}", path.display())]
    DatabaseAccess {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database error after the store was opened
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The store does not look like a Messages database
    #[error("unexpected database schema: {0}")]
    Schema(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Logging setup error
    #[error("logging error: {0}")]
    Logging(String),
}

impl Error {
    /// Whether this error means the store itself is missing or unreadable.
    ///
    /// These are fatal for a run and never retried.
    pub fn is_data_access(&self) -> bool {
        matches!(
            self,
            Error::DatabaseNotFound(_) | Error::DatabaseAccess { .. }
        )
    }
}

/// Result type alias for imessage-wrapped-core
pub type Result<T> = std::result::Result<T, Error>;
