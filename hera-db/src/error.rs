//! Error types for connection management.

use thiserror::Error;

/// Result type for database-handle operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur opening or bootstrapping a database.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),

    /// Underlying SQLite error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Schema bootstrap failed.
    #[error("schema error: {0}")]
    Schema(String),
}
