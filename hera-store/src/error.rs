//! Error types for the store layer.

use hera_model::{AttributeParseError, TransactionStatus};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed input (empty required field, wrong shape). A caller bug,
    /// never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// The referenced record does not exist or is inactive.
    #[error("not found: {0}")]
    NotFound(String),

    /// A write was rejected by a uniqueness check (entity code, transaction
    /// number). The caller may resubmit with corrected data.
    #[error("duplicate: {0}")]
    DuplicateCode(String),

    /// A transaction status change violates the configured workflow.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: TransactionStatus,
        to: TransactionStatus,
    },

    /// An attribute value could not be parsed as its declared type.
    #[error(transparent)]
    ValueParse(#[from] AttributeParseError),

    /// Underlying SQLite failure (connection, constraint not otherwise
    /// classified). Transient classes may be retried with backoff.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row could not be decoded (corrupt id or status column).
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// True when the error is a SQLite constraint violation (unique index hit).
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
