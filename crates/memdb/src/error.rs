//! Store error types.

use thiserror::Error;

/// Recoverable store errors.
///
/// Asking for an index a table does not have is not represented here: that is
/// a programming mistake and panics at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemDbError {
    #[error("unique index {table}.{index} already holds key {key:?}")]
    Constraint {
        table: &'static str,
        index: &'static str,
        key: Vec<String>,
    },

    #[error("record not found in table {table}")]
    NotFound { table: &'static str },

    #[error("invalid schema for table {table}: {reason}")]
    InvalidSchema { table: &'static str, reason: String },
}

/// Result type for store operations.
pub type MemDbResult<T> = std::result::Result<T, MemDbError>;
