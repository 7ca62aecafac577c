//! Metadata store error types.

use locker_memdb::MemDbError;
use thiserror::Error;

/// Metadata operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("missing session token")]
    MissingToken,

    #[error("invalid session token")]
    InvalidToken,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<MemDbError> for MetadataError {
    fn from(err: MemDbError) -> Self {
        match err {
            MemDbError::Constraint { table, index, key } => MetadataError::Constraint(format!(
                "{table}.{index} already holds key [{}]",
                key.join(", ")
            )),
            MemDbError::NotFound { table } => {
                MetadataError::NotFound(format!("record in {table}"))
            }
            MemDbError::InvalidSchema { table, reason } => {
                MetadataError::Config(format!("invalid schema for {table}: {reason}"))
            }
        }
    }
}

impl From<locker_core::Error> for MetadataError {
    fn from(err: locker_core::Error) -> Self {
        MetadataError::Validation(err.to_string())
    }
}

/// Result type for metadata operations.
pub type MetadataResult<T> = std::result::Result<T, MetadataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_error_names_table_and_index() {
        let err = MetadataError::from(MemDbError::Constraint {
            table: "files",
            index: "owner",
            key: vec!["alice".to_string()],
        });
        assert_eq!(
            err.to_string(),
            "constraint violation: files.owner already holds key [alice]"
        );
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err = MetadataError::from(MemDbError::NotFound { table: "files" });
        assert!(matches!(err, MetadataError::NotFound(_)));
    }

    #[test]
    fn test_core_errors_become_validation() {
        let err = MetadataError::from(locker_core::Error::InvalidFilename(
            "filename is empty".to_string(),
        ));
        assert_eq!(
            err,
            MetadataError::Validation("invalid filename: filename is empty".to_string())
        );
    }
}
