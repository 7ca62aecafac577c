//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    #[error("invalid password: {0}")]
    InvalidPassword(String),

    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    #[error("invalid file: {0}")]
    InvalidFile(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
