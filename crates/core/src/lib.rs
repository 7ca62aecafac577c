//! Core domain types and shared logic for Locker.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Usernames, passwords and password digests
//! - Opaque session tokens
//! - Filenames and content types
//! - Configuration

pub mod config;
pub mod error;
pub mod file;
pub mod session;
pub mod user;

pub use error::{Error, Result};
pub use file::{DEFAULT_CONTENT_TYPE, Filename, content_type_or_default};
pub use session::SessionToken;
pub use user::{Password, PasswordDigest, Username};

/// Default upper bound on stored file size: 32 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 32 * 1024 * 1024;
