//! Accounts, sessions and per-owner files for Locker.
//!
//! This crate provides the data model on top of `locker-memdb`:
//! - Table layout and record types
//! - Account registration and authentication
//! - Session tokens
//! - Owner-scoped file storage

pub mod error;
pub mod models;
pub mod repos;
pub mod schema;

pub use error::{MetadataError, MetadataResult};
pub use repos::{AccountRegistry, FileVault, SessionAuthority, Stored};
pub use schema::Tables;

use locker_core::config::FilesConfig;
use locker_memdb::MemDb;
use std::sync::Arc;

/// The shared in-memory metadata store.
pub type MetadataStore = MemDb<Tables>;

/// Create an empty metadata store from configuration.
pub fn from_config(config: &FilesConfig) -> MetadataResult<Arc<MetadataStore>> {
    let tables = Tables::new(config.single_file_per_owner)?;
    tracing::info!(
        single_file_per_owner = config.single_file_per_owner,
        "Metadata store initialized"
    );
    Ok(Arc::new(MemDb::new(tables)))
}
