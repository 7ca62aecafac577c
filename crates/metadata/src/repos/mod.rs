//! Services over the metadata tables.

pub mod accounts;
pub mod files;
pub mod sessions;

pub use accounts::AccountRegistry;
pub use files::{FileVault, Stored};
pub use sessions::SessionAuthority;
