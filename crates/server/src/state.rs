//! Application state shared across handlers.

use locker_core::config::AppConfig;
use locker_metadata::{AccountRegistry, FileVault, MetadataStore, SessionAuthority};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata store backing every service below.
    pub store: Arc<MetadataStore>,
    /// User accounts.
    pub accounts: AccountRegistry,
    /// Session tokens.
    pub sessions: SessionAuthority,
    /// Per-owner files.
    pub vault: FileVault,
}

impl AppState {
    /// Wire the services over one store.
    pub fn new(config: AppConfig, store: Arc<MetadataStore>) -> Self {
        let vault = FileVault::new(Arc::clone(&store), &config.files);
        Self {
            accounts: AccountRegistry::new(Arc::clone(&store)),
            sessions: SessionAuthority::new(Arc::clone(&store)),
            vault,
            store,
            config: Arc::new(config),
        }
    }

    /// Body limit for uploads, from `files.max_file_size`.
    pub fn upload_limit(&self) -> usize {
        usize::try_from(self.config.files.max_file_size).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_services_share_one_store() {
        let config = AppConfig::for_testing();
        let store = locker_metadata::from_config(&config.files).unwrap();
        let state = AppState::new(config, store);

        state.accounts.register("alice", "password1").unwrap();
        let user = state.accounts.authenticate("alice", "password1").unwrap();
        let session = state.sessions.create_session(&user).unwrap();
        assert_eq!(state.store.version(), 2);
        assert_eq!(state.sessions.resolve(Some(&session.token)).unwrap(), "alice");
    }

    #[test]
    fn test_upload_limit_follows_config() {
        let config = AppConfig::for_testing();
        let store = locker_metadata::from_config(&config.files).unwrap();
        let state = AppState::new(config, store);
        assert_eq!(state.upload_limit(), 1024 * 1024);
    }
}
