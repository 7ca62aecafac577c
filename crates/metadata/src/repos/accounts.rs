//! Account registration and authentication.

use crate::MetadataStore;
use crate::error::{MetadataError, MetadataResult};
use crate::models::UserRow;
use crate::schema::ID_INDEX;
use locker_core::{Password, Username};
use std::sync::Arc;
use time::OffsetDateTime;

/// Registry of user accounts.
#[derive(Clone)]
pub struct AccountRegistry {
    store: Arc<MetadataStore>,
}

impl AccountRegistry {
    pub fn new(store: Arc<MetadataStore>) -> Self {
        Self { store }
    }

    /// Create an account.
    ///
    /// The existence check and the insert share one write transaction, so of
    /// several concurrent registrations of a name exactly one succeeds.
    pub fn register(&self, username: &str, password: &str) -> MetadataResult<()> {
        let username = Username::parse(username)?;
        let password = Password::parse(password)?;

        let mut txn = self.store.write();
        if txn.get::<UserRow>(ID_INDEX, &[username.as_str()]).is_some() {
            return Err(MetadataError::AlreadyExists(format!("user {username}")));
        }
        txn.insert(UserRow {
            username: username.as_str().to_string(),
            password: password.digest(),
            created_at: OffsetDateTime::now_utc(),
        })?;
        let version = txn.commit();

        tracing::info!(username = %username, version, "User registered");
        Ok(())
    }

    /// Check a username and password.
    ///
    /// Unknown users and wrong passwords fail with the same error.
    pub fn authenticate(&self, username: &str, password: &str) -> MetadataResult<UserRow> {
        let txn = self.store.read();
        match txn.get::<UserRow>(ID_INDEX, &[username]) {
            Some(user) if user.password.matches(password) => Ok(user.clone()),
            _ => {
                tracing::debug!(username = %username, "Authentication failed");
                Err(MetadataError::InvalidCredentials)
            }
        }
    }

    /// Look up an account by name.
    pub fn get(&self, username: &str) -> Option<UserRow> {
        self.store
            .read()
            .get::<UserRow>(ID_INDEX, &[username])
            .cloned()
    }

    /// Number of registered accounts.
    pub fn count(&self) -> usize {
        self.store.read().count::<UserRow>()
    }
}
