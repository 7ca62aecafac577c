//! Session issue and resolution.

use crate::MetadataStore;
use crate::error::{MetadataError, MetadataResult};
use crate::models::{SessionRow, UserRow};
use crate::schema::ID_INDEX;
use locker_core::SessionToken;
use std::sync::Arc;
use time::OffsetDateTime;

/// Issues session tokens and maps them back to usernames.
#[derive(Clone)]
pub struct SessionAuthority {
    store: Arc<MetadataStore>,
}

impl SessionAuthority {
    pub fn new(store: Arc<MetadataStore>) -> Self {
        Self { store }
    }

    /// Issue a new session for an authenticated user.
    pub fn create_session(&self, user: &UserRow) -> MetadataResult<SessionRow> {
        let mut txn = self.store.write();
        if txn.get::<UserRow>(ID_INDEX, &[user.username.as_str()]).is_none() {
            return Err(MetadataError::NotFound(format!("user {}", user.username)));
        }

        let token = loop {
            let candidate = SessionToken::generate();
            if txn.get::<SessionRow>(ID_INDEX, &[candidate.as_str()]).is_none() {
                break candidate;
            }
            tracing::warn!(token = ?candidate, "Session token collision, regenerating");
        };

        let session = SessionRow {
            token: token.into_inner(),
            username: user.username.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        txn.insert(session.clone())?;
        let version = txn.commit();

        tracing::info!(username = %session.username, version, "Session created");
        Ok(session)
    }

    /// Resolve a presented token to the username it acts for.
    pub fn resolve(&self, token: Option<&str>) -> MetadataResult<String> {
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(MetadataError::MissingToken),
        };
        self.store
            .read()
            .get::<SessionRow>(ID_INDEX, &[token])
            .map(|session| session.username.clone())
            .ok_or(MetadataError::InvalidToken)
    }

    /// Number of sessions ever issued.
    pub fn count(&self) -> usize {
        self.store.read().count::<SessionRow>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccountRegistry;
    use locker_core::config::FilesConfig;
    use std::collections::HashSet;

    fn setup() -> (AccountRegistry, SessionAuthority) {
        let store = crate::from_config(&FilesConfig::default()).unwrap();
        (
            AccountRegistry::new(Arc::clone(&store)),
            SessionAuthority::new(store),
        )
    }

    #[test]
    fn test_fresh_session_resolves_to_its_user() {
        let (accounts, sessions) = setup();
        accounts.register("alice", "password1").unwrap();
        let user = accounts.authenticate("alice", "password1").unwrap();

        let session = sessions.create_session(&user).unwrap();
        assert_eq!(session.username, "alice");
        assert_eq!(sessions.resolve(Some(&session.token)).unwrap(), "alice");
    }

    #[test]
    fn test_tokens_are_never_reissued() {
        let (accounts, sessions) = setup();
        accounts.register("alice", "password1").unwrap();
        let user = accounts.get("alice").unwrap();

        let tokens: HashSet<_> = (0..64)
            .map(|_| sessions.create_session(&user).unwrap().token)
            .collect();
        assert_eq!(tokens.len(), 64);
        assert_eq!(sessions.count(), 64);
    }

    #[test]
    fn test_missing_and_unknown_tokens() {
        let (_, sessions) = setup();
        assert_eq!(sessions.resolve(None), Err(MetadataError::MissingToken));
        assert_eq!(sessions.resolve(Some("")), Err(MetadataError::MissingToken));
        assert_eq!(
            sessions.resolve(Some("00000000-0000-4000-8000-000000000000")),
            Err(MetadataError::InvalidToken)
        );
    }

    #[test]
    fn test_session_for_unregistered_user_is_refused() {
        let (accounts, sessions) = setup();
        accounts.register("alice", "password1").unwrap();
        let mut ghost = accounts.get("alice").unwrap();
        ghost.username = "ghost".to_string();

        assert!(matches!(
            sessions.create_session(&ghost),
            Err(MetadataError::NotFound(_))
        ));
        assert_eq!(sessions.count(), 0);
    }
}
