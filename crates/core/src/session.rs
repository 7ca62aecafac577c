//! Session tokens.

use std::fmt;
use uuid::Uuid;

/// An opaque session token: a random UUIDv4 in canonical hyphenated form.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the first group; the rest is a bearer secret.
        let prefix = self.0.split('-').next().unwrap_or_default();
        write!(f, "SessionToken({prefix}-...)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_is_canonical_uuid_v4() {
        let token = SessionToken::generate();
        let parsed = Uuid::parse_str(token.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(parsed.hyphenated().to_string(), token.as_str());
        assert_eq!(token.as_str().len(), 36);
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }

    #[test]
    fn test_debug_hides_most_of_the_token() {
        let token = SessionToken("6f1c2e4a-0b6d-4c1e-9f3a-2d7e8b9c0a11".to_string());
        let debug = format!("{token:?}");
        assert_eq!(debug, "SessionToken(6f1c2e4a-...)");
        assert!(!debug.contains("2d7e8b9c0a11"));
    }
}
