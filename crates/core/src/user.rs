//! Usernames, passwords and stored password digests.

use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

/// Minimum username length, in characters.
pub const USERNAME_MIN_LEN: usize = 3;

/// Maximum username length, in characters.
pub const USERNAME_MAX_LEN: usize = 20;

/// Minimum password length at registration, in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

/// A validated account name: 3-20 ASCII alphanumeric characters.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    /// Validate and wrap a username.
    pub fn parse(s: &str) -> Result<Self> {
        let len = s.chars().count();
        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
            return Err(Error::InvalidUsername(format!(
                "username length must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters long"
            )));
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidUsername(
                "username may only contain alphanumeric characters".to_string(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Debug for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Username({})", self.0)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A password that satisfies the registration policy.
///
/// Never printed; only its digest is stored.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    /// Validate a password chosen at registration.
    pub fn parse(s: &str) -> Result<Self> {
        if s.chars().count() < PASSWORD_MIN_LEN {
            return Err(Error::InvalidPassword(format!(
                "password must be at least {PASSWORD_MIN_LEN} characters long"
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn digest(&self) -> PasswordDigest {
        PasswordDigest::of(&self.0)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Password").field(&"<redacted>").finish()
    }
}

/// SHA-256 digest of a password, compared in constant time.
///
/// Unsalted: this keeps plaintext out of the store, it is not a password KDF.
#[derive(Clone)]
pub struct PasswordDigest([u8; 32]);

impl PasswordDigest {
    /// Digest an arbitrary candidate password.
    pub fn of(password: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Self(out)
    }

    /// Check a candidate password against this digest.
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = Self::of(candidate);
        bool::from(self.0[..].ct_eq(&candidate.0[..]))
    }

    #[cfg(test)]
    fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PasswordDigest")
            .field(&"<redacted>")
            .finish()
    }
}
