//! Records held in the metadata tables.

use bytes::Bytes;
use locker_core::PasswordDigest;
use time::OffsetDateTime;

/// A registered account. Never mutated or deleted.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub username: String,
    pub password: PasswordDigest,
    pub created_at: OffsetDateTime,
}

/// An issued session token and the account it acts for.
#[derive(Debug, Clone)]
pub struct SessionRow {
    pub token: String,
    pub username: String,
    pub created_at: OffsetDateTime,
}

/// A stored file, keyed by `(filename, owner)`.
#[derive(Clone)]
pub struct FileRow {
    pub filename: String,
    pub owner: String,
    pub content_type: String,
    pub data: Bytes,
    pub uploaded_at: OffsetDateTime,
}

impl FileRow {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl std::fmt::Debug for FileRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRow")
            .field("filename", &self.filename)
            .field("owner", &self.owner)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .field("uploaded_at", &self.uploaded_at)
            .finish()
    }
}
