//! Owner-scoped file storage.

use crate::MetadataStore;
use crate::error::{MetadataError, MetadataResult};
use crate::models::FileRow;
use crate::schema::{ID_INDEX, OWNER_INDEX};
use bytes::Bytes;
use locker_core::config::FilesConfig;
use locker_core::{Filename, content_type_or_default};
use std::sync::Arc;
use time::OffsetDateTime;

/// Outcome of a successful [`FileVault::store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stored {
    pub filename: String,
    pub size: usize,
    /// A file with the same name and owner was overwritten.
    pub replaced: bool,
    /// Other files of the owner removed to honour the one-file-per-owner rule.
    pub superseded: Vec<String>,
    /// Store version at which the upload became visible.
    pub version: u64,
}

/// Stores and serves files, each visible only to its owner.
#[derive(Clone)]
pub struct FileVault {
    store: Arc<MetadataStore>,
    max_file_size: u64,
    single_file_per_owner: bool,
}

impl FileVault {
    pub fn new(store: Arc<MetadataStore>, config: &FilesConfig) -> Self {
        Self {
            store,
            max_file_size: config.max_file_size,
            single_file_per_owner: config.single_file_per_owner,
        }
    }

    /// Store `data` as `filename` for `owner`, replacing any file of that name.
    ///
    /// When each owner holds a single file, the owner's other files are
    /// removed in the same transaction.
    pub fn store(
        &self,
        owner: &str,
        filename: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> MetadataResult<Stored> {
        let filename = Filename::parse(filename)?;
        if data.is_empty() {
            return Err(locker_core::Error::InvalidFile("file is empty".to_string()).into());
        }
        if data.len() as u64 > self.max_file_size {
            return Err(locker_core::Error::InvalidFile(format!(
                "file of {} bytes exceeds the {} byte limit",
                data.len(),
                self.max_file_size
            ))
            .into());
        }

        let mut txn = self.store.write();
        let replaced = txn
            .get::<FileRow>(ID_INDEX, &[filename.as_str(), owner])
            .is_some();
        let mut superseded = Vec::new();
        if self.single_file_per_owner {
            superseded = txn
                .scan::<FileRow>(OWNER_INDEX, &[owner])
                .filter(|file| file.filename != filename.as_str())
                .map(|file| file.filename.clone())
                .collect();
            txn.delete_all::<FileRow>(OWNER_INDEX, &[owner]);
        }

        let size = data.len();
        txn.insert(FileRow {
            filename: filename.as_str().to_string(),
            owner: owner.to_string(),
            content_type: content_type_or_default(content_type),
            data,
            uploaded_at: OffsetDateTime::now_utc(),
        })?;
        let version = txn.commit();

        tracing::info!(
            owner = %owner,
            filename = %filename,
            size,
            replaced,
            superseded = superseded.len(),
            version,
            "File stored"
        );
        Ok(Stored {
            filename: filename.into_inner(),
            size,
            replaced,
            superseded,
            version,
        })
    }

    /// Fetch one of `owner`'s files.
    pub fn fetch(&self, owner: &str, filename: &str) -> MetadataResult<FileRow> {
        self.store
            .read()
            .get::<FileRow>(ID_INDEX, &[filename, owner])
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(format!("file {filename}")))
    }

    /// Delete one of `owner`'s files.
    pub fn remove(&self, owner: &str, filename: &str) -> MetadataResult<()> {
        let mut txn = self.store.write();
        let Some(file) = txn.get::<FileRow>(ID_INDEX, &[filename, owner]).cloned() else {
            return Err(MetadataError::NotFound(format!("file {filename}")));
        };
        txn.delete(&file)?;
        let version = txn.commit();

        tracing::info!(owner = %owner, filename = %filename, version, "File removed");
        Ok(())
    }

    /// Names of `owner`'s files, in index order.
    pub fn list(&self, owner: &str) -> Vec<String> {
        self.store
            .read()
            .scan::<FileRow>(OWNER_INDEX, &[owner])
            .map(|file| file.filename.clone())
            .collect()
    }
}
