//! Table layout of the metadata store.

use crate::error::MetadataResult;
use crate::models::{FileRow, SessionRow, UserRow};
use locker_memdb::{HasTable, IndexSchema, Table, TableSchema};

/// Primary index of every table.
pub const ID_INDEX: &str = "id";

/// Secondary index of `files` on the owning username.
pub const OWNER_INDEX: &str = "owner";

/// The three metadata tables.
#[derive(Clone)]
pub struct Tables {
    users: Table<UserRow>,
    sessions: Table<SessionRow>,
    files: Table<FileRow>,
}

impl Tables {
    /// Build empty tables.
    ///
    /// With `single_file_per_owner` the `files.owner` index is unique, so an
    /// owner holds at most one file.
    pub fn new(single_file_per_owner: bool) -> MetadataResult<Self> {
        let users = Table::new(TableSchema::new(
            "users",
            IndexSchema::<UserRow>::unique(ID_INDEX).field("username", |u| u.username.as_str()),
        ))?;

        let sessions = Table::new(TableSchema::new(
            "sessions",
            IndexSchema::<SessionRow>::unique(ID_INDEX).field("token", |s| s.token.as_str()),
        ))?;

        let owner = if single_file_per_owner {
            IndexSchema::<FileRow>::unique(OWNER_INDEX)
        } else {
            IndexSchema::<FileRow>::non_unique(OWNER_INDEX)
        };
        let files = Table::new(
            TableSchema::new(
                "files",
                IndexSchema::<FileRow>::unique(ID_INDEX)
                    .field("filename", |f| f.filename.as_str())
                    .field("owner", |f| f.owner.as_str()),
            )
            .index(owner.field("owner", |f| f.owner.as_str())),
        )?;

        Ok(Self {
            users,
            sessions,
            files,
        })
    }
}

impl HasTable<UserRow> for Tables {
    fn table(&self) -> &Table<UserRow> {
        &self.users
    }

    fn table_mut(&mut self) -> &mut Table<UserRow> {
        &mut self.users
    }
}

impl HasTable<SessionRow> for Tables {
    fn table(&self) -> &Table<SessionRow> {
        &self.sessions
    }

    fn table_mut(&mut self) -> &mut Table<SessionRow> {
        &mut self.sessions
    }
}

impl HasTable<FileRow> for Tables {
    fn table(&self) -> &Table<FileRow> {
        &self.files
    }

    fn table_mut(&mut self) -> &mut Table<FileRow> {
        &mut self.files
    }
}
