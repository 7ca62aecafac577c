//! Read and write transactions.

use crate::db::{MemDb, Snapshot};
use crate::error::MemDbResult;
use crate::table::{Scan, Table};
use parking_lot::MutexGuard;
use std::sync::Arc;

/// Selects the table holding records of type `R` from a set of tables.
///
/// Implemented once per record type by the tables struct a [`MemDb`] is
/// built over, which is what makes table access strongly typed.
pub trait HasTable<R> {
    fn table(&self) -> &Table<R>;
    fn table_mut(&mut self) -> &mut Table<R>;
}

/// A read-only view of the snapshot that was current when it began.
///
/// Commits made after the transaction began are never visible through it.
pub struct ReadTxn<T> {
    snapshot: Arc<Snapshot<T>>,
}

impl<T> ReadTxn<T> {
    pub(crate) fn new(snapshot: Arc<Snapshot<T>>) -> Self {
        Self { snapshot }
    }

    /// Version of the snapshot being read.
    pub fn version(&self) -> u64 {
        self.snapshot.version
    }

    /// Point lookup. Every component of the index key must be supplied.
    #[track_caller]
    pub fn get<R>(&self, index: &str, key: &[&str]) -> Option<&R>
    where
        T: HasTable<R>,
    {
        HasTable::<R>::table(&self.snapshot.tables).get(index, key)
    }

    /// Records whose index key starts with `prefix`, in index order.
    #[track_caller]
    pub fn scan<R>(&self, index: &str, prefix: &[&str]) -> Scan<'_, R>
    where
        T: HasTable<R>,
    {
        HasTable::<R>::table(&self.snapshot.tables).scan(index, prefix)
    }

    /// Number of records in the table for `R`.
    pub fn count<R>(&self) -> usize
    where
        T: HasTable<R>,
    {
        HasTable::<R>::table(&self.snapshot.tables).len()
    }

    /// End the transaction. Equivalent to dropping it.
    pub fn abort(self) {}
}

/// An exclusive write transaction.
///
/// Holds the store's writer lock until committed or dropped. Writes go to a
/// private copy of the tables and become visible only on [`WriteTxn::commit`].
/// Dropping the transaction without committing discards them.
pub struct WriteTxn<'db, T> {
    db: &'db MemDb<T>,
    guard: MutexGuard<'db, ()>,
    base_version: u64,
    tables: T,
    dirty: bool,
}

impl<'db, T> WriteTxn<'db, T> {
    pub(crate) fn new(db: &'db MemDb<T>, guard: MutexGuard<'db, ()>, base: &Snapshot<T>) -> Self
    where
        T: Clone,
    {
        Self {
            db,
            guard,
            base_version: base.version,
            tables: base.tables.clone(),
            dirty: false,
        }
    }

    /// Version of the snapshot this transaction started from.
    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    /// Point lookup, including this transaction's own uncommitted writes.
    #[track_caller]
    pub fn get<R>(&self, index: &str, key: &[&str]) -> Option<&R>
    where
        T: HasTable<R>,
    {
        HasTable::<R>::table(&self.tables).get(index, key)
    }

    /// Prefix scan, including this transaction's own uncommitted writes.
    #[track_caller]
    pub fn scan<R>(&self, index: &str, prefix: &[&str]) -> Scan<'_, R>
    where
        T: HasTable<R>,
    {
        HasTable::<R>::table(&self.tables).scan(index, prefix)
    }

    pub fn count<R>(&self) -> usize
    where
        T: HasTable<R>,
    {
        HasTable::<R>::table(&self.tables).len()
    }

    /// Insert a record, replacing any record with the same primary key.
    ///
    /// Fails with [`crate::MemDbError::Constraint`] when a unique secondary
    /// index already maps the record's key to a different primary key.
    pub fn insert<R>(&mut self, record: R) -> MemDbResult<Option<Arc<R>>>
    where
        T: HasTable<R>,
    {
        let previous = HasTable::<R>::table_mut(&mut self.tables).insert(record)?;
        self.dirty = true;
        Ok(previous)
    }

    /// Delete the record sharing `record`'s primary key.
    pub fn delete<R>(&mut self, record: &R) -> MemDbResult<Arc<R>>
    where
        T: HasTable<R>,
    {
        let removed = HasTable::<R>::table_mut(&mut self.tables).delete(record)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Delete every record whose index key starts with `prefix`.
    #[track_caller]
    pub fn delete_all<R>(&mut self, index: &str, prefix: &[&str]) -> usize
    where
        T: HasTable<R>,
    {
        let removed = HasTable::<R>::table_mut(&mut self.tables).delete_all(index, prefix);
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Publish every write atomically and return the resulting version.
    ///
    /// A transaction that wrote nothing publishes nothing and returns the
    /// version it started from.
    pub fn commit(self) -> u64 {
        let Self {
            db,
            guard,
            base_version,
            tables,
            dirty,
        } = self;

        if !dirty {
            return base_version;
        }

        let version = base_version + 1;
        db.publish(Snapshot { version, tables });
        drop(guard);
        tracing::trace!(version, "write transaction committed");
        version
    }

    /// Discard every write. Equivalent to dropping the transaction.
    pub fn abort(self) {
        tracing::trace!(
            base_version = self.base_version,
            dirty = self.dirty,
            "write transaction aborted"
        );
    }
}
