//! The shared store handle.

use crate::txn::{ReadTxn, WriteTxn};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// A published, immutable version of every table.
pub(crate) struct Snapshot<T> {
    pub(crate) version: u64,
    pub(crate) tables: T,
}

/// An in-memory store over a set of tables `T`.
///
/// `T` is a plain struct of [`crate::Table`] fields implementing
/// [`crate::HasTable`] for each record type. Readers share the latest
/// published snapshot; at most one writer is active at a time.
pub struct MemDb<T> {
    root: RwLock<Arc<Snapshot<T>>>,
    writer: Mutex<()>,
}

impl<T: Clone> MemDb<T> {
    /// Create a store whose initial snapshot (version 0) holds `tables`.
    pub fn new(tables: T) -> Self {
        Self {
            root: RwLock::new(Arc::new(Snapshot {
                version: 0,
                tables,
            })),
            writer: Mutex::new(()),
        }
    }

    /// Begin a read-only transaction on the current snapshot. Never blocks on
    /// writers.
    pub fn read(&self) -> ReadTxn<T> {
        ReadTxn::new(self.current())
    }

    /// Begin a write transaction, waiting for any active writer to finish.
    ///
    /// Calling this while the same thread already holds a write transaction
    /// deadlocks.
    pub fn write(&self) -> WriteTxn<'_, T> {
        let guard = self.writer.lock();
        let base = self.current();
        WriteTxn::new(self, guard, &base)
    }

    /// Version of the latest committed snapshot.
    pub fn version(&self) -> u64 {
        self.root.read().version
    }

    fn current(&self) -> Arc<Snapshot<T>> {
        Arc::clone(&self.root.read())
    }
}

impl<T> MemDb<T> {
    pub(crate) fn publish(&self, snapshot: Snapshot<T>) {
        *self.root.write() = Arc::new(snapshot);
    }
}
