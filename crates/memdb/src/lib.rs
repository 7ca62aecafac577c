//! In-memory transactional store for Locker.
//!
//! This crate provides:
//! - Typed tables with a unique primary index and any number of secondary
//!   indexes, each over one field or an ordered compound of fields
//! - Snapshot-isolated read transactions that never block on writers
//! - Single-writer write transactions over copy-on-write tables, published
//!   atomically on commit
//!
//! Tables are selected by record type through [`HasTable`], so a lookup can
//! never name a table that does not exist or yield a record of the wrong type.

pub mod db;
pub mod error;
pub mod schema;
pub mod table;
pub mod txn;

pub use db::MemDb;
pub use error::{MemDbError, MemDbResult};
pub use schema::{FieldFn, IndexKey, IndexSchema, TableSchema};
pub use table::{Scan, Table};
pub use txn::{HasTable, ReadTxn, WriteTxn};
