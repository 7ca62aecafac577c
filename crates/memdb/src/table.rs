//! Copy-on-write tables.
//!
//! A table keeps its rows in a persistent map keyed by the primary index and
//! one persistent ordered set of `(secondary key, primary key)` pairs per
//! secondary index. Clones share structure: cloning a table for a new write
//! transaction is O(1) and each insert or delete copies only the O(log n)
//! nodes on its path.

use crate::error::{MemDbError, MemDbResult};
use crate::schema::{IndexKey, IndexSchema, TableSchema};
use imbl::{OrdMap, OrdSet};
use std::sync::Arc;

type Rows<R> = OrdMap<IndexKey, Arc<R>>;
type Entries = OrdSet<(IndexKey, IndexKey)>;

#[derive(Clone, Copy)]
enum Slot {
    Primary,
    Secondary(usize),
}

/// A typed table of records of type `R`.
pub struct Table<R> {
    schema: Arc<TableSchema<R>>,
    rows: Rows<R>,
    secondary: Vec<Entries>,
}

impl<R> Clone for Table<R> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            rows: self.rows.clone(),
            secondary: self.secondary.clone(),
        }
    }
}

/// Records matching an index prefix, in index order.
///
/// Borrows the snapshot of the transaction that produced it.
pub struct Scan<'a, R> {
    inner: Box<dyn Iterator<Item = &'a R> + 'a>,
}

impl<'a, R> Iterator for Scan<'a, R> {
    type Item = &'a R;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

fn owned(parts: &[&str]) -> IndexKey {
    parts.iter().map(|part| (*part).to_owned()).collect()
}

impl<R> Table<R> {
    /// Build an empty table, validating its schema.
    pub fn new(schema: TableSchema<R>) -> MemDbResult<Self> {
        schema.validate()?;
        let secondary = schema
            .secondary()
            .iter()
            .map(|_| Entries::new())
            .collect();
        Ok(Self {
            schema: Arc::new(schema),
            rows: Rows::new(),
            secondary,
        })
    }

    pub fn name(&self) -> &'static str {
        self.schema.name()
    }

    pub fn schema(&self) -> &TableSchema<R> {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[track_caller]
    fn resolve(&self, index: &str) -> (Slot, &IndexSchema<R>) {
        if self.schema.primary().name() == index {
            return (Slot::Primary, self.schema.primary());
        }
        match self
            .schema
            .secondary()
            .iter()
            .position(|candidate| candidate.name() == index)
        {
            Some(pos) => (Slot::Secondary(pos), &self.schema.secondary()[pos]),
            None => panic!("table `{}` has no index named `{index}`", self.name()),
        }
    }

    #[track_caller]
    pub(crate) fn get(&self, index: &str, key: &[&str]) -> Option<&R> {
        let (slot, schema) = self.resolve(index);
        assert!(
            key.len() == schema.arity(),
            "index `{}.{index}` takes {} key parts, got {}",
            self.name(),
            schema.arity(),
            key.len()
        );
        let key = owned(key);

        match slot {
            Slot::Primary => self.rows.get(&key).map(|row| &**row),
            Slot::Secondary(pos) => self.secondary[pos]
                .range((key.clone(), IndexKey::new())..)
                .next()
                .filter(|(found, _)| *found == key)
                .and_then(|(_, pk)| self.rows.get(pk))
                .map(|row| &**row),
        }
    }

    #[track_caller]
    pub(crate) fn scan<'a>(&'a self, index: &str, prefix: &[&str]) -> Scan<'a, R> {
        let (slot, schema) = self.resolve(index);
        assert!(
            prefix.len() <= schema.arity(),
            "index `{}.{index}` takes at most {} key parts, got {}",
            self.name(),
            schema.arity(),
            prefix.len()
        );
        let prefix = owned(prefix);

        let inner: Box<dyn Iterator<Item = &'a R> + 'a> = match slot {
            Slot::Primary => Box::new(
                self.rows
                    .range(prefix.clone()..)
                    .take_while(move |(key, _)| key.starts_with(&prefix))
                    .map(|(_, row)| &**row),
            ),
            Slot::Secondary(pos) => {
                let rows = &self.rows;
                Box::new(
                    self.secondary[pos]
                        .range((prefix.clone(), IndexKey::new())..)
                        .take_while(move |(key, _)| key.starts_with(&prefix))
                        .filter_map(move |(_, pk)| rows.get(pk))
                        .map(|row| &**row),
                )
            }
        };
        Scan { inner }
    }

    /// Insert or replace by primary key. Returns the replaced record.
    ///
    /// Unique secondary indexes are checked before anything is touched, so a
    /// constraint failure leaves the table unchanged.
    pub(crate) fn insert(&mut self, record: R) -> MemDbResult<Option<Arc<R>>> {
        let schema = Arc::clone(&self.schema);
        let pk = schema.primary().key(&record);
        let keys: Vec<IndexKey> = schema
            .secondary()
            .iter()
            .map(|index| index.key(&record))
            .collect();

        for (pos, (index, key)) in schema.secondary().iter().zip(&keys).enumerate() {
            if !index.is_unique() {
                continue;
            }
            let taken = self.secondary[pos]
                .range((key.clone(), IndexKey::new())..)
                .take_while(|(found, _)| found == key)
                .any(|(_, owner)| *owner != pk);
            if taken {
                return Err(MemDbError::Constraint {
                    table: schema.name(),
                    index: index.name(),
                    key: key.clone(),
                });
            }
        }

        let previous = self.rows.insert(pk.clone(), Arc::new(record));
        if let Some(previous) = &previous {
            self.unindex(&pk, previous);
        }
        for (pos, key) in keys.into_iter().enumerate() {
            self.secondary[pos].insert((key, pk.clone()));
        }
        Ok(previous)
    }

    /// Remove the stored record sharing `record`'s primary key.
    pub(crate) fn delete(&mut self, record: &R) -> MemDbResult<Arc<R>> {
        let pk = self.schema.primary().key(record);
        self.remove_key(&pk).ok_or(MemDbError::NotFound { table: self.name() })
    }

    /// Remove every record matching an index prefix.
    #[track_caller]
    pub(crate) fn delete_all(&mut self, index: &str, prefix: &[&str]) -> usize {
        let (slot, schema) = self.resolve(index);
        assert!(
            prefix.len() <= schema.arity(),
            "index `{}.{index}` takes at most {} key parts, got {}",
            self.name(),
            schema.arity(),
            prefix.len()
        );
        let prefix = owned(prefix);

        let doomed: Vec<IndexKey> = match slot {
            Slot::Primary => self
                .rows
                .range(prefix.clone()..)
                .take_while(|(key, _)| key.starts_with(&prefix))
                .map(|(key, _)| key.clone())
                .collect(),
            Slot::Secondary(pos) => self.secondary[pos]
                .range((prefix.clone(), IndexKey::new())..)
                .take_while(|(key, _)| key.starts_with(&prefix))
                .map(|(_, pk)| pk.clone())
                .collect(),
        };

        doomed
            .iter()
            .filter(|pk| self.remove_key(pk).is_some())
            .count()
    }

    fn remove_key(&mut self, pk: &IndexKey) -> Option<Arc<R>> {
        let removed = self.rows.remove(pk)?;
        self.unindex(pk, &removed);
        Some(removed)
    }

    fn unindex(&mut self, pk: &IndexKey, row: &R) {
        let schema = Arc::clone(&self.schema);
        for (pos, index) in schema.secondary().iter().enumerate() {
            self.secondary[pos].remove(&(index.key(row), pk.clone()));
        }
    }
}
