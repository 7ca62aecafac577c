//! Table and index schemas.

use crate::error::{MemDbError, MemDbResult};
use std::collections::HashSet;

/// Ordered key components produced by an index.
pub type IndexKey = Vec<String>;

/// Extracts one key component from a record.
pub type FieldFn<R> = fn(&R) -> &str;

struct IndexField<R> {
    name: &'static str,
    extract: FieldFn<R>,
}

/// A named index over one field, or over several fields in order (compound).
pub struct IndexSchema<R> {
    name: &'static str,
    unique: bool,
    fields: Vec<IndexField<R>>,
}

impl<R> IndexSchema<R> {
    /// An index whose key identifies at most one record.
    pub fn unique(name: &'static str) -> Self {
        Self {
            name,
            unique: true,
            fields: Vec::new(),
        }
    }

    /// An index whose key may be shared by many records.
    pub fn non_unique(name: &'static str) -> Self {
        Self {
            name,
            unique: false,
            fields: Vec::new(),
        }
    }

    /// Append a key component. Components are compared in the order added.
    pub fn field(mut self, name: &'static str, extract: FieldFn<R>) -> Self {
        self.fields.push(IndexField { name, extract });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_compound(&self) -> bool {
        self.fields.len() > 1
    }

    /// Number of key components.
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Names of the indexed fields, in key order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub(crate) fn key(&self, record: &R) -> IndexKey {
        self.fields
            .iter()
            .map(|f| (f.extract)(record).to_owned())
            .collect()
    }
}

/// Schema of one table: a unique primary index plus any secondary indexes.
pub struct TableSchema<R> {
    name: &'static str,
    primary: IndexSchema<R>,
    secondary: Vec<IndexSchema<R>>,
}

impl<R> TableSchema<R> {
    pub fn new(name: &'static str, primary: IndexSchema<R>) -> Self {
        Self {
            name,
            primary,
            secondary: Vec::new(),
        }
    }

    /// Add a secondary index.
    pub fn index(mut self, index: IndexSchema<R>) -> Self {
        self.secondary.push(index);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check the schema is usable before any table is built from it.
    pub fn validate(&self) -> MemDbResult<()> {
        let invalid = |reason: String| MemDbError::InvalidSchema {
            table: self.name,
            reason,
        };

        if !self.primary.unique {
            return Err(invalid(format!(
                "primary index `{}` must be unique",
                self.primary.name
            )));
        }

        let mut seen = HashSet::new();
        for index in self.indexes() {
            if index.fields.is_empty() {
                return Err(invalid(format!("index `{}` has no fields", index.name)));
            }
            if !seen.insert(index.name) {
                return Err(invalid(format!("duplicate index name `{}`", index.name)));
            }
        }

        Ok(())
    }

    pub(crate) fn primary(&self) -> &IndexSchema<R> {
        &self.primary
    }

    pub(crate) fn secondary(&self) -> &[IndexSchema<R>] {
        &self.secondary
    }

    /// All indexes, primary first.
    pub fn indexes(&self) -> impl Iterator<Item = &IndexSchema<R>> + '_ {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        left: String,
        right: String,
    }

    fn pair() -> Pair {
        Pair {
            left: "l".to_string(),
            right: "r".to_string(),
        }
    }

    #[test]
    fn test_compound_key_follows_field_order() {
        let index = IndexSchema::<Pair>::unique("id")
            .field("right", |p| p.right.as_str())
            .field("left", |p| p.left.as_str());

        assert!(index.is_compound());
        assert_eq!(index.arity(), 2);
        assert_eq!(index.key(&pair()), vec!["r".to_string(), "l".to_string()]);
        assert_eq!(index.field_names().collect::<Vec<_>>(), ["right", "left"]);
    }

    #[test]
    fn test_validate_accepts_well_formed_schema() {
        let schema = TableSchema::new(
            "pairs",
            IndexSchema::<Pair>::unique("id").field("left", |p| p.left.as_str()),
        )
        .index(IndexSchema::<Pair>::non_unique("right").field("right", |p| p.right.as_str()));

        schema.validate().unwrap();
        assert_eq!(schema.indexes().count(), 2);
    }

    #[test]
    fn test_validate_rejects_non_unique_primary() {
        let schema = TableSchema::new(
            "pairs",
            IndexSchema::<Pair>::non_unique("id").field("left", |p| p.left.as_str()),
        );

        match schema.validate() {
            Err(MemDbError::InvalidSchema { table, reason }) => {
                assert_eq!(table, "pairs");
                assert!(reason.contains("must be unique"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_empty_and_duplicate_indexes() {
        let empty = TableSchema::<Pair>::new("pairs", IndexSchema::unique("id"));
        assert!(matches!(
            empty.validate(),
            Err(MemDbError::InvalidSchema { .. })
        ));

        let duplicate = TableSchema::new(
            "pairs",
            IndexSchema::<Pair>::unique("id").field("left", |p| p.left.as_str()),
        )
        .index(IndexSchema::<Pair>::unique("id").field("right", |p| p.right.as_str()));
        match duplicate.validate() {
            Err(MemDbError::InvalidSchema { reason, .. }) => {
                assert!(reason.contains("duplicate index name"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
