//! Keyed row collections.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::DbError;

/// An ordered collection of rows keyed by `K`.
///
/// Serializes as a JSON object, so keys must serialize as strings (the
/// newtype IDs used throughout the marketplace do).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<K: Ord, V> {
    rows: BTreeMap<K, V>,
}

impl<K: Ord, V> Table<K, V> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// Insert or replace a row, returning the previous one.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.rows.insert(key, value)
    }

    /// Insert a row, failing if the key is already taken.
    pub fn insert_unique(&mut self, table: &'static str, key: K, value: V) -> Result<(), DbError>
    where
        K: Display,
    {
        if self.rows.contains_key(&key) {
            return Err(DbError::UniqueViolation {
                table,
                key: key.to_string(),
            });
        }
        self.rows.insert(key, value);
        Ok(())
    }

    /// Get a row by key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.rows.get(key)
    }

    /// Get a mutable row by key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.rows.get_mut(key)
    }

    /// Remove a row by key.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.rows.remove(key)
    }

    /// Check whether a key exists.
    pub fn contains(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    /// Find the first row matching `pred`.
    pub fn find(&self, mut pred: impl FnMut(&V) -> bool) -> Option<&V> {
        self.rows.values().find(|v| pred(v))
    }

    /// Find the key of the first row matching `pred`.
    pub fn find_key(&self, mut pred: impl FnMut(&V) -> bool) -> Option<&K> {
        self.rows.iter().find(|(_, v)| pred(v)).map(|(k, _)| k)
    }

    /// Remove every row matching `pred`, returning how many were removed.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&V) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, v| !pred(v));
        before - self.rows.len()
    }

    /// Iterate over rows in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.rows.values()
    }

    /// Iterate mutably over rows in key order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.rows.values_mut()
    }

    /// Iterate over `(key, row)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.rows.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<K: Ord, V> Default for Table<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_unique() {
        let mut table: Table<String, u32> = Table::new();
        table.insert_unique("t", "a".to_string(), 1).unwrap();

        let err = table.insert_unique("t", "a".to_string(), 2).unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { table: "t", .. }));
        assert_eq!(table.get(&"a".to_string()), Some(&1));
    }

    #[test]
    fn test_find_and_remove_where() {
        let mut table: Table<String, u32> = Table::new();
        table.insert("a".to_string(), 1);
        table.insert("b".to_string(), 2);
        table.insert("c".to_string(), 3);

        assert_eq!(table.find(|v| *v > 1), Some(&2));
        assert_eq!(table.find_key(|v| *v == 3), Some(&"c".to_string()));

        assert_eq!(table.remove_where(|v| v % 2 == 1), 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_serializes_as_object() {
        let mut table: Table<String, u32> = Table::new();
        table.insert("x".to_string(), 9);

        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"x":9}"#);

        let back: Table<String, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
