//! In-memory record store.
//!
//! [`MemoryStore`] stands in for a backend collection in simulated list
//! endpoints. The caller owns it outright; mutation goes through `&mut self`
//! and nothing is shared or global. Records are keyed by the normalized
//! value of an id field, so `5` and `"5"` address the same record.

use std::collections::HashMap;

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ListQueryError, Result};
use crate::id::{normalize_id, normalize_value};
use crate::params::QueryParams;
use crate::query::query;
use crate::record::Record;
use crate::result::QueryResult;
use crate::value::FilterValue;

/// Insertion-ordered collection of records keyed by normalized id.
///
/// ```
/// use listquery::{EngineConfig, MemoryStore, QueryParams};
/// use serde_json::json;
///
/// let mut store = MemoryStore::new("id");
/// store.insert(json!({"id": 1, "name": "Alpha"})).unwrap();
/// store.insert(json!({"id": "2", "name": "Beta"})).unwrap();
///
/// assert_eq!(store.get(2).map(|r| r["name"].clone()), Some(json!("Beta")));
///
/// let page = store.list(&QueryParams::new().set("name", "alp"), &EngineConfig::new());
/// assert_eq!(page.total, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    id_field: String,
    records: Vec<T>,
    positions: HashMap<String, usize>,
}

impl<T: Record> MemoryStore<T> {
    /// Creates an empty store keyed by `id_field`.
    pub fn new(id_field: impl Into<String>) -> Self {
        MemoryStore {
            id_field: id_field.into(),
            records: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Creates a store seeded with records, in order.
    ///
    /// Fails on the first record without an id or with a duplicate id.
    pub fn with_records<I>(id_field: impl Into<String>, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut store = MemoryStore::new(id_field);
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// The field records are keyed by.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Returns `true` if a record with this id is stored.
    pub fn contains(&self, id: impl Into<FilterValue>) -> bool {
        self.positions.contains_key(&normalize_id(id))
    }

    /// Adds a record, returning its normalized id.
    pub fn insert(&mut self, record: T) -> Result<String> {
        let key = self.key_of(&record)?;
        if self.positions.contains_key(&key) {
            return Err(ListQueryError::DuplicateId(key));
        }
        self.positions.insert(key.clone(), self.records.len());
        self.records.push(record);
        debug!(id = %key, len = self.records.len(), "record inserted");
        Ok(key)
    }

    /// Looks up a record by id.
    pub fn get(&self, id: impl Into<FilterValue>) -> Option<&T> {
        self.positions
            .get(&normalize_id(id))
            .map(|&index| &self.records[index])
    }

    /// Looks up a record by id, failing if it is absent.
    pub fn resolve(&self, id: impl Into<FilterValue>) -> Result<&T> {
        let key = normalize_id(id);
        self.positions
            .get(&key)
            .map(|&index| &self.records[index])
            .ok_or(ListQueryError::NotFound(key))
    }

    /// Edits a record in place.
    ///
    /// The edit must not change the record's id; if it does, the previous
    /// record is restored and an error returned.
    pub fn update<F>(&mut self, id: impl Into<FilterValue>, edit: F) -> Result<&T>
    where
        T: Clone,
        F: FnOnce(&mut T),
    {
        let key = normalize_id(id);
        let index = *self
            .positions
            .get(&key)
            .ok_or_else(|| ListQueryError::NotFound(key.clone()))?;

        let previous = self.records[index].clone();
        edit(&mut self.records[index]);

        let new_key = normalize_value(&self.records[index].field(&self.id_field));
        if new_key != key {
            self.records[index] = previous;
            return Err(if new_key.is_empty() {
                ListQueryError::MissingId {
                    field: self.id_field.clone(),
                }
            } else {
                ListQueryError::IdChanged {
                    from: key,
                    to: new_key,
                }
            });
        }
        debug!(id = %key, "record updated");
        Ok(&self.records[index])
    }

    /// Removes a record by id, preserving the order of the rest.
    pub fn remove(&mut self, id: impl Into<FilterValue>) -> Result<T> {
        let key = normalize_id(id);
        let index = self
            .positions
            .remove(&key)
            .ok_or_else(|| ListQueryError::NotFound(key.clone()))?;

        let record = self.records.remove(index);
        for position in self.positions.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }
        debug!(id = %key, len = self.records.len(), "record removed");
        Ok(record)
    }

    /// Runs the list query over the stored records.
    pub fn list(&self, params: &QueryParams, config: &EngineConfig) -> QueryResult<&T> {
        query(&self.records, params, config)
    }

    fn key_of(&self, record: &T) -> Result<String> {
        let key = normalize_value(&record.field(&self.id_field));
        if key.is_empty() {
            return Err(ListQueryError::MissingId {
                field: self.id_field.clone(),
            });
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> MemoryStore<serde_json::Value> {
        MemoryStore::with_records(
            "id",
            vec![
                json!({"id": 1, "name": "one"}),
                json!({"id": 2, "name": "two"}),
                json!({"id": 3, "name": "three"}),
            ],
        )
        .unwrap()
    }

    #[test]
    fn remove_reindexes_positions() {
        let mut store = seeded();
        let removed = store.remove("2").unwrap();
        assert_eq!(removed["name"], "two");

        assert_eq!(store.get(3).map(|r| &r["name"]), Some(&json!("three")));
        assert_eq!(store.get(1).map(|r| &r["name"]), Some(&json!("one")));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_rejects_id_change() {
        let mut store = seeded();
        let err = store
            .update(1, |record| record["id"] = json!(9))
            .unwrap_err();

        assert_eq!(
            err,
            ListQueryError::IdChanged {
                from: "1".to_string(),
                to: "9".to_string(),
            }
        );
        assert!(store.contains(1));
        assert!(!store.contains(9));
    }

    #[test]
    fn update_rejects_clearing_id() {
        let mut store = seeded();
        let err = store
            .update(1, |record| record["id"] = json!(null))
            .unwrap_err();

        assert!(matches!(err, ListQueryError::MissingId { .. }));
        assert_eq!(store.get(1).map(|r| &r["id"]), Some(&json!(1)));
    }
}
