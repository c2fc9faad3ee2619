use crate::graph::{Next, NodeProcessor};
use crate::schema::{Record, RecordSchema};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory store of merged records, keyed by identity column value.
///
/// Handed out as a service handle so other modules (and tests) can read what
/// the sink has aggregated. Real storage I/O is an external collaborator;
/// this is the merge point in front of it.
pub struct RecordStore {
    records: Mutex<HashMap<String, Record>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Record> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> HashMap<String, Record> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal node: aggregates same-key records by applying the schema's
/// per-column merge policy.
pub struct RecordMergeSink {
    schema: Arc<RecordSchema>,
    key_position: usize,
    store: Arc<RecordStore>,
}

impl RecordMergeSink {
    pub fn new(schema: Arc<RecordSchema>, key_position: usize) -> Self {
        Self::with_store(schema, key_position, Arc::new(RecordStore::new()))
    }

    /// Merge into a store owned by someone else (typically a storage module's
    /// service handle)
    pub fn with_store(
        schema: Arc<RecordSchema>,
        key_position: usize,
        store: Arc<RecordStore>,
    ) -> Self {
        Self {
            schema,
            key_position,
            store,
        }
    }

    /// Shared handle to the store this sink merges into
    pub fn store(&self) -> Arc<RecordStore> {
        Arc::clone(&self.store)
    }
}

impl NodeProcessor for RecordMergeSink {
    type Input = Record;
    type Output = ();

    fn process(&self, input: &Record, _next: &Next<()>) -> Result<()> {
        let key = input
            .get(self.key_position)
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                anyhow!(
                    "record for '{}' carries no identity key at position {}",
                    self.schema.table(),
                    self.key_position
                )
            })?
            .to_string();

        let mut records = self
            .store
            .records
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        match records.get_mut(&key) {
            Some(stored) => self.schema.merge(stored, input.clone())?,
            None => {
                records.insert(key, input.clone());
            }
        }
        Ok(())
    }
}
