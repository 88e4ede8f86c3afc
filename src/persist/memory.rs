//! Memory Adapter Module
//!
//! In-memory PersistenceAdapter with a configurable byte quota. Serves as the
//! reference adapter implementation and as the backend for tests.

use std::collections::HashMap;

use crate::persist::{PersistenceAdapter, QuotaExceeded};

// == Memory Adapter ==
/// Byte-quota-limited in-memory key-value store.
///
/// Usage is accounted as `key.len() + value.len()` per record. A `set` that
/// would push usage past the quota fails atomically, leaving any previous
/// value for the key in place.
#[derive(Debug)]
pub struct MemoryAdapter {
    /// Raw record storage
    records: HashMap<String, String>,
    /// Total bytes currently stored
    used_bytes: usize,
    /// Maximum total bytes allowed
    quota_bytes: usize,
}

impl MemoryAdapter {
    // == Constructor ==
    /// Creates a new adapter allowing up to `quota_bytes` of stored data.
    pub fn new(quota_bytes: usize) -> Self {
        Self {
            records: HashMap::new(),
            used_bytes: 0,
            quota_bytes,
        }
    }

    // == Used Bytes ==
    /// Returns the total bytes currently stored.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    // == Length ==
    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MemoryAdapter {
    /// An adapter with a 5 MB quota, mirroring common browser storage limits.
    fn default() -> Self {
        Self::new(5_242_880)
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn list(&self, prefix: &str) -> Vec<(String, String)> {
        self.records
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.records.get(key).cloned()
    }

    fn set(&mut self, key: &str, raw_value: &str) -> Result<(), QuotaExceeded> {
        let existing_bytes = self
            .records
            .get(key)
            .map(|value| key.len() + value.len())
            .unwrap_or(0);
        let new_bytes = key.len() + raw_value.len();

        let prospective = self.used_bytes - existing_bytes + new_bytes;
        if prospective > self.quota_bytes {
            return Err(QuotaExceeded);
        }

        self.records.insert(key.to_string(), raw_value.to_string());
        self.used_bytes = prospective;
        Ok(())
    }

    fn delete(&mut self, key: &str) {
        if let Some(value) = self.records.remove(key) {
            self.used_bytes -= key.len() + value.len();
        }
    }
}
