//! Cache Store Module
//!
//! Main cache engine combining an in-memory index with durable storage
//! orchestration, schema versioning, and quota recovery.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::cache::entry::{current_timestamp_ms, CacheEntry, PersistedRecord};
use crate::cache::CacheStats;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::persist::{PersistenceAdapter, QuotaExceeded};

// == Put Outcome ==
/// Result of a successful `put`, reporting durability of the write.
///
/// A `MemoryOnly` outcome means the durable write was abandoned after quota
/// recovery failed; the entry is served from memory until it expires, and
/// durable storage may hold an older value for the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// Entry was written to both the index and durable storage
    Durable,
    /// Durable write failed even after the recovery sweep; index updated only
    MemoryOnly,
}

// == Cache Store ==
/// Durable-backed cache store with TTL expiration and schema versioning.
///
/// Generic over the payload type `T` and the durable backend `A`. The store
/// owns both the in-memory index and the adapter; all access goes through it.
#[derive(Debug)]
pub struct CacheStore<T, A> {
    /// In-memory index of live entries
    pub(crate) entries: HashMap<String, CacheEntry<T>>,
    /// Durable storage backend
    pub(crate) adapter: A,
    /// Cache configuration
    pub(crate) config: CacheConfig,
}

impl<T, A> CacheStore<T, A>
where
    T: Serialize + DeserializeOwned + Clone,
    A: PersistenceAdapter,
{
    // == Constructor ==
    /// Creates a new CacheStore over the given adapter.
    ///
    /// The store starts empty; call [`initialize`](Self::initialize) to load
    /// surviving records from durable storage.
    pub fn new(adapter: A, config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            adapter,
            config,
        }
    }

    // == Initialize ==
    /// Loads all durable records under the namespace prefix into the index.
    ///
    /// Each record is parsed and version-checked individually: malformed or
    /// version-mismatched records are deleted from durable storage without
    /// aborting the rest of the load. Finishes with an expiry sweep.
    ///
    /// # Returns
    /// The number of entries that survived the load.
    pub fn initialize(&mut self) -> usize {
        let prefix = self.key_prefix();

        for (durable_key, raw) in self.adapter.list(&prefix) {
            let key = durable_key[prefix.len()..].to_string();

            match serde_json::from_str::<PersistedRecord<T>>(&raw) {
                Ok(record) if record.schema_version == self.config.cache_version => {
                    let entry = CacheEntry {
                        data: record.data,
                        created_at_ms: record.created_at_ms,
                        ttl_ms: record.ttl_ms,
                        size_bytes: raw.len(),
                    };
                    self.entries.insert(key, entry);
                }
                Ok(record) => {
                    info!(
                        key = %key,
                        found = %record.schema_version,
                        expected = %self.config.cache_version,
                        "Purging entry persisted under a different cache version"
                    );
                    self.adapter.delete(&durable_key);
                }
                Err(err) => {
                    warn!(
                        error = %CacheError::CorruptEntry(durable_key.clone()),
                        cause = %err,
                        "Discarding unparseable durable record"
                    );
                    self.adapter.delete(&durable_key);
                }
            }
        }

        self.sweep_expired();

        let loaded = self.entries.len();
        info!(loaded, "Cache store initialized from durable storage");
        loaded
    }

    // == Get ==
    /// Retrieves an entry by key.
    ///
    /// Returns `None` if the key is absent or expired. An expired hit is
    /// removed from the index and durable storage as a side effect (lazy
    /// eviction).
    pub fn get(&mut self, key: &str) -> Option<CacheEntry<T>> {
        let expired = self.entries.get(key)?.is_expired();

        if expired {
            self.evict_key(key);
            return None;
        }

        self.entries.get(key).cloned()
    }

    // == Put ==
    /// Stores a value under a key, replacing any existing entry entirely.
    ///
    /// The serialized record size is checked against `max_entry_size_bytes`
    /// before anything is written. On a quota-exceeded durable write the
    /// store sweeps expired entries and retries exactly once; if the retry
    /// also fails, the entry is kept in memory only (see [`PutOutcome`]).
    ///
    /// # Arguments
    /// * `key` - The key to store under
    /// * `value` - The payload to cache
    /// * `ttl_ms` - Optional TTL in milliseconds (uses `default_ttl_ms` if None)
    ///
    /// # Errors
    /// [`CacheError::Serialization`] if the payload cannot be serialized,
    /// [`CacheError::OversizedEntry`] if the record exceeds the size limit.
    /// Neither touches the index or durable storage.
    pub fn put(&mut self, key: String, value: T, ttl_ms: Option<u64>) -> Result<PutOutcome> {
        let now = current_timestamp_ms();
        let effective_ttl = ttl_ms.unwrap_or(self.config.default_ttl_ms);

        let record = PersistedRecord {
            schema_version: self.config.cache_version.clone(),
            created_at_ms: now,
            ttl_ms: effective_ttl,
            data: value,
        };

        let raw = serde_json::to_string(&record).map_err(|source| CacheError::Serialization {
            key: key.clone(),
            source,
        })?;

        if raw.len() > self.config.max_entry_size_bytes {
            return Err(CacheError::OversizedEntry {
                key,
                size_bytes: raw.len(),
                limit_bytes: self.config.max_entry_size_bytes,
            });
        }

        let entry = CacheEntry {
            data: record.data,
            created_at_ms: now,
            ttl_ms: effective_ttl,
            size_bytes: raw.len(),
        };
        self.entries.insert(key.clone(), entry);

        Ok(self.write_durable(&key, &raw))
    }

    // == Durable Write ==
    /// Attempts the durable write with sweep-and-retry-once quota recovery.
    fn write_durable(&mut self, key: &str, raw: &str) -> PutOutcome {
        let durable_key = self.durable_key(key);

        match self.adapter.set(&durable_key, raw) {
            Ok(()) => PutOutcome::Durable,
            Err(QuotaExceeded) => {
                warn!(key, "Durable write hit storage quota, sweeping expired entries");
                self.sweep_expired();

                match self.adapter.set(&durable_key, raw) {
                    Ok(()) => {
                        info!(key, "Durable write succeeded after quota recovery");
                        PutOutcome::Durable
                    }
                    Err(QuotaExceeded) => {
                        warn!(
                            key,
                            "Durable write abandoned after retry; entry retained in memory only"
                        );
                        PutOutcome::MemoryOnly
                    }
                }
            }
        }
    }

    // == Remove ==
    /// Removes an entry from the index and durable storage.
    ///
    /// Removing a missing key is a no-op; this never fails.
    pub fn remove(&mut self, key: &str) {
        self.evict_key(key);
    }

    // == Clear ==
    /// Removes every entry under this store's namespace.
    ///
    /// Deletes all listed durable records, not just indexed ones, so records
    /// orphaned by an earlier failed write are cleaned up too.
    pub fn clear(&mut self) {
        let durable_keys: Vec<String> = self
            .adapter
            .list(&self.key_prefix())
            .into_iter()
            .map(|(key, _)| key)
            .collect();

        for durable_key in durable_keys {
            self.adapter.delete(&durable_key);
        }
        self.entries.clear();
    }

}

impl<T, A> CacheStore<T, A> {
    // == Stats ==
    /// Returns aggregate statistics computed from the in-memory index.
    ///
    /// Not guaranteed linearizable with concurrent durable-storage state.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            item_count: self.entries.len(),
            total_size_bytes: self.entries.values().map(|entry| entry.size_bytes).sum(),
            max_entry_size_bytes: self.config.max_entry_size_bytes,
        }
    }

    // == Accessors ==
    /// Returns the store's configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns a reference to the durable adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Returns the current number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the durable-storage key for a cache key.
    pub(crate) fn durable_key(&self, key: &str) -> String {
        format!("{}:{}", self.config.namespace, key)
    }

    /// Returns the durable-storage prefix covering this namespace.
    pub(crate) fn key_prefix(&self) -> String {
        format!("{}:", self.config.namespace)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryAdapter;
    use std::thread::sleep;
    use std::time::Duration;

    fn test_config() -> CacheConfig {
        CacheConfig::default()
    }

    fn test_store() -> CacheStore<String, MemoryAdapter> {
        CacheStore::new(MemoryAdapter::new(1_000_000), test_config())
    }

    #[test]
    fn test_store_new() {
        let store = test_store();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = test_store();

        store.put("key1".to_string(), "value1".to_string(), None).unwrap();
        let entry = store.get("key1").unwrap();

        assert_eq!(entry.data, "value1");
        assert_eq!(entry.ttl_ms, store.config().default_ttl_ms);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_put_writes_durable_record() {
        let mut store = test_store();

        let outcome = store
            .put("key1".to_string(), "value1".to_string(), None)
            .unwrap();

        assert_eq!(outcome, PutOutcome::Durable);
        let raw = store.adapter().get("cache:key1").unwrap();
        assert!(raw.contains("value1"));
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = test_store();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_overwrite_is_total() {
        let mut store = test_store();

        store.put("key1".to_string(), "value1".to_string(), Some(10_000)).unwrap();
        store.put("key1".to_string(), "value2".to_string(), None).unwrap();

        let entry = store.get("key1").unwrap();
        assert_eq!(entry.data, "value2");
        // TTL was reset to the default, not carried over
        assert_eq!(entry.ttl_ms, store.config().default_ttl_ms);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration_removes_durable_copy() {
        let mut store = test_store();

        store.put("key1".to_string(), "value1".to_string(), Some(50)).unwrap();
        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(100));

        // Lazy eviction: the expired hit removes both copies
        assert!(store.get("key1").is_none());
        assert_eq!(store.len(), 0);
        assert!(store.adapter().get("cache:key1").is_none());
    }

    #[test]
    fn test_store_remove() {
        let mut store = test_store();

        store.put("key1".to_string(), "value1".to_string(), None).unwrap();
        store.remove("key1");

        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
        assert!(store.adapter().get("cache:key1").is_none());
    }

    #[test]
    fn test_store_remove_nonexistent_is_noop() {
        let mut store = test_store();
        store.remove("nonexistent");
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_clear_then_stats_is_empty() {
        let mut store = test_store();

        store.put("key1".to_string(), "value1".to_string(), None).unwrap();
        store.put("key2".to_string(), "value2".to_string(), None).unwrap();
        store.clear();

        let stats = store.stats();
        assert_eq!(stats.item_count, 0);
        assert_eq!(stats.total_size_bytes, 0);
        assert!(store.adapter().is_empty());

        // Idempotent
        store.clear();
        assert_eq!(store.stats().item_count, 0);
    }

    #[test]
    fn test_store_oversized_entry_rejected() {
        let mut config = test_config();
        config.max_entry_size_bytes = 100;
        let mut store: CacheStore<String, MemoryAdapter> =
            CacheStore::new(MemoryAdapter::new(1_000_000), config);

        let big_value = "x".repeat(200);
        let result = store.put("big".to_string(), big_value, None);

        assert!(matches!(result, Err(CacheError::OversizedEntry { .. })));
        assert!(store.get("big").is_none());
        assert!(store.adapter().get("cache:big").is_none());
    }

    #[test]
    fn test_store_stats_reflect_index() {
        let mut store = test_store();

        store.put("key1".to_string(), "value1".to_string(), None).unwrap();
        store.put("key2".to_string(), "a longer value".to_string(), None).unwrap();

        let stats = store.stats();
        assert_eq!(stats.item_count, 2);
        let expected: usize = store.entries.values().map(|e| e.size_bytes).sum();
        assert_eq!(stats.total_size_bytes, expected);
        assert_eq!(stats.max_entry_size_bytes, store.config().max_entry_size_bytes);
    }

    #[test]
    fn test_initialize_restores_entries() {
        let mut store = test_store();
        store.put("key1".to_string(), "value1".to_string(), None).unwrap();
        store.put("key2".to_string(), "value2".to_string(), None).unwrap();

        // Rebuild a fresh store over the same adapter contents
        let adapter = MemoryAdapter::new(1_000_000);
        let mut seeded = CacheStore::<String, MemoryAdapter>::new(adapter, test_config());
        for (key, raw) in store.adapter().list("cache:") {
            seeded.adapter.set(&key, &raw).unwrap();
        }

        let loaded = seeded.initialize();
        assert_eq!(loaded, 2);
        assert_eq!(seeded.get("key1").unwrap().data, "value1");
        assert_eq!(seeded.get("key2").unwrap().data, "value2");
    }

    #[test]
    fn test_initialize_purges_version_mismatch() {
        let mut adapter = MemoryAdapter::new(1_000_000);
        adapter
            .set(
                "cache:old",
                r#"{"schema_version":"1.0","created_at_ms":0,"ttl_ms":9999999999999,"data":"stale"}"#,
            )
            .unwrap();

        let mut config = test_config();
        config.cache_version = "2.0".to_string();
        let mut store: CacheStore<String, MemoryAdapter> = CacheStore::new(adapter, config);

        let loaded = store.initialize();
        assert_eq!(loaded, 0);
        assert!(store.get("old").is_none());
        assert!(store.adapter().get("cache:old").is_none());
    }

    #[test]
    fn test_initialize_discards_corrupt_record_and_continues() {
        let mut adapter = MemoryAdapter::new(1_000_000);
        adapter.set("cache:bad", "not json at all").unwrap();
        adapter
            .set(
                "cache:good",
                r#"{"schema_version":"1.0","created_at_ms":99999999999999,"ttl_ms":3600000,"data":"ok"}"#,
            )
            .unwrap();

        let mut store: CacheStore<String, MemoryAdapter> =
            CacheStore::new(adapter, test_config());

        let loaded = store.initialize();
        assert_eq!(loaded, 1);
        assert!(store.adapter().get("cache:bad").is_none());
        assert_eq!(store.get("good").unwrap().data, "ok");
    }

    #[test]
    fn test_initialize_sweeps_expired_records() {
        let mut adapter = MemoryAdapter::new(1_000_000);
        adapter
            .set(
                "cache:dead",
                r#"{"schema_version":"1.0","created_at_ms":0,"ttl_ms":1,"data":"gone"}"#,
            )
            .unwrap();

        let mut store: CacheStore<String, MemoryAdapter> =
            CacheStore::new(adapter, test_config());

        let loaded = store.initialize();
        assert_eq!(loaded, 0);
        assert!(store.adapter().get("cache:dead").is_none());
    }

    #[test]
    fn test_quota_recovery_sweeps_and_retries() {
        // Quota sized so two records cannot coexist
        let mut store: CacheStore<String, MemoryAdapter> =
            CacheStore::new(MemoryAdapter::new(120), test_config());

        store.put("old".to_string(), "v1".to_string(), Some(10)).unwrap();
        sleep(Duration::from_millis(50));

        // The write exceeds quota, the sweep reclaims the expired entry,
        // and the retry succeeds
        let outcome = store
            .put("new".to_string(), "v2".to_string(), None)
            .unwrap();

        assert_eq!(outcome, PutOutcome::Durable);
        assert!(store.adapter().get("cache:old").is_none());
        assert!(store.adapter().get("cache:new").is_some());
        assert_eq!(store.get("new").unwrap().data, "v2");
    }

    #[test]
    fn test_quota_retry_failure_keeps_memory_copy() {
        let mut store: CacheStore<String, MemoryAdapter> =
            CacheStore::new(MemoryAdapter::new(120), test_config());

        // Fresh entry occupies the quota; nothing for the sweep to reclaim
        store.put("held".to_string(), "v1".to_string(), None).unwrap();

        let outcome = store
            .put("extra".to_string(), "v2".to_string(), None)
            .unwrap();

        assert_eq!(outcome, PutOutcome::MemoryOnly);
        // Memory and durable storage diverge: served from memory,
        // absent from the adapter
        assert_eq!(store.get("extra").unwrap().data, "v2");
        assert!(store.adapter().get("cache:extra").is_none());
    }

    #[test]
    fn test_store_unserializable_payload_rejected() {
        // serde_json cannot serialize maps with non-string keys, so this
        // payload fails at write time
        let mut store: CacheStore<HashMap<(u32, u32), String>, MemoryAdapter> =
            CacheStore::new(MemoryAdapter::new(1_000_000), test_config());

        let mut payload = HashMap::new();
        payload.insert((1, 2), "value".to_string());

        let result = store.put("grid".to_string(), payload, None);

        assert!(matches!(result, Err(CacheError::Serialization { .. })));
        // Rejected pre-write: index and durable storage untouched
        assert!(store.get("grid").is_none());
        assert!(store.is_empty());
        assert!(store.adapter().is_empty());
    }

    #[test]
    fn test_struct_payloads() {
        use serde::{Deserialize, Serialize};

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct Product {
            id: u32,
            name: String,
        }

        let mut store: CacheStore<Product, MemoryAdapter> =
            CacheStore::new(MemoryAdapter::new(1_000_000), test_config());

        let product = Product {
            id: 1,
            name: "widget".to_string(),
        };
        store.put("p1".to_string(), product.clone(), None).unwrap();

        assert_eq!(store.get("p1").unwrap().data, product);
    }
}
