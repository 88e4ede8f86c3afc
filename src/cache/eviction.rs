//! Eviction Module
//!
//! Expiry sweeping over the in-memory index and durable storage. The sweep
//! runs on initialization, on the periodic sweep task, during quota recovery,
//! and lazily when a read hits an expired entry.

use tracing::{debug, info};

use crate::cache::store::CacheStore;
use crate::persist::PersistenceAdapter;

impl<T, A: PersistenceAdapter> CacheStore<T, A> {
    // == Sweep Expired ==
    /// Removes every expired entry from the index and durable storage.
    ///
    /// O(n) in entry count, which is bounded by the storage quota.
    ///
    /// # Returns
    /// `true` if anything was removed.
    pub fn sweep_expired(&mut self) -> bool {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        if expired_keys.is_empty() {
            debug!("Expiry sweep found no expired entries");
            return false;
        }

        for key in &expired_keys {
            self.evict_key(key);
        }

        info!(removed = expired_keys.len(), "Expiry sweep removed entries");
        true
    }

    // == Evict Key ==
    /// Removes a single entry from the index and durable storage.
    pub(crate) fn evict_key(&mut self, key: &str) {
        self.entries.remove(key);
        let durable_key = self.durable_key(key);
        self.adapter.delete(&durable_key);
    }
}
