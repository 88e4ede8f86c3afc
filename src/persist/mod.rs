//! Persistence Module
//!
//! Defines the durable storage seam the cache core depends on but does not
//! implement, plus an in-memory reference adapter.

mod memory;

pub use memory::MemoryAdapter;

use thiserror::Error;

// == Quota Exceeded Signal ==
/// Signal returned by an adapter whose byte quota is exhausted.
///
/// This is the only write failure an adapter may report; the store answers
/// it with an expiry sweep and a single retry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Durable storage quota exceeded")]
pub struct QuotaExceeded;

// == Persistence Adapter Trait ==
/// A byte-quota-limited durable key-value store.
///
/// Values are opaque serialized blobs; the cache core owns (de)serialization
/// and version tagging. The store accesses the adapter single-writer, so
/// mutating operations take `&mut self`.
pub trait PersistenceAdapter {
    /// Returns every `(key, raw_value)` pair whose key starts with `prefix`.
    fn list(&self, prefix: &str) -> Vec<(String, String)>;

    /// Returns the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `raw_value` under `key`, replacing any existing value.
    ///
    /// # Errors
    /// Returns [`QuotaExceeded`] when the write would exceed the adapter's
    /// byte quota; the previous value for `key` (if any) must be retained.
    fn set(&mut self, key: &str, raw_value: &str) -> Result<(), QuotaExceeded>;

    /// Removes the value stored under `key`. Removing a missing key is a no-op.
    fn delete(&mut self, key: &str);
}
