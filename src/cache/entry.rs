//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and the record format
//! written to durable storage.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// Represents a single in-memory cache entry with its metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Creation timestamp (Unix milliseconds)
    pub created_at_ms: u64,
    /// Time-to-live in milliseconds
    pub ttl_ms: u64,
    /// Serialized record size, computed at write time
    pub size_bytes: usize,
}

impl<T> CacheEntry<T> {
    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the elapsed time since
    /// creation is strictly greater than its TTL. At exactly
    /// `created_at_ms + ttl_ms` the entry is still live.
    pub fn is_expired(&self) -> bool {
        self.age_ms() > self.ttl_ms
    }

    // == Age ==
    /// Returns the elapsed time since creation in milliseconds.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.created_at_ms)
    }
}

// == Persisted Record ==
/// The JSON record format written to durable storage.
///
/// Carries the schema version tag so records from an older cache version can
/// be recognized and purged on load.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct PersistedRecord<T> {
    pub schema_version: String,
    pub created_at_ms: u64,
    pub ttl_ms: u64,
    pub data: T,
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
