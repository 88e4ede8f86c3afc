//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Every fallible operation returns one of these instead of logging and
/// swallowing; callers observe degraded status as values, never as panics.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Payload could not be serialized for storage
    #[error("Failed to serialize entry for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Serialized payload exceeds the per-entry size limit
    #[error("Entry for key '{key}' is {size_bytes} bytes, limit is {limit_bytes}")]
    OversizedEntry {
        key: String,
        size_bytes: usize,
        limit_bytes: usize,
    },

    /// Unparseable durable record found during load
    #[error("Corrupt durable record at '{0}'")]
    CorruptEntry(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
