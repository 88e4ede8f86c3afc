//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Schema version tag; entries persisted under a different tag are purged on load
    pub cache_version: String,
    /// Prefix under which durable records are stored
    pub namespace: String,
    /// Default TTL in milliseconds for entries without explicit TTL
    pub default_ttl_ms: u64,
    /// Maximum serialized size of a single entry in bytes
    pub max_entry_size_bytes: usize,
    /// Background expiry sweep interval in milliseconds
    pub sweep_interval_ms: u64,
    /// Fraction of an entry's TTL after which a read triggers background refresh
    pub stale_threshold_fraction: f64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_VERSION` - Schema version tag (default: "1.0")
    /// - `CACHE_NAMESPACE` - Durable key prefix (default: "cache")
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 3600000)
    /// - `MAX_ENTRY_SIZE_BYTES` - Per-entry size limit (default: 5242880)
    /// - `SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 300000)
    /// - `STALE_THRESHOLD_FRACTION` - Staleness fraction of TTL (default: 0.5)
    pub fn from_env() -> Self {
        Self {
            cache_version: env::var("CACHE_VERSION").unwrap_or_else(|_| "1.0".to_string()),
            namespace: env::var("CACHE_NAMESPACE").unwrap_or_else(|_| "cache".to_string()),
            default_ttl_ms: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3_600_000),
            max_entry_size_bytes: env::var("MAX_ENTRY_SIZE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_242_880),
            sweep_interval_ms: env::var("SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300_000),
            stale_threshold_fraction: env::var("STALE_THRESHOLD_FRACTION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.5),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_version: "1.0".to_string(),
            namespace: "cache".to_string(),
            default_ttl_ms: 3_600_000,
            max_entry_size_bytes: 5_242_880,
            sweep_interval_ms: 300_000,
            stale_threshold_fraction: 0.5,
        }
    }
}
