//! Cache Statistics Module
//!
//! Read-only aggregate view over the store's in-memory index.

use serde::Serialize;

// == Cache Stats ==
/// Aggregate cache statistics.
///
/// Computed from the in-memory index only; durable storage may briefly
/// diverge after a failed quota retry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Current number of entries in the index
    pub item_count: usize,
    /// Sum of serialized entry sizes in bytes
    pub total_size_bytes: usize,
    /// Configured per-entry size limit in bytes
    pub max_entry_size_bytes: usize,
}

impl CacheStats {
    // == Utilization ==
    /// Returns the mean entry size in bytes, or 0.0 for an empty cache.
    pub fn mean_entry_bytes(&self) -> f64 {
        if self.item_count == 0 {
            0.0
        } else {
            self.total_size_bytes as f64 / self.item_count as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default_is_zeroed() {
        let stats = CacheStats::default();
        assert_eq!(stats.item_count, 0);
        assert_eq!(stats.total_size_bytes, 0);
    }

    #[test]
    fn test_mean_entry_bytes_empty() {
        let stats = CacheStats::default();
        assert_eq!(stats.mean_entry_bytes(), 0.0);
    }

    #[test]
    fn test_mean_entry_bytes() {
        let stats = CacheStats {
            item_count: 4,
            total_size_bytes: 200,
            max_entry_size_bytes: 5_242_880,
        };
        assert_eq!(stats.mean_entry_bytes(), 50.0);
    }

    #[test]
    fn test_stats_serializes_to_json() {
        let stats = CacheStats {
            item_count: 1,
            total_size_bytes: 42,
            max_entry_size_bytes: 100,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"item_count\":1"));
        assert!(json.contains("\"total_size_bytes\":42"));
    }
}
