//! Cache Module
//!
//! Provides the durable-backed cache core: entry lifecycle, expiry eviction,
//! quota recovery, stale-while-revalidate refresh, and statistics.

mod entry;
mod eviction;
mod refresh;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use refresh::RefreshCoordinator;
pub use stats::CacheStats;
pub use store::{CacheStore, PutOutcome};
