//! Mirror Cache - A persistent, versioned, quota-aware cache
//!
//! Provides a single-process durable-backed cache mirror with TTL expiration,
//! schema versioning, storage-quota recovery, and stale-while-revalidate
//! background refresh.

pub mod cache;
pub mod config;
pub mod error;
pub mod persist;
pub mod tasks;

pub use cache::{CacheEntry, CacheStats, CacheStore, PutOutcome, RefreshCoordinator};
pub use config::CacheConfig;
pub use persist::{MemoryAdapter, PersistenceAdapter, QuotaExceeded};
pub use tasks::spawn_sweep_task;
