//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries from the
//! index and durable storage.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::persist::PersistenceAdapter;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the configured interval
/// between sweeps. It acquires a write lock on the cache store for the
/// duration of each sweep.
///
/// # Arguments
/// * `store` - Shared reference to the cache store
/// * `sweep_interval_ms` - Interval in milliseconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task; aborting it is the teardown path that
/// stops periodic sweeping.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::new(adapter, config)));
/// let sweep_handle = spawn_sweep_task(store.clone(), 300_000);
/// // Later, during teardown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<T, A>(
    store: Arc<RwLock<CacheStore<T, A>>>,
    sweep_interval_ms: u64,
) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
    A: PersistenceAdapter + Send + Sync + 'static,
{
    let interval = Duration::from_millis(sweep_interval_ms);

    tokio::spawn(async move {
        info!(sweep_interval_ms, "Starting expiry sweep task");

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            // Acquire write lock and sweep expired entries
            let (removed, stats) = {
                let mut store_guard = store.write().await;
                let removed = store_guard.sweep_expired();
                (removed, store_guard.stats())
            };

            if removed {
                info!(
                    item_count = stats.item_count,
                    mean_entry_bytes = stats.mean_entry_bytes(),
                    "Expiry sweep removed entries"
                );
            } else {
                debug!("Expiry sweep: nothing to remove");
            }
        }
    })
}
