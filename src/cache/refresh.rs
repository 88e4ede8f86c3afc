//! Refresh Coordinator Module
//!
//! Implements stale-while-revalidate reads on top of the cache store: serve
//! the cached value immediately, and refresh it in the background once it
//! has aged past a fraction of its TTL.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStore};
use crate::config::CacheConfig;
use crate::persist::PersistenceAdapter;

// == Refresh Coordinator ==
/// Stale-while-revalidate coordinator over a shared [`CacheStore`].
#[derive(Debug)]
pub struct RefreshCoordinator<T, A> {
    /// Shared cache store
    store: Arc<RwLock<CacheStore<T, A>>>,
    /// Fraction of an entry's TTL after which a read triggers a refresh
    stale_threshold_fraction: f64,
}

impl<T, A> RefreshCoordinator<T, A>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    A: PersistenceAdapter + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a coordinator over the given shared store.
    pub fn new(store: Arc<RwLock<CacheStore<T, A>>>, config: &CacheConfig) -> Self {
        Self {
            store,
            stale_threshold_fraction: config.stale_threshold_fraction,
        }
    }

    // == Read With Refresh ==
    /// Reads an entry, refreshing it in the background if stale.
    ///
    /// Absent or expired keys return `None` immediately; this path never
    /// fetches synchronously. A present entry older than
    /// `ttl_ms * stale_threshold_fraction` spawns `loader` as a detached
    /// task whose result overwrites the entry via `put`; loader failures are
    /// logged and the stale entry is left untouched. The value read first is
    /// returned in every case, so callers never block on the refresh.
    ///
    /// There is no per-key de-duplication: repeated calls within one stale
    /// window may each spawn an independent loader.
    ///
    /// # Arguments
    /// * `key` - The key to read
    /// * `loader` - Async source of a fresh value, invoked only when stale
    /// * `ttl_ms` - Optional TTL in milliseconds for the refreshed entry
    pub async fn read_with_refresh<F, Fut>(
        &self,
        key: &str,
        loader: F,
        ttl_ms: Option<u64>,
    ) -> Option<CacheEntry<T>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let entry = self.store.write().await.get(key)?;

        let age_ms = entry.age_ms();
        let stale_after_ms = (entry.ttl_ms as f64 * self.stale_threshold_fraction) as u64;

        if age_ms > stale_after_ms {
            debug!(key, age_ms, stale_after_ms, "Entry is stale, spawning background refresh");
            self.spawn_refresh(key.to_string(), loader, ttl_ms);
        }

        Some(entry)
    }

    // == Spawn Refresh ==
    /// Spawns the loader as a fire-and-forget task.
    ///
    /// The task is never awaited, cancelled, or timed out; a hung loader
    /// simply never updates the cache.
    fn spawn_refresh<F, Fut>(&self, key: String, loader: F, ttl_ms: Option<u64>)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            match loader().await {
                Ok(value) => {
                    let mut store = store.write().await;
                    match store.put(key.clone(), value, ttl_ms) {
                        Ok(_) => debug!(key = %key, "Background refresh updated entry"),
                        Err(err) => warn!(
                            key = %key,
                            error = %err,
                            "Background refresh produced an unstorable value"
                        ),
                    }
                }
                Err(err) => {
                    warn!(
                        key = %key,
                        error = %err,
                        "Background refresh loader failed, stale entry retained"
                    );
                }
            }
        });
    }
}
