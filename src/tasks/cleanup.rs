//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries,
//! complementing the lazy expiry performed on access.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. It acquires a write lock on the cache store to remove
/// expired entries.
///
/// # Arguments
/// * `cache` - Shared reference to the cache store
/// * `sweep_interval_ms` - Interval in milliseconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(CacheStore::new(CacheConfig::default())));
/// let sweep_handle = spawn_cleanup_task(cache.clone(), 60_000);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_cleanup_task<T>(
    cache: Arc<RwLock<CacheStore<T>>>,
    sweep_interval_ms: u64,
) -> JoinHandle<()>
where
    T: 'static,
{
    let interval = Duration::from_millis(sweep_interval_ms);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} ms",
            sweep_interval_ms
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            // Acquire write lock and cleanup expired entries
            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup_expired()
            };

            // Log cleanup statistics
            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
