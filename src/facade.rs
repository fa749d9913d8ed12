//! Cache Facade Module
//!
//! Async, cloneable handle over a shared [`CacheStore`], adding the batch
//! conveniences: preload, set_many, and get_many.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::warn;

use crate::cache::{CacheStats, CacheStore, SetOptions};
use crate::config::CacheConfig;
use crate::storage::StorageBackend;

// == Cache ==
/// Shared async handle to a cache instance.
///
/// Clones share the same underlying store. Every store operation executes as
/// one atomic step under the write lock; only the loader futures started by
/// [`Cache::preload`] run concurrently.
#[derive(Debug)]
pub struct Cache<T> {
    store: Arc<RwLock<CacheStore<T>>>,
}

impl<T> Clone for Cache<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T> Cache<T> {
    // == Constructors ==
    /// Creates a cache without a durable backend.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(config))),
        }
    }

    /// Creates a cache backed by a durable store, restoring any previously
    /// persisted snapshot before returning.
    pub fn with_storage(config: CacheConfig, backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::with_storage(config, backend))),
        }
    }

    /// Shared reference to the underlying store, for the cleanup task.
    pub fn store(&self) -> Arc<RwLock<CacheStore<T>>> {
        Arc::clone(&self.store)
    }

    // == Core Operations ==
    /// Retrieves a value by key.
    pub async fn get(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.store.write().await.get(key)
    }

    /// Stores a value with default options.
    pub async fn set(&self, key: impl Into<String>, value: &T)
    where
        T: Serialize,
    {
        self.store.write().await.set(key, value);
    }

    /// Stores a value with per-entry TTL, tags, priority, and dependencies.
    pub async fn set_with(&self, key: impl Into<String>, value: &T, options: SetOptions)
    where
        T: Serialize,
    {
        self.store.write().await.set_with(key, value, options);
    }

    /// Removes an entry; returns whether anything was removed.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    /// Checks whether a live entry exists for the key.
    pub async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    /// Removes all entries and resets counters.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Deletes every entry tagged with any of the given tags; returns the
    /// count deleted.
    pub async fn invalidate_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> usize {
        self.store.write().await.invalidate_by_tags(tags)
    }

    /// Deletes every entry depending on any of the given identifiers;
    /// returns the count deleted.
    pub async fn invalidate_by_dependencies<S: AsRef<str>>(&self, dependencies: &[S]) -> usize {
        self.store
            .write()
            .await
            .invalidate_by_dependencies(dependencies)
    }

    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Returns the currently stored keys.
    pub async fn keys(&self) -> Vec<String> {
        self.store.read().await.keys()
    }

    /// Returns the current number of entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Remaining lifetime of a stored entry in milliseconds.
    pub async fn ttl_remaining_ms(&self, key: &str) -> Option<u64> {
        self.store.read().await.ttl_remaining_ms(key)
    }

    /// Removes all expired entries; returns the count removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    /// Performs a final persistence flush and drops all in-memory state.
    pub async fn destroy(&self) {
        self.store.write().await.destroy();
    }

    // == Batch Operations ==
    /// Stores a batch of key-value pairs sequentially with default options.
    pub async fn set_many(&self, entries: Vec<(String, T)>)
    where
        T: Serialize,
    {
        let mut store = self.store.write().await;
        for (key, value) in entries {
            store.set(key, &value);
        }
    }

    /// Retrieves a batch of keys sequentially, one Option per key.
    pub async fn get_many(&self, keys: &[String]) -> Vec<Option<T>>
    where
        T: DeserializeOwned,
    {
        let mut store = self.store.write().await;
        keys.iter().map(|key| store.get(key)).collect()
    }

    // == Preload ==
    /// Loads every missing key concurrently and caches each successful
    /// result with the given options.
    ///
    /// All loader futures are started together and awaited as a group. A
    /// failed load is logged and skipped without affecting the other keys.
    /// Returns the number of entries actually loaded into the cache.
    pub async fn preload<F, Fut, E>(&self, keys: &[String], loader: F, options: SetOptions) -> usize
    where
        T: Serialize,
        F: Fn(String) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: std::fmt::Display,
    {
        let missing = {
            let mut store = self.store.write().await;
            keys.iter()
                .filter(|key| !store.has(key))
                .cloned()
                .collect::<Vec<_>>()
        };

        let outcomes = join_all(missing.iter().map(|key| loader(key.clone()))).await;

        let mut loaded = 0;
        let mut store = self.store.write().await;
        for (key, outcome) in missing.into_iter().zip(outcomes) {
            match outcome {
                Ok(value) => {
                    store.set_with(key, &value, options.clone());
                    loaded += 1;
                }
                Err(err) => {
                    warn!("Preload failed for '{}': {}", key, err);
                }
            }
        }
        loaded
    }
}
