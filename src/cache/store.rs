//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with TTL expiration, byte and
//! entry-count budgets, pluggable eviction, and durable snapshots.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStats, Serializer, SetOptions, SizeEstimator};
use crate::config::CacheConfig;
use crate::storage::{PersistenceAdapter, StorageBackend};

// == Cache Store ==
/// Main cache storage for values of type `T`, with capacity enforcement and
/// optional persistence.
///
/// Every mutating operation runs to completion before another can observe
/// intermediate state; callers that share a store across tasks wrap it in
/// `Arc<RwLock<_>>` (see [`crate::facade::Cache`]).
#[derive(Debug)]
pub struct CacheStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Capacity budgets and policy selection
    config: CacheConfig,
    /// Value encoder with compression-wrapper decision
    serializer: Serializer,
    /// Byte-size approximation for stored payloads
    estimator: SizeEstimator,
    /// Snapshot writer, present when a durable backend is configured
    persistence: Option<PersistenceAdapter>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CacheStore<T> {
    // == Constructors ==
    /// Creates a new CacheStore without a durable backend.
    pub fn new(config: CacheConfig) -> Self {
        let serializer = Serializer::new(config.compression_threshold);

        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            config,
            serializer,
            estimator: SizeEstimator::new(),
            persistence: None,
            _marker: PhantomData,
        }
    }

    /// Creates a new CacheStore backed by a durable store, restoring any
    /// previously persisted snapshot.
    pub fn with_storage(config: CacheConfig, backend: Arc<dyn StorageBackend>) -> Self {
        let persistence = PersistenceAdapter::new(
            backend,
            &config.storage_prefix,
            config.persist_to_storage,
        );

        let mut store = Self::new(config);
        store.persistence = Some(persistence);
        store.restore();
        store
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns None for absent or expired keys, counting a miss; an expired
    /// entry is purged on the way out. A successful retrieval bumps the
    /// entry's access accounting and counts a hit.
    pub fn get(&mut self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_miss();
            self.persist();
            return None;
        }

        let decoded = match self.entries.get(key) {
            Some(entry) => self.serializer.decode::<T>(&entry.data),
            None => return None,
        };

        match decoded {
            Ok(value) => {
                if let Some(entry) = self.entries.get_mut(key) {
                    entry.touch();
                }
                self.stats.record_hit();
                Some(value)
            }
            Err(err) => {
                warn!("Dropping undecodable entry '{}': {}", key, err);
                self.remove_entry(key);
                self.stats.record_miss();
                self.persist();
                None
            }
        }
    }

    // == Set ==
    /// Stores a value with default options.
    pub fn set(&mut self, key: impl Into<String>, value: &T)
    where
        T: Serialize,
    {
        self.set_with(key, value, SetOptions::default());
    }

    /// Stores a value with per-entry TTL, tags, priority, and dependencies.
    ///
    /// If the key already exists, the entry is replaced and its TTL reset.
    /// Capacity is enforced before the insert, evicting as many victims as
    /// the configured policy demands. An unencodable value is logged and
    /// skipped; the call never fails.
    pub fn set_with(&mut self, key: impl Into<String>, value: &T, options: SetOptions)
    where
        T: Serialize,
    {
        let key = key.into();

        let payload = match self.serializer.encode(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("Skipping cache insert for '{}': {}", key, err);
                return;
            }
        };
        let size = self.estimator.estimate(&payload);

        // A replaced key releases its budget before capacity is enforced
        if self.entries.contains_key(&key) {
            self.remove_entry(&key);
        }

        self.ensure_capacity(size);

        let ttl_ms = options.ttl_ms.unwrap_or(self.config.default_ttl_ms);
        let entry = CacheEntry::new(payload, size, ttl_ms, options);
        self.stats.add_entry(entry.size);
        self.entries.insert(key, entry);

        self.persist();
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.remove_entry(key);
        if removed {
            self.persist();
        }
        removed
    }

    // == Has ==
    /// Checks whether a live entry exists for the key.
    ///
    /// An expired entry is purged as a side effect and reported absent.
    /// Unlike `get`, this does not touch access accounting or hit/miss
    /// counters.
    pub fn has(&mut self, key: &str) -> bool {
        let expired = match self.entries.get(key) {
            None => return false,
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.remove_entry(key);
            self.persist();
            return false;
        }

        true
    }

    // == Clear ==
    /// Removes all entries, resets every counter, and clears the persisted
    /// snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::new();

        if let Some(persistence) = &self.persistence {
            persistence.clear();
        }
    }

    // == Capacity Enforcement ==
    /// Evicts entries until the incoming size fits both budgets.
    ///
    /// Stops without evicting when the store is empty: an entry larger than
    /// the whole byte budget is accepted over-budget rather than looping.
    fn ensure_capacity(&mut self, incoming_size: u64) {
        while self.stats.total_size + incoming_size > self.config.max_size_bytes
            || self.stats.entry_count >= self.config.max_entries
        {
            match self.config.eviction_policy.select_victim(&self.entries) {
                Some(victim) => {
                    debug!(
                        "Evicting '{}' under {:?} policy",
                        victim, self.config.eviction_policy
                    );
                    self.remove_entry(&victim);
                    self.stats.record_eviction();
                }
                None => break,
            }
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.remove_entry(&key);
        }

        if count > 0 {
            self.persist();
        }

        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Keys ==
    /// Returns the currently stored keys.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Time To Live ==
    /// Remaining lifetime of a stored entry in milliseconds, or None when
    /// the key is absent.
    pub fn ttl_remaining_ms(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|entry| entry.ttl_remaining_ms())
    }

    // == Destroy ==
    /// Performs a final persistence flush and drops all in-memory state.
    ///
    /// The durable snapshot is left in place for the next restore.
    pub fn destroy(&mut self) {
        self.persist();
        self.entries.clear();
        self.stats = CacheStats::new();
    }

    // == Internal Helpers ==
    /// Removes an entry and releases its budget. Does not trigger
    /// persistence; callers decide when a save is due.
    pub(crate) fn remove_entry(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.stats.remove_entry(entry.size);
                true
            }
            None => false,
        }
    }

    /// Keys whose entries satisfy the predicate.
    pub(crate) fn matching_keys<F>(&self, predicate: F) -> Vec<String>
    where
        F: Fn(&CacheEntry) -> bool,
    {
        self.entries
            .iter()
            .filter(|(_, entry)| predicate(entry))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Removes a batch of keys, persisting once at the end.
    pub(crate) fn remove_all(&mut self, keys: Vec<String>) -> usize {
        let mut removed = 0;
        for key in keys {
            if self.remove_entry(&key) {
                removed += 1;
            }
        }
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Best-effort snapshot write after a mutation.
    fn persist(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.save(&self.entries, &self.stats);
        }
    }

    /// Startup restore from the durable snapshot, followed by an expiry
    /// sweep for anything that aged out while dormant.
    fn restore(&mut self) {
        let snapshot = match &self.persistence {
            Some(persistence) => persistence.load(),
            None => None,
        };

        if let Some(snapshot) = snapshot {
            self.entries = snapshot.entries.into_iter().collect();
            self.stats = snapshot.stats;
            let purged = self.cleanup_expired();
            info!(
                "Restored {} cached entries ({} expired while dormant)",
                self.entries.len(),
                purged
            );
        }
    }
}
