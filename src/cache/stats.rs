//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions, and
//! the incrementally maintained size counters.

use serde::{Deserialize, Serialize};

use crate::cache::ENTRY_OVERHEAD_BYTES;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted by capacity enforcement
    pub evictions: u64,
    /// Total estimated byte size of all stored payloads
    pub total_size: u64,
    /// Current number of entries in the cache
    pub entry_count: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Memory Usage ==
    /// Estimated memory footprint: payload bytes plus a fixed bookkeeping
    /// overhead per entry.
    pub fn memory_usage(&self) -> u64 {
        self.total_size + self.entry_count as u64 * ENTRY_OVERHEAD_BYTES
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Add Entry ==
    /// Accounts for an inserted entry.
    pub fn add_entry(&mut self, size: u64) {
        self.total_size += size;
        self.entry_count += 1;
    }

    // == Remove Entry ==
    /// Accounts for a removed entry.
    pub fn remove_entry(&mut self, size: u64) {
        self.total_size = self.total_size.saturating_sub(size);
        self.entry_count = self.entry_count.saturating_sub(1);
    }
}
