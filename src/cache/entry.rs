//! Cache Entry Module
//!
//! Defines the structure for individual cache entries: TTL, access
//! accounting, byte size, tags, priority, and dependency labels.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::cache::Payload;

// == Priority ==
/// Relative importance of an entry, consulted by priority-based eviction.
///
/// Ordering is by rank: `Low < Normal < High < Critical`. The lowest rank
/// present in the cache is evicted first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl Priority {
    /// Numeric rank, lowest evicts first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Normal => 1,
            Priority::High => 2,
            Priority::Critical => 3,
        }
    }
}

// == Set Options ==
/// Per-insert overrides accepted by `set_with`.
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// TTL override in milliseconds (the configured default applies when None)
    pub ttl_ms: Option<u64>,
    /// Labels for group invalidation
    pub tags: HashSet<String>,
    /// Eviction priority
    pub priority: Priority,
    /// Upstream source identifiers for dependency invalidation
    pub dependencies: HashSet<String>,
}

impl SetOptions {
    /// Creates options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the TTL in milliseconds.
    pub fn ttl(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = Some(ttl_ms);
        self
    }

    /// Adds an invalidation tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Sets the eviction priority.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Adds an upstream dependency identifier.
    pub fn dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.insert(dependency.into());
        self
    }
}

// == Cache Entry ==
/// Represents a single cache entry with its serialized payload and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored payload, possibly compression-wrapped
    pub data: Payload,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Time-to-live in milliseconds
    pub ttl_ms: u64,
    /// Number of successful retrievals, starts at 1 on insert
    pub access_count: u64,
    /// Timestamp of the most recent successful retrieval (Unix milliseconds)
    pub last_accessed: u64,
    /// Estimated byte size of the stored payload
    pub size: u64,
    /// Labels for group invalidation
    pub tags: HashSet<String>,
    /// Eviction priority
    pub priority: Priority,
    /// Upstream source identifiers for dependency invalidation
    pub dependencies: HashSet<String>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `data` - The serialized payload
    /// * `size` - Estimated byte size of the payload
    /// * `ttl_ms` - Time-to-live in milliseconds
    /// * `options` - Tags, priority, and dependencies for this entry
    pub fn new(data: Payload, size: u64, ttl_ms: u64, options: SetOptions) -> Self {
        let now = current_timestamp_ms();

        Self {
            data,
            created_at: now,
            ttl_ms,
            access_count: 1,
            last_accessed: now,
            size,
            tags: options.tags,
            priority: options.priority,
            dependencies: options.dependencies,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once strictly more than
    /// `ttl_ms` has elapsed since creation. At exactly `ttl_ms` it is still
    /// live.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() > self.created_at + self.ttl_ms
    }

    // == Touch ==
    /// Records a successful retrieval: bumps the access count and refreshes
    /// the last-accessed timestamp.
    pub fn touch(&mut self) {
        self.access_count += 1;
        self.last_accessed = current_timestamp_ms();
    }

    // == Time To Live ==
    /// Returns remaining lifetime in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        let expires_at = self.created_at + self.ttl_ms;
        expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
