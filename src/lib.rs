//! Sidecache - A client-side in-memory cache
//!
//! Capacity-bounded caching with TTL expiration, tag and dependency
//! invalidation, pluggable eviction, and optional durable snapshots.

pub mod cache;
pub mod config;
pub mod error;
pub mod facade;
pub mod storage;
pub mod tasks;

pub use cache::{
    CacheEntry, CacheStats, CacheStore, EvictionPolicy, Payload, Priority, SetOptions,
};
pub use config::CacheConfig;
pub use error::CacheError;
pub use facade::Cache;
pub use storage::{FileBackend, MemoryBackend, PersistenceAdapter, StorageBackend};
pub use tasks::spawn_cleanup_task;
