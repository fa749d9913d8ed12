//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, byte and entry-count
//! capacity budgets, and pluggable eviction.

mod entry;
mod eviction;
mod invalidate;
mod serialize;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry, Priority, SetOptions};
pub use eviction::EvictionPolicy;
pub use serialize::{Payload, Serializer, SizeEstimator};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Fixed per-entry bookkeeping overhead charged in memory-usage estimates
pub const ENTRY_OVERHEAD_BYTES: u64 = 64;

/// Size charged to an entry when byte-size estimation fails
pub const FALLBACK_ENTRY_SIZE: u64 = 1024;
