//! Storage Module
//!
//! Durable key-value backends and the snapshot persistence adapter.

mod backend;
mod persist;

// Re-export public types
pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use persist::{PersistenceAdapter, Snapshot, MAX_SNAPSHOT_AGE_MS};
