//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! These errors are internal plumbing: no public cache operation surfaces them
//! to callers. A failed serialization degrades to a skipped insert, a failed
//! size estimate to a fallback size, and a failed persistence round to a no-op.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache internals.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Value could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Durable store I/O failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Durable store rejected the operation
    #[error("Storage backend error: {0}")]
    Storage(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache internals.
pub type Result<T> = std::result::Result<T, CacheError>;
