//! Configuration Module
//!
//! Cache tuning parameters, loadable from environment variables, with named
//! profiles for the common cache roles.

use std::env;

use crate::cache::EvictionPolicy;

/// Cache configuration parameters.
///
/// Each configured cache is an independent instance with its own map,
/// counters, and durable-store namespace.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Byte budget for stored payloads
    pub max_size_bytes: u64,
    /// Default TTL in milliseconds for entries without an explicit TTL
    pub default_ttl_ms: u64,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Victim selection strategy for capacity enforcement
    pub eviction_policy: EvictionPolicy,
    /// Encoded-body size above which the compression wrapper is applied
    pub compression_threshold: usize,
    /// Whether mutations are mirrored to the durable store
    pub persist_to_storage: bool,
    /// Namespace prefix for the durable-store snapshot key
    pub storage_prefix: String,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_SIZE_BYTES` - Byte budget (default: 10485760)
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `EVICTION_POLICY` - lru | lfu | ttl-first | priority (default: lru)
    /// - `COMPRESSION_THRESHOLD` - Wrapper threshold in bytes (default: 1024)
    /// - `PERSIST_TO_STORAGE` - Mirror mutations to the durable store (default: false)
    /// - `STORAGE_PREFIX` - Durable-store namespace (default: "cache_")
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_size_bytes: env::var("MAX_SIZE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_size_bytes),
            default_ttl_ms: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl_ms),
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entries),
            eviction_policy: env::var("EVICTION_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.eviction_policy),
            compression_threshold: env::var("COMPRESSION_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.compression_threshold),
            persist_to_storage: env::var("PERSIST_TO_STORAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.persist_to_storage),
            storage_prefix: env::var("STORAGE_PREFIX").unwrap_or(defaults.storage_prefix),
        }
    }

    // == Named Profiles ==
    /// Profile for API response caching: short TTL, recency-based eviction.
    pub fn api_response() -> Self {
        Self {
            max_size_bytes: 10 * 1024 * 1024,
            default_ttl_ms: 60_000,
            max_entries: 500,
            eviction_policy: EvictionPolicy::Lru,
            storage_prefix: "api_cache_".to_string(),
            ..Self::default()
        }
    }

    /// Profile for UI state caching: longer TTL, frequency-based eviction.
    pub fn ui_state() -> Self {
        Self {
            max_size_bytes: 5 * 1024 * 1024,
            default_ttl_ms: 600_000,
            max_entries: 200,
            eviction_policy: EvictionPolicy::Lfu,
            storage_prefix: "ui_cache_".to_string(),
            ..Self::default()
        }
    }

    /// Profile for user data caching: longest TTL, priority-based eviction,
    /// mirrored to the durable store when a backend is attached.
    pub fn user_data() -> Self {
        Self {
            max_size_bytes: 2 * 1024 * 1024,
            default_ttl_ms: 3_600_000,
            max_entries: 100,
            eviction_policy: EvictionPolicy::Priority,
            persist_to_storage: true,
            storage_prefix: "user_cache_".to_string(),
            ..Self::default()
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 10 * 1024 * 1024,
            default_ttl_ms: 300_000,
            max_entries: 1000,
            eviction_policy: EvictionPolicy::Lru,
            compression_threshold: 1024,
            persist_to_storage: false,
            storage_prefix: "cache_".to_string(),
        }
    }
}
