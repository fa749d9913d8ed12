//! Eviction Module
//!
//! Victim selection strategies for capacity enforcement.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::CacheEntry;

// == Eviction Policy ==
/// Strategy used to pick which entry to remove when the cache exceeds its
/// byte or entry-count budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvictionPolicy {
    /// Evict the entry with the oldest last access time
    Lru,
    /// Evict the entry with the lowest access count
    Lfu,
    /// Evict an already-expired entry; fall back to LRU when none is expired
    TtlFirst,
    /// Evict the entry with the lowest priority rank
    Priority,
}

impl EvictionPolicy {
    // == Select Victim ==
    /// Picks the key to evict next, or None when the store is empty.
    ///
    /// Ties (equal access times, counts, or ranks) are broken by map
    /// iteration order, which is unspecified.
    pub fn select_victim(self, entries: &HashMap<String, CacheEntry>) -> Option<String> {
        match self {
            EvictionPolicy::Lru => select_lru(entries),
            EvictionPolicy::Lfu => entries
                .iter()
                .min_by_key(|(_, entry)| entry.access_count)
                .map(|(key, _)| key.clone()),
            EvictionPolicy::TtlFirst => entries
                .iter()
                .find(|(_, entry)| entry.is_expired())
                .map(|(key, _)| key.clone())
                .or_else(|| select_lru(entries)),
            EvictionPolicy::Priority => entries
                .iter()
                .min_by_key(|(_, entry)| entry.priority.rank())
                .map(|(key, _)| key.clone()),
        }
    }
}

/// Least recently used key, shared by the LRU policy and the TTL-first
/// fallback.
fn select_lru(entries: &HashMap<String, CacheEntry>) -> Option<String> {
    entries
        .iter()
        .min_by_key(|(_, entry)| entry.last_accessed)
        .map(|(key, _)| key.clone())
}

impl FromStr for EvictionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionPolicy::Lru),
            "lfu" => Ok(EvictionPolicy::Lfu),
            "ttl-first" | "ttl_first" => Ok(EvictionPolicy::TtlFirst),
            "priority" => Ok(EvictionPolicy::Priority),
            other => Err(format!("Unknown eviction policy: {}", other)),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{current_timestamp_ms, Payload, Priority};
    use std::collections::HashSet;

    fn entry(last_accessed: u64, access_count: u64, ttl_ms: u64, priority: Priority) -> CacheEntry {
        CacheEntry {
            data: Payload::Plain {
                body: "\"v\"".to_string(),
            },
            created_at: current_timestamp_ms(),
            ttl_ms,
            access_count,
            last_accessed,
            size: 3,
            tags: HashSet::new(),
            priority,
            dependencies: HashSet::new(),
        }
    }

    fn live(last_accessed: u64, access_count: u64, priority: Priority) -> CacheEntry {
        entry(last_accessed, access_count, 60_000, priority)
    }

    #[test]
    fn test_all_policies_return_none_on_empty_store() {
        let entries = HashMap::new();

        assert_eq!(EvictionPolicy::Lru.select_victim(&entries), None);
        assert_eq!(EvictionPolicy::Lfu.select_victim(&entries), None);
        assert_eq!(EvictionPolicy::TtlFirst.select_victim(&entries), None);
        assert_eq!(EvictionPolicy::Priority.select_victim(&entries), None);
    }

    #[test]
    fn test_lru_picks_oldest_access() {
        let now = current_timestamp_ms();
        let mut entries = HashMap::new();
        entries.insert("old".to_string(), live(now - 3_000, 5, Priority::Normal));
        entries.insert("mid".to_string(), live(now - 1_000, 1, Priority::Normal));
        entries.insert("new".to_string(), live(now, 1, Priority::Normal));

        assert_eq!(
            EvictionPolicy::Lru.select_victim(&entries),
            Some("old".to_string())
        );
    }

    #[test]
    fn test_lfu_picks_lowest_access_count() {
        let now = current_timestamp_ms();
        let mut entries = HashMap::new();
        entries.insert("hot".to_string(), live(now - 5_000, 40, Priority::Normal));
        entries.insert("warm".to_string(), live(now, 7, Priority::Normal));
        entries.insert("cold".to_string(), live(now, 2, Priority::Normal));

        assert_eq!(
            EvictionPolicy::Lfu.select_victim(&entries),
            Some("cold".to_string())
        );
    }

    #[test]
    fn test_ttl_first_prefers_expired_entry() {
        let now = current_timestamp_ms();
        let mut entries = HashMap::new();
        let mut dead = entry(now, 1, 10, Priority::Normal);
        dead.created_at = now - 1_000;
        entries.insert("dead".to_string(), dead);
        entries.insert("fresh".to_string(), live(now - 9_000, 1, Priority::Normal));

        assert_eq!(
            EvictionPolicy::TtlFirst.select_victim(&entries),
            Some("dead".to_string())
        );
    }

    #[test]
    fn test_ttl_first_falls_back_to_lru() {
        let now = current_timestamp_ms();
        let mut entries = HashMap::new();
        entries.insert("older".to_string(), live(now - 2_000, 1, Priority::Normal));
        entries.insert("newer".to_string(), live(now, 1, Priority::Normal));

        assert_eq!(
            EvictionPolicy::TtlFirst.select_victim(&entries),
            Some("older".to_string())
        );
    }

    #[test]
    fn test_priority_picks_lowest_rank() {
        let now = current_timestamp_ms();
        let mut entries = HashMap::new();
        entries.insert("critical".to_string(), live(now, 1, Priority::Critical));
        entries.insert("low".to_string(), live(now, 99, Priority::Low));
        entries.insert("high".to_string(), live(now, 1, Priority::High));

        assert_eq!(
            EvictionPolicy::Priority.select_victim(&entries),
            Some("low".to_string())
        );
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("lru".parse::<EvictionPolicy>(), Ok(EvictionPolicy::Lru));
        assert_eq!("LFU".parse::<EvictionPolicy>(), Ok(EvictionPolicy::Lfu));
        assert_eq!(
            "ttl-first".parse::<EvictionPolicy>(),
            Ok(EvictionPolicy::TtlFirst)
        );
        assert_eq!(
            "priority".parse::<EvictionPolicy>(),
            Ok(EvictionPolicy::Priority)
        );
        assert!("random".parse::<EvictionPolicy>().is_err());
    }
}
