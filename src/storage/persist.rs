//! Persistence Module
//!
//! Snapshot save/restore through a storage backend. Failures here are logged
//! and swallowed; the cache keeps working as if persistence were disabled for
//! that call.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::{current_timestamp_ms, CacheEntry, CacheStats};
use crate::storage::StorageBackend;

// == Constants ==
/// Snapshots older than this are discarded on load instead of restored.
pub const MAX_SNAPSHOT_AGE_MS: u64 = 60 * 60 * 1000;

/// Suffix appended to the storage prefix to form the snapshot key.
const SNAPSHOT_KEY_SUFFIX: &str = "data";

// == Snapshot ==
/// Persisted cache image: the full entry set, the counters, and the instant
/// it was written.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub entries: Vec<(String, CacheEntry)>,
    pub stats: CacheStats,
    pub saved_at: u64,
}

// == Persistence Adapter ==
/// Writes and reads cache snapshots through a [`StorageBackend`].
pub struct PersistenceAdapter {
    backend: Arc<dyn StorageBackend>,
    storage_key: String,
    enabled: bool,
}

impl PersistenceAdapter {
    // == Constructor ==
    /// Creates an adapter writing under `<storage_prefix>data`.
    ///
    /// A disabled adapter turns every operation into a no-op.
    pub fn new(backend: Arc<dyn StorageBackend>, storage_prefix: &str, enabled: bool) -> Self {
        Self {
            backend,
            storage_key: format!("{}{}", storage_prefix, SNAPSHOT_KEY_SUFFIX),
            enabled,
        }
    }

    // == Save ==
    /// Best-effort snapshot write.
    pub fn save(&self, entries: &HashMap<String, CacheEntry>, stats: &CacheStats) {
        if !self.enabled {
            return;
        }

        let snapshot = Snapshot {
            entries: entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.clone()))
                .collect(),
            stats: stats.clone(),
            saved_at: current_timestamp_ms(),
        };

        let blob = match serde_json::to_string(&snapshot) {
            Ok(blob) => blob,
            Err(err) => {
                warn!("Failed to encode cache snapshot: {}", err);
                return;
            }
        };

        if let Err(err) = self.backend.set_item(&self.storage_key, &blob) {
            warn!("Failed to persist cache snapshot: {}", err);
        }
    }

    // == Load ==
    /// Reads the snapshot back.
    ///
    /// Returns None for a missing blob. Stale blobs (older than
    /// [`MAX_SNAPSHOT_AGE_MS`]) and corrupt blobs are discarded and the
    /// durable slot cleared, also yielding None.
    pub fn load(&self) -> Option<Snapshot> {
        if !self.enabled {
            return None;
        }

        let blob = match self.backend.get_item(&self.storage_key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(err) => {
                warn!("Failed to read cache snapshot: {}", err);
                return None;
            }
        };

        let snapshot: Snapshot = match serde_json::from_str(&blob) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("Discarding corrupt cache snapshot: {}", err);
                self.clear();
                return None;
            }
        };

        let age = current_timestamp_ms().saturating_sub(snapshot.saved_at);
        if age > MAX_SNAPSHOT_AGE_MS {
            debug!("Discarding stale cache snapshot ({} ms old)", age);
            self.clear();
            return None;
        }

        Some(snapshot)
    }

    // == Clear ==
    /// Removes the durable snapshot.
    pub fn clear(&self) {
        if !self.enabled {
            return;
        }

        if let Err(err) = self.backend.remove_item(&self.storage_key) {
            warn!("Failed to clear cache snapshot: {}", err);
        }
    }
}

impl fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceAdapter")
            .field("storage_key", &self.storage_key)
            .field("enabled", &self.enabled)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Payload, Priority, SetOptions};
    use crate::storage::MemoryBackend;
    use std::collections::HashSet;

    fn sample_entries() -> HashMap<String, CacheEntry> {
        let mut entries = HashMap::new();
        entries.insert(
            "k1".to_string(),
            CacheEntry::new(
                Payload::Plain {
                    body: "\"v1\"".to_string(),
                },
                4,
                60_000,
                SetOptions::new().tag("t").priority(Priority::High),
            ),
        );
        entries
    }

    fn adapter(backend: Arc<dyn StorageBackend>) -> PersistenceAdapter {
        PersistenceAdapter::new(backend, "test_", true)
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let backend = Arc::new(MemoryBackend::new());
        let adapter = adapter(backend.clone());

        let entries = sample_entries();
        let mut stats = CacheStats::new();
        stats.add_entry(4);
        stats.record_hit();

        adapter.save(&entries, &stats);

        let snapshot = adapter.load().expect("snapshot should load");
        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(snapshot.entries[0].0, "k1");
        assert_eq!(snapshot.stats.hits, 1);
        assert_eq!(snapshot.stats.entry_count, 1);
    }

    #[test]
    fn test_snapshot_written_under_prefixed_key() {
        let backend = Arc::new(MemoryBackend::new());
        let adapter = adapter(backend.clone());

        adapter.save(&sample_entries(), &CacheStats::new());

        assert!(backend.get_item("test_data").unwrap().is_some());
    }

    #[test]
    fn test_load_missing_snapshot() {
        let backend = Arc::new(MemoryBackend::new());
        let adapter = adapter(backend);

        assert!(adapter.load().is_none());
    }

    #[test]
    fn test_load_corrupt_snapshot_clears_slot() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set_item("test_data", "not json at all").unwrap();

        let adapter = adapter(backend.clone());
        assert!(adapter.load().is_none());
        assert_eq!(
            backend.get_item("test_data").unwrap(),
            None,
            "corrupt blob removed"
        );
    }

    #[test]
    fn test_load_stale_snapshot_clears_slot() {
        let backend = Arc::new(MemoryBackend::new());
        let adapter = adapter(backend.clone());

        let stale = Snapshot {
            entries: Vec::new(),
            stats: CacheStats::new(),
            saved_at: current_timestamp_ms() - MAX_SNAPSHOT_AGE_MS - 1_000,
        };
        backend
            .set_item("test_data", &serde_json::to_string(&stale).unwrap())
            .unwrap();

        assert!(adapter.load().is_none());
        assert_eq!(
            backend.get_item("test_data").unwrap(),
            None,
            "stale blob removed"
        );
    }

    #[test]
    fn test_disabled_adapter_is_noop() {
        let backend = Arc::new(MemoryBackend::new());
        let adapter = PersistenceAdapter::new(backend.clone(), "test_", false);

        adapter.save(&sample_entries(), &CacheStats::new());
        assert_eq!(backend.get_item("test_data").unwrap(), None);
        assert!(adapter.load().is_none());
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let backend = Arc::new(MemoryBackend::new());
        let adapter = adapter(backend.clone());

        adapter.save(&sample_entries(), &CacheStats::new());
        adapter.clear();

        assert_eq!(backend.get_item("test_data").unwrap(), None);
    }

    #[test]
    fn test_entry_metadata_survives_roundtrip() {
        let backend = Arc::new(MemoryBackend::new());
        let adapter = adapter(backend);

        adapter.save(&sample_entries(), &CacheStats::new());
        let snapshot = adapter.load().unwrap();

        let (_, entry) = &snapshot.entries[0];
        assert_eq!(entry.priority, Priority::High);
        assert_eq!(entry.tags, HashSet::from(["t".to_string()]));
        assert_eq!(entry.access_count, 1);
        assert_eq!(entry.size, 4);
    }
}
