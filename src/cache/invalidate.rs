//! Invalidation Module
//!
//! Bulk removal of entries by tag or dependency identifier.

use crate::cache::CacheStore;

impl<T> CacheStore<T> {
    // == Invalidate By Tags ==
    /// Deletes every entry whose tag set intersects the given tags.
    ///
    /// Returns the number of entries deleted.
    pub fn invalidate_by_tags<S: AsRef<str>>(&mut self, tags: &[S]) -> usize {
        let victims =
            self.matching_keys(|entry| tags.iter().any(|tag| entry.tags.contains(tag.as_ref())));
        self.remove_all(victims)
    }

    // == Invalidate By Dependencies ==
    /// Deletes every entry whose dependency set intersects the given
    /// identifiers.
    ///
    /// Returns the number of entries deleted.
    pub fn invalidate_by_dependencies<S: AsRef<str>>(&mut self, dependencies: &[S]) -> usize {
        let victims = self.matching_keys(|entry| {
            dependencies
                .iter()
                .any(|dep| entry.dependencies.contains(dep.as_ref()))
        });
        self.remove_all(victims)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use crate::cache::{CacheStore, SetOptions};
    use crate::config::CacheConfig;

    fn store() -> CacheStore<String> {
        CacheStore::new(CacheConfig::default())
    }

    #[test]
    fn test_invalidate_by_tags_removes_exact_matches() {
        let mut store = store();

        store.set_with("u1", &"v".to_string(), SetOptions::new().tag("users"));
        store.set_with(
            "u2",
            &"v".to_string(),
            SetOptions::new().tag("users").tag("admins"),
        );
        store.set_with("p1", &"v".to_string(), SetOptions::new().tag("posts"));
        store.set("plain", &"v".to_string());

        let removed = store.invalidate_by_tags(&["users"]);

        assert_eq!(removed, 2);
        assert!(!store.has("u1"));
        assert!(!store.has("u2"));
        assert!(store.has("p1"));
        assert!(store.has("plain"));
    }

    #[test]
    fn test_invalidate_by_tags_multiple_tags() {
        let mut store = store();

        store.set_with("a", &"v".to_string(), SetOptions::new().tag("alpha"));
        store.set_with("b", &"v".to_string(), SetOptions::new().tag("beta"));
        store.set_with("c", &"v".to_string(), SetOptions::new().tag("gamma"));

        let removed = store.invalidate_by_tags(&["alpha", "gamma"]);

        assert_eq!(removed, 2);
        assert!(store.has("b"));
    }

    #[test]
    fn test_invalidate_by_tags_no_matches() {
        let mut store = store();

        store.set_with("a", &"v".to_string(), SetOptions::new().tag("alpha"));

        assert_eq!(store.invalidate_by_tags(&["missing"]), 0);
        assert!(store.has("a"));
    }

    #[test]
    fn test_invalidate_by_dependencies() {
        let mut store = store();

        store.set_with(
            "list",
            &"v".to_string(),
            SetOptions::new().dependency("api/users"),
        );
        store.set_with(
            "detail",
            &"v".to_string(),
            SetOptions::new()
                .dependency("api/users")
                .dependency("api/roles"),
        );
        store.set_with(
            "other",
            &"v".to_string(),
            SetOptions::new().dependency("api/posts"),
        );

        let removed = store.invalidate_by_dependencies(&["api/users"]);

        assert_eq!(removed, 2);
        assert!(!store.has("list"));
        assert!(!store.has("detail"));
        assert!(store.has("other"));
    }

    #[test]
    fn test_invalidation_releases_budget() {
        let mut store = store();

        store.set_with("a", &"v".to_string(), SetOptions::new().tag("t"));
        let before = store.stats().total_size;
        assert!(before > 0);

        store.invalidate_by_tags(&["t"]);

        let stats = store.stats();
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.evictions, 0, "invalidation is not eviction");
    }
}
