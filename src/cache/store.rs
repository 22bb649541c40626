//! Cache Store Module
//!
//! Bounded TTL cache over a HashMap, with lazy expiry at read time and
//! coarse batch eviction by creation time when capacity is reached. Batch
//! eviction keeps insertion cost amortized O(1) instead of maintaining a
//! true recency structure; evicted payloads are cheap to refetch upstream.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, EVICTION_FRACTION};

// == TTL Cache ==
/// Bounded key-value store with per-entry expiry.
#[derive(Debug)]
pub struct TtlCache {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_capacity: usize,
}

impl TtlCache {
    // == Constructor ==
    /// Creates a new TtlCache holding at most `max_capacity` entries.
    pub fn new(max_capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_capacity,
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if present and not expired. An expired entry found
    /// during lookup is removed before reporting not-found (lazy expiry).
    /// Increments the hit or miss counter.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                return None;
            }

            let value = entry.value.clone();
            self.stats.record_hit();
            Some(value)
        } else {
            self.stats.record_miss();
            None
        }
    }

    // == Set ==
    /// Stores a value under `key`, expiring `ttl_seconds` from now.
    ///
    /// If the key already exists the entry is replaced wholesale. When the
    /// cache is at capacity, the oldest tenth of the capacity is evicted by
    /// creation time first, regardless of whether those entries have
    /// individually expired.
    pub fn set(&mut self, key: String, value: Value, ttl_seconds: u64) {
        if self.entries.len() >= self.max_capacity {
            self.evict_oldest_batch();
        }

        let entry = CacheEntry::new(value, ttl_seconds);
        self.entries.insert(key, entry);

        self.stats.record_set();
        self.stats.set_total_entries(self.entries.len());
    }

    // == Has ==
    /// Existence check with the same lazy-expiry semantics as `get`, but
    /// without touching the hit/miss counters.
    pub fn has(&mut self, key: &str) -> bool {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                self.stats.set_total_entries(self.entries.len());
                return false;
            }
            true
        } else {
            false
        }
    }

    // == Delete ==
    /// Unconditionally removes an entry. Returns whether one was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Removes all entries. Counters are deliberately left untouched so the
    /// stats endpoint keeps reporting lifetime totals.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Remaining TTL ==
    /// Remaining TTL in whole seconds (rounded up) for `key`, or 0 if the
    /// key is absent or expired.
    pub fn remaining_ttl(&self, key: &str) -> u64 {
        self.entries
            .get(key)
            .map(|entry| entry.remaining_ttl())
            .unwrap_or(0)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Batch Eviction ==
    /// Evicts the `ceil(max_capacity * 0.1)` entries with the oldest
    /// creation timestamps.
    fn evict_oldest_batch(&mut self) {
        let batch_size = (self.max_capacity as f64 * EVICTION_FRACTION).ceil() as usize;

        let mut by_age: Vec<(String, u64)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.created_at))
            .collect();
        by_age.sort_by_key(|(_, created_at)| *created_at);

        let mut evicted = 0;
        for (key, _) in by_age.into_iter().take(batch_size) {
            self.entries.remove(&key);
            self.stats.record_eviction();
            evicted += 1;
        }

        debug!("cache full, evicted {} oldest entries", evicted);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_store_new() {
        let store = TtlCache::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = TtlCache::new(100);

        store.set("key1".to_string(), json!({"name": "aspirin"}), 300);
        let value = store.get("key1").unwrap();

        assert_eq!(value, json!({"name": "aspirin"}));
        assert_eq!(store.len(), 1);
        assert!(store.has("key1"));
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = TtlCache::new(100);

        assert!(store.get("nonexistent").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_overwrite_replaces_entry() {
        let mut store = TtlCache::new(100);

        store.set("key1".to_string(), json!("v1"), 300);
        store.set("key1".to_string(), json!("v2"), 300);

        assert_eq!(store.get("key1").unwrap(), json!("v2"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().sets, 2);
    }

    #[test]
    fn test_store_delete() {
        let mut store = TtlCache::new(100);

        store.set("key1".to_string(), json!("v"), 300);

        assert!(store.delete("key1"));
        assert!(store.is_empty());
        assert!(!store.delete("key1"));
    }

    #[test]
    fn test_store_lazy_expiry_on_get() {
        let mut store = TtlCache::new(100);

        store.set("key1".to_string(), json!("v"), 1);
        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(1100));

        // Expired entry is removed by the lookup itself
        assert!(store.get("key1").is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_has_lazy_expiry_without_counters() {
        let mut store = TtlCache::new(100);

        store.set("key1".to_string(), json!("v"), 1);
        sleep(Duration::from_millis(1100));

        assert!(!store.has("key1"));
        assert_eq!(store.len(), 0, "has() should remove the expired entry");

        let stats = store.stats();
        assert_eq!(stats.hits, 0, "has() must not count as a hit");
        assert_eq!(stats.misses, 0, "has() must not count as a miss");
    }

    #[test]
    fn test_store_batch_eviction_oldest_first() {
        let mut store = TtlCache::new(5);

        for i in 0..5 {
            store.set(format!("key{}", i), json!(i), 300);
            // Distinct creation timestamps so eviction order is deterministic
            sleep(Duration::from_millis(5));
        }

        // Capacity reached: the next set evicts ceil(5 * 0.1) = 1 oldest entry
        store.set("key5".to_string(), json!(5), 300);

        assert_eq!(store.len(), 5);
        assert!(!store.has("key0"), "oldest entry should have been evicted");
        assert!(store.has("key1"));
        assert!(store.has("key5"));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_batch_eviction_count() {
        let mut store = TtlCache::new(20);

        for i in 0..20 {
            store.set(format!("key{}", i), json!(i), 300);
        }
        store.set("overflow".to_string(), json!("x"), 300);

        // ceil(20 * 0.1) = 2 entries evicted in one batch
        assert_eq!(store.stats().evictions, 2);
        assert_eq!(store.len(), 19);
    }

    #[test]
    fn test_store_eviction_ignores_entry_expiry() {
        let mut store = TtlCache::new(3);

        // The newest entry has the shortest TTL; eviction must still pick
        // the oldest by creation time
        store.set("old".to_string(), json!(1), 3600);
        sleep(Duration::from_millis(5));
        store.set("mid".to_string(), json!(2), 3600);
        sleep(Duration::from_millis(5));
        store.set("new".to_string(), json!(3), 1);

        store.set("extra".to_string(), json!(4), 300);

        assert!(!store.has("old"));
        assert!(store.has("new"));
    }

    #[test]
    fn test_store_clear_keeps_counters() {
        let mut store = TtlCache::new(100);

        store.set("key1".to_string(), json!("v"), 300);
        store.get("key1");
        store.get("missing");

        store.clear();

        let stats = store.stats();
        assert_eq!(store.len(), 0);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.sets, 1);
    }

    #[test]
    fn test_store_remaining_ttl() {
        let mut store = TtlCache::new(100);

        store.set("key1".to_string(), json!("v"), 60);

        let remaining = store.remaining_ttl("key1");
        assert!(remaining >= 59 && remaining <= 60);
        assert_eq!(store.remaining_ttl("missing"), 0);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = TtlCache::new(100);

        store.set("short".to_string(), json!("v"), 1);
        store.set("long".to_string(), json!("v"), 300);

        sleep(Duration::from_millis(1100));

        let removed = store.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.has("long"));
    }

    #[test]
    fn test_store_stats() {
        let mut store = TtlCache::new(100);

        store.set("key1".to_string(), json!("v"), 300);
        store.get("key1"); // hit
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
