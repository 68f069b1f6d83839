//! LFU Cache Module
//!
//! Least Frequently Used eviction: when a new key arrives at capacity, the
//! entry with the fewest sets and reads is dropped. Expired entries are
//! always reclaimed first.

use std::num::NonZeroUsize;
use std::time::Duration;

use parking_lot::RwLock;

use crate::cache::{Cache, CacheEntry, CacheStats, CacheStore};
use crate::config::EvictionPolicy;
use crate::error::Result;

/// Ranks by usage count; equal counts lose in insertion order.
fn frequency_rank<V>(entry: &CacheEntry<V>) -> (u64, u64) {
    (entry.usage_count, entry.seq)
}

// == LFU Cache ==
/// Frequency-based cache behind a single read-write lock.
pub struct LfuCache<V> {
    store: RwLock<CacheStore<V>>,
}

impl<V: Clone> LfuCache<V> {
    // == Constructor ==
    /// Creates an empty LFU cache.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries
    /// * `default_ttl` - Expiration applied by `set`, None = never expires
    pub fn new(capacity: NonZeroUsize, default_ttl: Option<Duration>) -> Self {
        Self {
            store: RwLock::new(CacheStore::new(capacity, default_ttl, frequency_rank)),
        }
    }

    /// Current usage count of `key`, if stored.
    pub fn usage_count(&self, key: &str) -> Option<u64> {
        self.store.read().entry(key).map(|entry| entry.usage_count)
    }
}

impl<V: Clone + Send + Sync> Cache<V> for LfuCache<V> {
    fn set(&self, key: &str, value: V) {
        self.store.write().set(key.to_string(), value);
    }

    fn set_with_expiration(&self, key: &str, value: V, ttl: Duration) {
        self.store
            .write()
            .set_with_ttl(key.to_string(), value, Some(ttl));
    }

    fn get(&self, key: &str) -> Result<V> {
        self.store.write().get(key)
    }

    fn remove(&self, key: &str) -> bool {
        self.store.write().remove(key)
    }

    fn len(&self) -> usize {
        self.store.read().len()
    }

    fn capacity(&self) -> usize {
        self.store.read().capacity()
    }

    fn policy(&self) -> EvictionPolicy {
        EvictionPolicy::Frequency
    }

    fn stats(&self) -> CacheStats {
        self.store.read().stats()
    }

    fn purge_expired(&self) -> usize {
        self.store.write().purge_expired()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use std::thread::sleep;

    fn cache(capacity: usize) -> LfuCache<String> {
        LfuCache::new(
            NonZeroUsize::new(capacity).unwrap(),
            Some(Duration::from_secs(300)),
        )
    }

    #[test]
    fn test_lfu_set_and_get() {
        let cache = cache(4);

        cache.set("key1", "value1".to_string());

        assert_eq!(cache.get("key1").unwrap(), "value1");
        assert_eq!(cache.usage_count("key1"), Some(2));
        assert_eq!(cache.policy(), EvictionPolicy::Frequency);
    }

    #[test]
    fn test_lfu_evicts_least_used() {
        let cache = cache(3);

        cache.set("key1", "a".to_string());
        cache.set("key2", "b".to_string());
        cache.set("key3", "c".to_string());
        for _ in 0..5 {
            cache.get("key1").unwrap();
            cache.get("key2").unwrap();
        }

        cache.set("key4", "d".to_string());

        assert_eq!(cache.len(), 3);
        assert!(matches!(cache.get("key3"), Err(CacheError::NotFound(_))));
        assert!(cache.get("key1").is_ok());
        assert!(cache.get("key2").is_ok());
        assert!(cache.get("key4").is_ok());
    }

    #[test]
    fn test_lfu_reads_protect_old_entry() {
        let cache = cache(2);

        cache.set("old", "a".to_string());
        cache.get("old").unwrap();
        cache.set("young", "b".to_string());

        cache.set("newest", "c".to_string());

        assert!(cache.get("old").is_ok());
        assert!(matches!(cache.get("young"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_lfu_set_with_expiration() {
        let cache = cache(2);

        cache.set_with_expiration("key1", "v".to_string(), Duration::from_millis(10));
        sleep(Duration::from_millis(40));

        assert!(matches!(cache.get("key1"), Err(CacheError::Expired(_))));
        assert!(matches!(cache.get("key1"), Err(CacheError::NotFound(_))));
        assert_eq!(cache.usage_count("key1"), None);
    }

    #[test]
    fn test_lfu_remove() {
        let cache = cache(2);

        cache.set("key1", "v".to_string());

        assert!(cache.remove("key1"));
        assert!(!cache.remove("key1"));
        assert!(cache.is_empty());
    }
}
