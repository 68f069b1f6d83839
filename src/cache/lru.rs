//! LRU Cache Module
//!
//! Implements Least Recently Used eviction on top of the shared entry table.
//!
//! Every set and successful read stamps the entry with a fresh tick of the
//! store clock, so the smallest tick is always the least recently used key.
//! Ticks are unique; keys never touched after insertion keep their
//! insertion order.

use std::num::NonZeroUsize;
use std::time::Duration;

use parking_lot::RwLock;

use crate::cache::{Cache, CacheEntry, CacheStats, CacheStore};
use crate::config::EvictionPolicy;
use crate::error::Result;

fn recency_rank<V>(entry: &CacheEntry<V>) -> (u64, u64) {
    (entry.last_access, entry.seq)
}

// == LRU Cache ==
/// Recency-based cache behind a single read-write lock.
pub struct LruCache<V> {
    store: RwLock<CacheStore<V>>,
}

impl<V: Clone> LruCache<V> {
    // == Constructor ==
    /// Creates an empty LRU cache.
    pub fn new(capacity: NonZeroUsize, default_ttl: Option<Duration>) -> Self {
        Self {
            store: RwLock::new(CacheStore::new(capacity, default_ttl, recency_rank)),
        }
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without touching it.
    pub fn peek_oldest(&self) -> Option<String> {
        self.store
            .read()
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone())
    }
}

impl<V: Clone + Send + Sync> Cache<V> for LruCache<V> {
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
        EvictionPolicy::Recency
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

    fn cache(capacity: usize) -> LruCache<String> {
        LruCache::new(
            NonZeroUsize::new(capacity).unwrap(),
            Some(Duration::from_secs(300)),
        )
    }

    fn fill(cache: &LruCache<String>, keys: &[&str]) {
        for key in keys {
            cache.set(key, format!("value_{key}"));
        }
    }

    #[test]
    fn test_lru_new() {
        let cache = cache(3);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 3);
        assert_eq!(cache.peek_oldest(), None);
        assert_eq!(cache.policy(), EvictionPolicy::Recency);
    }

    #[test]
    fn test_lru_evicts_oldest_insert() {
        let cache = cache(3);
        fill(&cache, &["key1", "key2", "key3"]);

        cache.set("key4", "value4".to_string());

        assert_eq!(cache.len(), 3);
        assert!(matches!(cache.get("key1"), Err(CacheError::NotFound(_))));
        assert!(cache.get("key2").is_ok());
        assert!(cache.get("key3").is_ok());
        assert!(cache.get("key4").is_ok());
    }

    #[test]
    fn test_lru_touch_on_get() {
        let cache = cache(3);
        fill(&cache, &["key1", "key2", "key3"]);

        cache.get("key1").unwrap();
        assert_eq!(cache.peek_oldest(), Some("key2".to_string()));

        cache.set("key4", "value4".to_string());

        assert!(cache.get("key1").is_ok());
        assert!(matches!(cache.get("key2"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_lru_touch_on_overwrite() {
        let cache = cache(3);
        fill(&cache, &["a", "b", "c"]);

        cache.set("a", "again".to_string());
        cache.set("d", "value_d".to_string());

        assert_eq!(cache.get("a").unwrap(), "again");
        assert!(matches!(cache.get("b"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_lru_frequency_does_not_matter() {
        let cache = cache(2);
        fill(&cache, &["hot", "cold"]);
        for _ in 0..100 {
            cache.get("hot").unwrap();
        }
        cache.get("cold").unwrap();

        cache.set("new", "value_new".to_string());

        assert!(matches!(cache.get("hot"), Err(CacheError::NotFound(_))));
        assert!(cache.get("cold").is_ok());
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        let cache = cache(3);
        fill(&cache, &["a", "b", "c"]);

        cache.get("a").unwrap();
        cache.get("c").unwrap();
        cache.get("b").unwrap();

        assert_eq!(cache.peek_oldest(), Some("a".to_string()));
        cache.set("d", String::new());
        assert_eq!(cache.peek_oldest(), Some("c".to_string()));
        cache.set("e", String::new());
        assert_eq!(cache.peek_oldest(), Some("b".to_string()));
    }

    #[test]
    fn test_lru_prefers_expired_entry() {
        let cache = cache(2);
        cache.set("recent", "v".to_string());
        cache.set_with_expiration("short", "v".to_string(), Duration::from_millis(10));
        sleep(Duration::from_millis(40));

        cache.set("new", "v".to_string());

        assert!(cache.get("recent").is_ok());
        assert!(cache.get("new").is_ok());
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_lru_remove() {
        let cache = cache(2);
        fill(&cache, &["a"]);

        assert!(cache.remove("a"));
        assert!(!cache.remove("a"));
        assert_eq!(cache.peek_oldest(), None);
    }
}
