//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with usage metadata and TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Number of sets and successful reads seen by this entry
    pub usage_count: u64,
    /// Expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
    /// Tick at which the key was first inserted
    pub seq: u64,
    /// Tick of the most recent set or successful read
    pub last_access: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a fresh entry inserted at tick `seq`.
    ///
    /// The usage count starts at zero; the caller records the set that
    /// created it through [`CacheEntry::refresh`].
    pub fn new(value: V, seq: u64) -> Self {
        Self {
            value,
            usage_count: 0,
            expires_at: None,
            seq,
            last_access: seq,
        }
    }

    // == Refresh ==
    /// Records a set on this entry: resets its deadline and counts one use.
    pub fn refresh(&mut self, now: Instant, ttl: Option<Duration>, tick: u64) {
        self.expires_at = deadline(now, ttl);
        self.touch(tick);
    }

    // == Touch ==
    /// Records a use without changing the deadline.
    pub fn touch(&mut self, tick: u64) {
        self.usage_count = self.usage_count.saturating_add(1);
        self.last_access = tick;
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Computes the absolute deadline for a TTL starting at `now`.
///
/// `None` or a TTL too large to represent means the entry never expires.
pub fn deadline(now: Instant, ttl: Option<Duration>) -> Option<Instant> {
    ttl.and_then(|ttl| now.checked_add(ttl))
}
