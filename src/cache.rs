//! TTL Cache
//!
//! Expiring key-value store used for shaped responses, raw upstream payloads,
//! and per-mint security lookups. Entries are visible strictly before
//! `inserted_at + ttl`; an expired read both returns `None` and purges the
//! entry. There is no eviction beyond TTL, so the map grows with the key
//! space - acceptable for the small query universe this serves, but a known
//! limitation.
//!
//! The cache itself is unsynchronized. Owners on the multi-threaded tokio
//! runtime wrap it in `Arc<tokio::sync::Mutex<_>>`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cache entry with TTL tracking
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            ttl,
        }
    }

    /// A zero TTL is expired from the moment it is stored.
    fn is_valid(&self) -> bool {
        self.inserted_at.elapsed() < self.ttl
    }
}

/// String-keyed expiring store
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Get a value if present and unexpired. Expired entries are removed.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_valid() => Some(entry.value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value for `ttl`. Overwrites any previous entry under the key.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        self.entries.insert(key.into(), CacheEntry::new(value, ttl));
    }

    /// Remove all expired entries.
    pub fn cleanup(&mut self) {
        self.entries.retain(|_, entry| entry.is_valid());
    }

    /// Number of entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut cache = TtlCache::new();
        cache.set("dex:search:bonk", 42u32, Duration::from_secs(60));

        assert_eq!(cache.get("dex:search:bonk"), Some(42));
        assert_eq!(cache.get("dex:search:wif"), None);
    }

    #[test]
    fn test_zero_ttl_is_already_expired() {
        let mut cache = TtlCache::new();
        cache.set("k", "v".to_string(), Duration::from_secs(0));

        assert_eq!(cache.get("k"), None);
        // The expired read must have purged the entry too.
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expiry_purges_on_read() {
        let mut cache = TtlCache::new();
        cache.set("k", 1u8, Duration::from_millis(10));

        assert_eq!(cache.get("k"), Some(1));

        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_overwrite_resets_ttl() {
        let mut cache = TtlCache::new();
        cache.set("k", 1u8, Duration::from_millis(10));
        cache.set("k", 2u8, Duration::from_secs(60));

        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_cleanup() {
        let mut cache = TtlCache::new();
        cache.set("a", 1u8, Duration::from_millis(10));
        cache.set("b", 2u8, Duration::from_secs(60));

        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.len(), 2);
        cache.cleanup();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("b"), Some(2));
    }
}
