//! Bounded, time-limited in-memory cache.
//!
//! Entries expire `ttl` after insertion. When full, the least recently read
//! or written entry is evicted. Values are cloned out; callers never hold a
//! reference into the cache.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

struct Entry<V> {
    value: V,
    inserted: Instant,
    last_used: u64,
}

struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    tick: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Counters for one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub ttl_secs: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

pub struct TtlLruCache<V> {
    name: &'static str,
    capacity: usize,
    ttl: Duration,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> TtlLruCache<V> {
    pub fn new(name: &'static str, capacity: usize, ttl: Duration) -> Self {
        TtlLruCache {
            name,
            capacity: capacity.max(1),
            ttl,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    // A panic while holding the lock leaves the map consistent: every
    // mutation below is a single insert/remove.
    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        inner.tick += 1;
        let tick = inner.tick;

        let expired = match inner.entries.get_mut(key) {
            Some(entry) if entry.inserted.elapsed() < self.ttl => {
                entry.last_used = tick;
                let value = entry.value.clone();
                inner.hits += 1;
                tracing::debug!(cache = self.name, "cache hit");
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            inner.entries.remove(key);
        }
        inner.misses += 1;
        tracing::debug!(cache = self.name, expired, "cache miss");
        None
    }

    /// Insert or replace; last writer wins.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut guard = self.lock();
        let inner = &mut *guard;
        inner.tick += 1;
        let tick = inner.tick;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            let now = Instant::now();
            let ttl = self.ttl;
            inner.entries.retain(|_, e| now.duration_since(e.inserted) < ttl);
            if inner.entries.len() >= self.capacity {
                let oldest = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, e)| e.last_used)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    inner.entries.remove(&oldest);
                    inner.evictions += 1;
                }
            }
        }

        inner.entries.insert(
            key,
            Entry {
                value,
                inserted: Instant::now(),
                last_used: tick,
            },
        );
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        self.lock().entries.remove(key).map(|e| e.value)
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Live and expired-but-unpurged entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|_, e| e.inserted.elapsed() < ttl);
        before - inner.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            entries: inner.entries.len(),
            capacity: self.capacity,
            ttl_secs: self.ttl.as_secs(),
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_get_insert_remove() {
        let cache = TtlLruCache::new("test", 4, Duration::from_secs(60));
        assert_eq!(cache.get("a"), None);
        cache.insert("a", 1);
        cache.insert("a", 2);
        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.remove("a"), Some(2));
        assert!(cache.is_empty());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = TtlLruCache::new("test", 2, Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        // Touch "a" so "b" is the eviction candidate
        assert_eq!(cache.get("a"), Some(1));
        cache.insert("c", 3);

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_entries_expire() {
        let cache = TtlLruCache::new("test", 8, Duration::from_millis(20));
        cache.insert("a", 1);
        cache.insert("b", 2);
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = TtlLruCache::new("test", 8, Duration::from_secs(60));
        for i in 0..5 {
            cache.insert(format!("k{}", i), i);
        }
        assert_eq!(cache.len(), 5);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(TtlLruCache::new("test", 16, Duration::from_secs(60)));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.insert(format!("k{}", (t * 100 + i) % 32), i);
                        let _ = cache.get(&format!("k{}", i % 32));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 16);
    }
}
