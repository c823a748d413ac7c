// ── Generic time-bounded cache ──
//
// Lock-free concurrent map with per-entry fetch timestamps. Staleness is
// checked on read; stale entries are evicted lazily. Uses tokio's clock so
// paused-time tests can step through expiry deterministically.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

/// `(controller, device)` cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub controller: String,
    pub device: String,
}

impl CacheKey {
    pub fn new(controller: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            device: device.into(),
        }
    }
}

struct Entry<V> {
    value: V,
    fetched_at: Instant,
}

/// A concurrent map whose entries are valid while `now - fetched_at < ttl`.
pub struct TtlCache<V: Clone + Send + Sync + 'static> {
    ttl: Duration,
    entries: DashMap<CacheKey, Entry<V>>,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    /// Fresh value for `key`, if any.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let fresh = self.entries.get(key).and_then(|entry| {
            (entry.fetched_at.elapsed() < self.ttl).then(|| entry.value.clone())
        });
        if fresh.is_none() {
            // Lazy eviction; a concurrent re-insert that is still fresh survives.
            self.entries
                .remove_if(key, |_, entry| entry.fetched_at.elapsed() >= self.ttl);
        }
        fresh
    }

    /// Store `value` stamped with the current time. Last write wins.
    pub fn insert(&self, key: CacheKey, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Remove the entry for `key`. Returns `true` if one existed.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
