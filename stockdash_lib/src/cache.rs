//! In-memory TTL caches backed by `DashMap` for concurrent access.
//!
//! The client reads through three named caches (stock snapshots, price
//! history, recommendations). Each one is an explicitly constructed
//! [`ResponseCache`] handed to the client, so lifetime and test isolation
//! are up to the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

/// Point-in-time counters reported by a cache.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries currently stored, including expired ones not yet evicted.
    pub size: usize,
    pub max_size: usize,
    pub ttl_secs: u64,
}

/// Key-value store the client consults before and populates after a request.
///
/// Values are serialized JSON strings. Implementations must tolerate
/// concurrent calls from many in-flight requests.
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: String, value: String);
    /// Drops an entry the caller could not use. The read that returned it
    /// counts as a miss rather than a hit.
    fn invalidate(&self, key: &str);
    fn clear(&self);
    fn stats(&self) -> CacheStats;
}

/// A single cached value with its expiration time.
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// Thread-safe in-memory cache with time-to-live expiration and a size bound.
///
/// Expired entries are lazily evicted on the next `get` for that key.
/// Inserting a new key into a full cache first drops expired entries and
/// then, if still full, the entry closest to expiry. Inserts are serialized
/// so concurrent writers never push the cache past `max_size`.
pub struct MemoryCache {
    store: DashMap<String, CacheEntry>,
    insert_lock: Mutex<()>,
    max_size: usize,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_size` entries, each living for `ttl`.
    /// A `max_size` of zero disables storage.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            store: DashMap::new(),
            insert_lock: Mutex::new(()),
            max_size,
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the cached value for `key`, or `None` if missing or expired.
    pub fn get(&self, key: &str) -> Option<String> {
        let found = match self.store.get(key) {
            Some(entry) if Instant::now() <= entry.expires_at => Some(entry.value.clone()),
            Some(entry) => {
                drop(entry);
                self.store
                    .remove_if(key, |_, e| Instant::now() > e.expires_at);
                None
            }
            None => None,
        };
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Inserts or overwrites a cache entry. The entry expires after the configured TTL.
    pub fn set(&self, key: String, value: String) {
        if self.max_size == 0 {
            return;
        }
        let _guard = self
            .insert_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !self.store.contains_key(&key) && self.store.len() >= self.max_size {
            self.make_room();
        }
        self.store.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    fn make_room(&self) {
        let now = Instant::now();
        self.store.retain(|_, e| e.expires_at >= now);
        if self.store.len() < self.max_size {
            return;
        }
        let oldest = self
            .store
            .iter()
            .min_by_key(|e| e.expires_at)
            .map(|e| e.key().clone());
        if let Some(key) = oldest {
            tracing::debug!("cache full ({} entries), evicting {}", self.max_size, key);
            self.store.remove(&key);
        }
    }

    /// Removes `key` and reclassifies the hit that returned it as a miss.
    pub fn invalidate(&self, key: &str) {
        if self.store.remove(key).is_some() {
            let _ = self
                .hits
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |h| h.checked_sub(1));
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Removes all entries from the cache. Hit/miss counters are kept.
    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.store.len(),
            max_size: self.max_size,
            ttl_secs: self.ttl.as_secs(),
        }
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        MemoryCache::get(self, key)
    }

    fn set(&self, key: String, value: String) {
        MemoryCache::set(self, key, value)
    }

    fn invalidate(&self, key: &str) {
        MemoryCache::invalidate(self, key)
    }

    fn clear(&self) {
        MemoryCache::clear(self)
    }

    fn stats(&self) -> CacheStats {
        MemoryCache::stats(self)
    }
}

/// The three named caches the client reads through.
#[derive(Clone)]
pub struct ApiCaches {
    pub stock_data: Arc<dyn ResponseCache>,
    pub price_history: Arc<dyn ResponseCache>,
    pub recommendations: Arc<dyn ResponseCache>,
}

impl ApiCaches {
    pub fn new(
        stock_data: Arc<dyn ResponseCache>,
        price_history: Arc<dyn ResponseCache>,
        recommendations: Arc<dyn ResponseCache>,
    ) -> Self {
        Self {
            stock_data,
            price_history,
            recommendations,
        }
    }
}

impl Default for ApiCaches {
    /// Stock snapshots: 100 entries for 1 minute. Price history: 50 for
    /// 5 minutes. Recommendations: 10 for 10 minutes.
    fn default() -> Self {
        Self {
            stock_data: Arc::new(MemoryCache::new(100, Duration::from_secs(60))),
            price_history: Arc::new(MemoryCache::new(50, Duration::from_secs(300))),
            recommendations: Arc::new(MemoryCache::new(10, Duration::from_secs(600))),
        }
    }
}

/// Statistics for all three caches, keyed the way the dashboard reports them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsReport {
    pub stock_data: CacheStats,
    pub price_history: CacheStats,
    pub recommendations: CacheStats,
}
