//! Content-addressed result cache
//!
//! Conversions are memoized by input fingerprint. The cache is an
//! explicitly constructed object with injectable capacity and
//! time-to-live, owned by whatever process-level context needs one;
//! multiple independent caches per process are fine.
//!
//! Semantics:
//!
//! - A lookup hits only when the entry exists and is younger than the TTL.
//!   An expired entry answers "miss" but is not removed - reclamation is
//!   lazy, by overwrite or by capacity eviction.
//! - Storing a new key at capacity first evicts the single oldest entry by
//!   insertion order. This is FIFO, not LRU: lookups never reorder the
//!   queue. Overwriting an existing key refreshes its content and
//!   timestamp without touching insertion order and never evicts.
//!
//! A single `RwLock` guards the map and the order queue together, so
//! readers never observe a half-applied eviction. Hits take the read lock
//! and run concurrently; the write path holds the lock for one map
//! mutation plus at most one eviction.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Default maximum number of cached conversions
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default entry time-to-live
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    content: String,
    stored_at: Instant,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Insertion order, oldest first; drives FIFO eviction
    order: VecDeque<String>,
}

/// Fingerprint-keyed cache of rendered Markdown
pub struct ConversionCache {
    inner: RwLock<CacheInner>,
    capacity: usize,
    ttl: Duration,
}

impl ConversionCache {
    /// Create a cache with the given capacity and time-to-live.
    ///
    /// A capacity of zero disables storage entirely: every lookup misses.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
            ttl,
        }
    }

    /// Look up a fingerprint, honoring the TTL.
    ///
    /// Expired entries answer `None` without being removed.
    pub fn lookup(&self, fingerprint: &str) -> Option<String> {
        let inner = match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let entry = inner.entries.get(fingerprint)?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(entry.content.clone())
        } else {
            None
        }
    }

    /// Insert or overwrite the entry for a fingerprint.
    ///
    /// A new key at capacity evicts the oldest insertion first; an
    /// overwrite leaves the insertion order untouched.
    pub fn store(&self, fingerprint: &str, content: String) {
        if self.capacity == 0 {
            return;
        }

        let mut inner = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let is_new = !inner.entries.contains_key(fingerprint);
        if is_new {
            if inner.entries.len() >= self.capacity
                && let Some(oldest) = inner.order.pop_front()
            {
                inner.entries.remove(&oldest);
            }
            inner.order.push_back(fingerprint.to_string());
        }

        inner.entries.insert(
            fingerprint.to_string(),
            CacheEntry {
                content,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of physically present entries, expired ones included
    pub fn len(&self) -> usize {
        let inner = match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        inner.entries.len()
    }

    /// True when no entries are physically present
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ConversionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}
