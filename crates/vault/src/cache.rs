//! [`TtlCache`]: small, capacity-bounded, time-bounded in-memory cache.
//!
//! Three independent instances back the pipeline (unwrapped DEKs, fetched
//! ciphertext, decrypted plaintext). Each instance owns its own lock.
//!
//! # Semantics
//!
//! - **Expiry** is checked lazily on [`TtlCache::get`]; there is no sweeper.
//! - **TTL granularity** is whole seconds. The configured TTL is rounded down,
//!   so anything under one second (including zero) expires immediately.
//! - **Eviction** is FIFO by insertion *occurrence*, not LRU. Every
//!   [`TtlCache::set`] appends the key to the queue, so a key written several
//!   times holds several slots. When an older slot reaches the front it evicts
//!   the current mapping for that key, and a slot whose key is already gone
//!   still uses up an eviction turn.
//! - **Queue growth.** The queue is only popped when the map is full. A
//!   working set smaller than the capacity whose entries keep expiring and
//!   being re-set grows the queue by one slot per `set` without bound.
//! - **Boundary.** An entry is live while `expires_at > now`; at the exact
//!   expiry instant it is already a miss.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    queue: VecDeque<String>,
}

/// Thread-safe TTL cache keyed by `String`.
pub struct TtlCache<V> {
    capacity: usize,
    ttl: Duration,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache holding at most `capacity` entries, each living for
    /// `ttl` rounded down to whole seconds.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl: Duration::from_secs(ttl.as_secs()),
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                queue: VecDeque::new(),
            }),
        }
    }

    /// Return a clone of the live value for `key`.
    ///
    /// An expired entry is removed before returning `None`.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut inner = self.lock();
        match inner.entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                inner.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or replace `key`, expiring at now + TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let expires_at = Instant::now() + self.ttl;
        let mut inner = self.lock();
        if inner.entries.len() >= self.capacity {
            if let Some(oldest) = inner.queue.pop_front() {
                inner.entries.remove(&oldest);
            }
        }
        inner.entries.insert(key.clone(), Entry { value, expires_at });
        inner.queue.push_back(key);
    }

    /// Number of stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Effective TTL after rounding.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        // The critical sections never panic midway, so a poisoned map is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values are key material or plaintext; never print them.
        f.debug_struct("TtlCache")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
