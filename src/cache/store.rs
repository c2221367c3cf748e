//! The cache store itself.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use super::CacheSettings;
use super::entry::CacheEntry;
use super::stats::CacheStats;

#[derive(Debug)]
struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    next_sequence: u64,
}

/// Bounded, time-expiring key/value store.
///
/// Callers always receive clones; entries are never handed out by reference.
/// All methods take `&self`, so one store can be shared behind an `Arc`.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
/// use std::time::Duration;
///
/// use revue::cache::{CacheSettings, RequestCache};
///
/// let settings = CacheSettings::new(NonZeroUsize::MIN, Duration::from_secs(60));
/// let cache = RequestCache::new(settings);
/// cache.set("first", 1);
/// cache.set("second", 2);
/// assert_eq!(cache.get("first"), None, "capacity one evicts the older entry");
/// assert_eq!(cache.get("second"), Some(2));
/// ```
pub struct RequestCache<V> {
    state: Mutex<CacheState<V>>,
    settings: CacheSettings,
}

impl<V: Clone> RequestCache<V> {
    /// Creates an empty store.
    #[must_use]
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                next_sequence: 0,
            }),
            settings,
        }
    }

    /// Returns the capacity and default TTL.
    #[must_use]
    pub const fn settings(&self) -> CacheSettings {
        self.settings
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or replaces `key` using the default TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.settings.ttl);
    }

    /// Inserts or replaces `key`, expiring `ttl` from now.
    ///
    /// Adding a new key to a full store first evicts the entry inserted
    /// earliest. Replacing an existing key never evicts.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let owned_key = key.into();
        let now = Instant::now();
        let mut state = self.lock();

        let is_new = !state.entries.contains_key(&owned_key);
        if is_new && state.entries.len() >= self.settings.max_size.get() {
            evict_oldest(&mut state.entries);
        }

        let sequence = state.next_sequence;
        state.next_sequence = sequence.wrapping_add(1);
        state
            .entries
            .insert(owned_key, CacheEntry::new(value, now, ttl, sequence));
    }

    /// Returns a clone of the value for `key` if present and not expired.
    ///
    /// Expired entries are reported as misses but left in place until
    /// [`Self::cleanup`] runs.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        self.lock()
            .entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    /// Returns the live value for `key`, or runs `producer` and caches its
    /// output with the default TTL.
    ///
    /// Concurrent misses on the same key are not coalesced: each caller runs
    /// its own producer and the last write wins. Only use this for idempotent
    /// reads.
    ///
    /// # Errors
    ///
    /// Returns the producer's error unchanged; nothing is cached in that case.
    pub async fn get_or_set<F, Fut, E>(&self, key: &str, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.get_or_set_with_ttl(key, self.settings.ttl, producer)
            .await
    }

    /// As [`Self::get_or_set`], caching the produced value for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns the producer's error unchanged; nothing is cached in that case.
    pub async fn get_or_set_with_ttl<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            trace!(key, "cache hit");
            return Ok(value);
        }

        trace!(key, "cache miss");
        let value = producer().await?;
        self.set_with_ttl(key, value.clone(), ttl);
        Ok(value)
    }

    /// Removes `key`, returning whether it was present.
    pub fn invalidate(&self, key: &str) -> bool {
        self.lock().entries.remove(key).is_some()
    }

    /// Removes every expired entry and returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|_, entry| entry.is_live(now));
        before - state.entries.len()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Number of stored entries, including expired ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Partitions stored entries with the same expiry test as [`Self::get`].
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let state = self.lock();
        let total_entries = state.entries.len();
        let valid_entries = state
            .entries
            .values()
            .filter(|entry| entry.is_live(now))
            .count();
        CacheStats {
            total_entries,
            valid_entries,
            expired_entries: total_entries - valid_entries,
            max_size: self.settings.max_size.get(),
        }
    }
}

fn evict_oldest<V>(entries: &mut HashMap<String, CacheEntry<V>>) {
    let oldest = entries
        .iter()
        .min_by_key(|(_, entry)| (entry.inserted_at, entry.sequence))
        .map(|(key, _)| key.clone());

    if let Some(key) = oldest {
        trace!(key = key.as_str(), "evicting oldest cache entry");
        entries.remove(&key);
    }
}

impl<V> fmt::Debug for RequestCache<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RequestCache")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
