//! A single cached value and its expiry stamps.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub(super) struct CacheEntry<V> {
    pub(super) value: V,
    pub(super) inserted_at: Instant,
    /// `None` when `inserted_at + ttl` is not representable; such entries
    /// never expire.
    pub(super) expires_at: Option<Instant>,
    /// Monotonic write counter. Orders entries stamped at the same instant.
    pub(super) sequence: u64,
}

impl<V> CacheEntry<V> {
    pub(super) fn new(value: V, now: Instant, ttl: Duration, sequence: u64) -> Self {
        Self {
            value,
            inserted_at: now,
            expires_at: now.checked_add(ttl),
            sequence,
        }
    }

    /// An entry is live strictly before its expiry instant.
    pub(super) fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}
