//! Bounded in-memory response cache with per-entry expiry.
//!
//! [`RequestCache`] stores cloned values under string keys. Every entry
//! expires `ttl` after it was written; when a new key would push the store
//! past `max_size`, the entry written earliest is evicted first (FIFO by
//! insertion, not by access). Reads never refresh or remove entries, so the
//! expiry of a cached response depends only on when it was fetched.
//!
//! Time is read from [`tokio::time::Instant`], so tests can drive expiry with
//! a paused clock.

mod cleanup;
mod entry;
mod stats;
mod store;

use std::num::NonZeroUsize;
use std::time::Duration;

pub use cleanup::{ExpiringStore, spawn_cleanup_task};
pub use stats::CacheStats;
pub use store::RequestCache;

/// Capacity and default expiry for a [`RequestCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Maximum number of entries held at once.
    pub max_size: NonZeroUsize,
    /// Lifetime applied when `set` is not given an explicit TTL.
    pub ttl: Duration,
}

impl CacheSettings {
    /// Creates settings from a capacity and default TTL.
    #[must_use]
    pub const fn new(max_size: NonZeroUsize, ttl: Duration) -> Self {
        Self { max_size, ttl }
    }
}

impl Default for CacheSettings {
    /// 100 entries living five minutes each.
    fn default() -> Self {
        Self::new(NonZeroUsize::MIN.saturating_add(99), Duration::from_secs(300))
    }
}
