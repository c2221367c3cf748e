//! Rate limit information from the GitHub `rate_limit` endpoint.

use std::time::{SystemTime, UNIX_EPOCH};

/// Snapshot of the core rate limit window.
///
/// # Example
///
/// ```
/// use revue::github::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 0, 0);
/// assert!(info.is_exhausted());
/// assert_eq!(info.seconds_until_reset(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: u32,
    remaining: u32,
    /// Unix timestamp when the window resets.
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a new rate limit snapshot.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Unix timestamp when the window resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true once no requests remain.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Seconds until the window resets, or 0 when it already has (or the
    /// system clock is unavailable).
    #[must_use]
    pub fn seconds_until_reset(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);

        self.reset_at.saturating_sub(now)
    }

    /// Seconds a caller should wait before retrying.
    ///
    /// `None` while requests remain: the limit that was hit is then a
    /// secondary limit whose reset time this snapshot does not describe.
    /// Also `None` once the reset time has passed.
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        if !self.is_exhausted() {
            return None;
        }
        Some(self.seconds_until_reset()).filter(|seconds| *seconds > 0)
    }
}
