//! Point-in-time cache occupancy.

use serde::Serialize;

/// Snapshot returned by [`super::RequestCache::stats`].
///
/// `valid_entries + expired_entries == total_entries` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries currently stored, live or not.
    pub total_entries: usize,
    /// Entries that `get` would return.
    pub valid_entries: usize,
    /// Entries past their expiry awaiting `cleanup`.
    pub expired_entries: usize,
    /// Configured capacity.
    pub max_size: usize,
}
