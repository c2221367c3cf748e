//! The set of caches backing [`super::GitHubFetcher`].
//!
//! Each GitHub resource type gets its own [`RequestCache`] with a TTL suited
//! to how often it changes: profiles rarely, diffs often. The set is created
//! once by the caller and shared through an `Arc`.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheSettings, CacheStats, ExpiringStore, RequestCache};

use super::models::{
    PullRequestFile, PullRequestMetadata, PullRequestSummary, RepositorySummary, UserProfile,
};

/// The resource types cached by the fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// The authenticated user.
    Profile,
    /// Repositories visible to the token.
    Repositories,
    /// Pull request listings per repository and state.
    PullRequests,
    /// Single pull request metadata.
    PullRequest,
    /// Files changed by a pull request.
    Files,
    /// Unified diffs.
    Diff,
}

impl ResourceKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 6] = [
        Self::Profile,
        Self::Repositories,
        Self::PullRequests,
        Self::PullRequest,
        Self::Files,
        Self::Diff,
    ];

    /// Returns the `snake_case` identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Repositories => "repositories",
            Self::PullRequests => "pull_requests",
            Self::PullRequest => "pull_request",
            Self::Files => "files",
            Self::Diff => "diff",
        }
    }
}

/// Per-resource lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTtls {
    /// Lifetime of the authenticated user's profile.
    pub profile: Duration,
    /// Lifetime of repository and pull request listings.
    pub collections: Duration,
    /// Lifetime of pull request metadata and changed files.
    pub pull_request: Duration,
    /// Lifetime of diffs.
    pub diff: Duration,
}

impl ResourceTtls {
    /// Lifetime used for `kind`.
    #[must_use]
    pub const fn for_kind(&self, kind: ResourceKind) -> Duration {
        match kind {
            ResourceKind::Profile => self.profile,
            ResourceKind::Repositories | ResourceKind::PullRequests => self.collections,
            ResourceKind::PullRequest | ResourceKind::Files => self.pull_request,
            ResourceKind::Diff => self.diff,
        }
    }
}

impl Default for ResourceTtls {
    fn default() -> Self {
        Self {
            profile: Duration::from_secs(3600),
            collections: Duration::from_secs(600),
            pull_request: Duration::from_secs(300),
            diff: Duration::from_secs(120),
        }
    }
}

/// One [`RequestCache`] per [`ResourceKind`].
#[derive(Debug)]
pub struct ResourceCaches {
    pub(super) profile: RequestCache<UserProfile>,
    pub(super) repositories: RequestCache<Vec<RepositorySummary>>,
    pub(super) pull_requests: RequestCache<Vec<PullRequestSummary>>,
    pub(super) pull_request: RequestCache<PullRequestMetadata>,
    pub(super) files: RequestCache<Vec<PullRequestFile>>,
    pub(super) diffs: RequestCache<String>,
}

impl ResourceCaches {
    /// Creates empty stores sharing `settings.max_size`, each with its own TTL.
    #[must_use]
    pub fn new(settings: CacheSettings, ttls: ResourceTtls) -> Self {
        let store_settings =
            |kind: ResourceKind| CacheSettings::new(settings.max_size, ttls.for_kind(kind));
        Self {
            profile: RequestCache::new(store_settings(ResourceKind::Profile)),
            repositories: RequestCache::new(store_settings(ResourceKind::Repositories)),
            pull_requests: RequestCache::new(store_settings(ResourceKind::PullRequests)),
            pull_request: RequestCache::new(store_settings(ResourceKind::PullRequest)),
            files: RequestCache::new(store_settings(ResourceKind::Files)),
            diffs: RequestCache::new(store_settings(ResourceKind::Diff)),
        }
    }

    /// Empties every store.
    pub fn clear_all(&self) {
        self.profile.clear();
        self.repositories.clear();
        self.pull_requests.clear();
        self.pull_request.clear();
        self.files.clear();
        self.diffs.clear();
    }

    /// Occupancy of the store for `kind`.
    #[must_use]
    pub fn stats_for(&self, kind: ResourceKind) -> CacheStats {
        match kind {
            ResourceKind::Profile => self.profile.stats(),
            ResourceKind::Repositories => self.repositories.stats(),
            ResourceKind::PullRequests => self.pull_requests.stats(),
            ResourceKind::PullRequest => self.pull_request.stats(),
            ResourceKind::Files => self.files.stats(),
            ResourceKind::Diff => self.diffs.stats(),
        }
    }

    /// Occupancy of every store.
    #[must_use]
    pub fn stats(&self) -> Vec<(ResourceKind, CacheStats)> {
        ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, self.stats_for(kind)))
            .collect()
    }
}

impl ExpiringStore for ResourceCaches {
    fn cleanup(&self) -> usize {
        self.profile.cleanup()
            + self.repositories.cleanup()
            + self.pull_requests.cleanup()
            + self.pull_request.cleanup()
            + self.files.cleanup()
            + self.diffs.cleanup()
    }
}

/// Clears every store whenever the watched credential value changes.
///
/// Send a new value (a token generation, a fingerprint, a sign-out marker)
/// on the paired sender after the credentials change. The task ends when
/// the sender is dropped.
pub fn spawn_credential_watcher<T>(
    caches: Arc<ResourceCaches>,
    mut credentials: watch::Receiver<T>,
) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
{
    tokio::spawn(async move {
        while credentials.changed().await.is_ok() {
            caches.clear_all();
            info!("credentials changed; cleared GitHub caches");
        }
        debug!("credential watcher stopped");
    })
}
