//! Cached, retried, paginated reads from GitHub.
//!
//! Every read follows the same path: look the resource up in its cache; on a
//! miss, call the gateway through [`GitHubRetryPolicy`] (page by page for
//! listings) and cache the result only if the whole fetch succeeded. Errors
//! that survive the retry policy reach the caller unchanged and nothing is
//! cached for them.

use std::sync::Arc;

use tracing::debug;

use crate::error::AppError;

use super::caches::ResourceCaches;
use super::gateway::{GitHubGateway, PullRequestState};
use super::locator::{PersonalAccessToken, PullRequestLocator, RepositoryLocator};
use super::models::{
    PullRequestFile, PullRequestMetadata, PullRequestSummary, RepositorySummary, UserProfile,
};
use super::pagination::{PageCursor, fetch_all_pages};
use super::retry_policy::GitHubRetryPolicy;

/// Reads GitHub resources through a shared cache set.
pub struct GitHubFetcher<G> {
    gateway: G,
    caches: Arc<ResourceCaches>,
    policy: GitHubRetryPolicy,
    first_page: PageCursor,
    token_fingerprint: String,
}

impl<G: GitHubGateway> GitHubFetcher<G> {
    /// Creates a fetcher for the account behind `token`.
    ///
    /// Only the token's fingerprint is kept, for namespacing cache keys.
    #[must_use]
    pub fn new(gateway: G, caches: Arc<ResourceCaches>, token: &PersonalAccessToken) -> Self {
        Self {
            gateway,
            caches,
            policy: GitHubRetryPolicy::default(),
            first_page: PageCursor::default(),
            token_fingerprint: token.fingerprint(),
        }
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: GitHubRetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the cursor listings start from, which also fixes their page size.
    #[must_use]
    pub fn with_first_page(mut self, cursor: PageCursor) -> Self {
        self.first_page = cursor;
        self
    }

    /// The cache set shared with other fetchers.
    #[must_use]
    pub const fn caches(&self) -> &Arc<ResourceCaches> {
        &self.caches
    }

    /// The authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns the classified error from the final attempt.
    pub async fn profile(&self) -> Result<UserProfile, AppError> {
        let key = format!("profile:{}", self.token_fingerprint);
        self.caches
            .profile
            .get_or_set(&key, || {
                self.policy
                    .run("authenticated user", || self.gateway.authenticated_user())
            })
            .await
    }

    /// Every repository visible to the token.
    ///
    /// # Errors
    ///
    /// Returns the classified error from the first page whose retries were
    /// exhausted.
    pub async fn repositories(&self) -> Result<Vec<RepositorySummary>, AppError> {
        let key = format!("repos:{}", self.token_fingerprint);
        self.caches
            .repositories
            .get_or_set(&key, || {
                fetch_all_pages(self.first_page, |cursor| {
                    self.policy.run("list repositories", move || {
                        self.gateway.list_repositories_page(cursor)
                    })
                })
            })
            .await
    }

    /// Every pull request in `repository` with the given state.
    ///
    /// # Errors
    ///
    /// Returns the classified error from the first page whose retries were
    /// exhausted.
    pub async fn pull_requests(
        &self,
        repository: &RepositoryLocator,
        state: PullRequestState,
    ) -> Result<Vec<PullRequestSummary>, AppError> {
        let key = format!("pulls:{}:{}:{state}", self.token_fingerprint, repository.slug());
        self.caches
            .pull_requests
            .get_or_set(&key, || {
                fetch_all_pages(self.first_page, |cursor| {
                    self.policy.run("list pull requests", move || {
                        self.gateway
                            .list_pull_requests_page(repository, state, cursor)
                    })
                })
            })
            .await
    }

    /// Metadata for one pull request.
    ///
    /// # Errors
    ///
    /// Returns the classified error from the final attempt.
    pub async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestMetadata, AppError> {
        let key = format!("pull:{}:{}", self.token_fingerprint, locator.slug());
        self.caches
            .pull_request
            .get_or_set(&key, || {
                self.policy
                    .run("pull request", || self.gateway.pull_request(locator))
            })
            .await
    }

    /// Every file changed by the pull request.
    ///
    /// # Errors
    ///
    /// Returns the classified error from the first page whose retries were
    /// exhausted.
    pub async fn pull_request_files(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<PullRequestFile>, AppError> {
        let key = format!("files:{}:{}", self.token_fingerprint, locator.slug());
        self.caches
            .files
            .get_or_set(&key, || {
                fetch_all_pages(self.first_page, |cursor| {
                    self.policy.run("pull request files", move || {
                        self.gateway.list_pull_request_files_page(locator, cursor)
                    })
                })
            })
            .await
    }

    /// The pull request as a unified diff.
    ///
    /// # Errors
    ///
    /// Returns the classified error from the final attempt.
    pub async fn pull_request_diff(&self, locator: &PullRequestLocator) -> Result<String, AppError> {
        let key = format!("diff:{}:{}", self.token_fingerprint, locator.slug());
        self.caches
            .diffs
            .get_or_set(&key, || {
                self.policy
                    .run("pull request diff", || self.gateway.pull_request_diff(locator))
            })
            .await
    }

    /// Drops everything cached, for use after the token changes or is
    /// revoked.
    pub fn invalidate_credentials(&self) {
        self.caches.clear_all();
        debug!("cleared GitHub caches after credential change");
    }
}
