//! Rate-limit-aware, cached access to the GitHub REST API.
//!
//! [`GitHubFetcher`] is the entry point: it consults [`ResourceCaches`],
//! calls a [`GitHubGateway`] through [`GitHubRetryPolicy`] on a miss, and
//! walks paginated listings with [`fetch_all_pages`]. Failures are
//! classified into [`crate::error::AppError`] at the gateway boundary so
//! retry decisions can read the status and rate-limit reset.
//!
//! URL parsing and token handling live in [`locator`]; problems found there
//! are reported as [`IntakeError`] before any request is made.

pub mod caches;
pub mod error;
pub mod fetcher;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod rate_limit;
pub mod retry_policy;

pub use caches::{ResourceCaches, ResourceKind, ResourceTtls, spawn_credential_watcher};
pub use error::IntakeError;
pub use fetcher::GitHubFetcher;
pub use gateway::{GitHubGateway, OctocrabGateway, PullRequestState};
pub use locator::{
    PersonalAccessToken, PullRequestLocator, PullRequestNumber, RepositoryLocator, RepositoryName,
    RepositoryOwner, default_api_base,
};
pub use models::{
    PullRequestFile, PullRequestMetadata, PullRequestSummary, RepositorySummary, UserProfile,
};
pub use pagination::{PageCursor, fetch_all_pages};
pub use rate_limit::RateLimitInfo;
pub use retry_policy::{GitHubRetryPolicy, RetryDecision};

#[cfg(test)]
pub use gateway::MockGitHubGateway;

#[cfg(test)]
mod tests;
