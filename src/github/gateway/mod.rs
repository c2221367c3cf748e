//! Gateway for reading GitHub resources through Octocrab.
//!
//! [`GitHubGateway`] is the seam between the fetch orchestrator and the
//! network: one method per resource, each returning a classified
//! [`AppError`] on failure. The trait is mocked in tests while
//! [`OctocrabGateway`] performs real HTTP requests.

mod client;
mod error_mapping;
mod http_utils;
mod octocrab_gateway;

pub use octocrab_gateway::OctocrabGateway;

use std::fmt;

use async_trait::async_trait;

use crate::error::AppError;
use crate::github::locator::{PullRequestLocator, RepositoryLocator};
use crate::github::models::{
    PullRequestFile, PullRequestMetadata, PullRequestSummary, RepositorySummary, UserProfile,
};
use crate::github::pagination::PageCursor;

/// Pull request state filter for listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PullRequestState {
    /// Only open pull requests.
    #[default]
    Open,
    /// Only closed pull requests.
    Closed,
    /// All pull requests regardless of state.
    All,
}

impl PullRequestState {
    /// Returns the API parameter value for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Read access to the GitHub resources a review session needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubGateway: Send + Sync {
    /// Fetch the user the token belongs to.
    async fn authenticated_user(&self) -> Result<UserProfile, AppError>;

    /// Fetch one page of repositories visible to the token.
    async fn list_repositories_page(
        &self,
        cursor: PageCursor,
    ) -> Result<Vec<RepositorySummary>, AppError>;

    /// Fetch one page of pull requests in `repository`.
    async fn list_pull_requests_page(
        &self,
        repository: &RepositoryLocator,
        state: PullRequestState,
        cursor: PageCursor,
    ) -> Result<Vec<PullRequestSummary>, AppError>;

    /// Fetch pull request metadata.
    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestMetadata, AppError>;

    /// Fetch one page of files changed by the pull request.
    async fn list_pull_request_files_page(
        &self,
        locator: &PullRequestLocator,
        cursor: PageCursor,
    ) -> Result<Vec<PullRequestFile>, AppError>;

    /// Fetch the pull request as a unified diff.
    async fn pull_request_diff(&self, locator: &PullRequestLocator) -> Result<String, AppError>;
}
