//! Data models for the GitHub resources a review session reads.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into public domain types.

use serde::Deserialize;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// The authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    /// Login name.
    pub login: String,
    /// Display name if set.
    pub name: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Profile page URL.
    pub html_url: Option<String>,
}

/// A repository visible to the authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySummary {
    /// `owner/name`.
    pub full_name: String,
    /// Owner login if present.
    pub owner: Option<String>,
    /// Whether the repository is private.
    pub private: bool,
    /// Default branch name.
    pub default_branch: Option<String>,
    /// Repository page URL.
    pub html_url: Option<String>,
}

/// Lightweight pull request summary for listing views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestSummary {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// State (e.g. open, closed).
    pub state: Option<String>,
    /// Author login if present.
    pub author: Option<String>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
    /// Last update timestamp (ISO 8601 format).
    pub updated_at: Option<String>,
}

/// Pull request metadata shown above the diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestMetadata {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// Description body.
    pub body: Option<String>,
    /// State (e.g. open, closed).
    pub state: Option<String>,
    /// HTML URL for displaying to a user.
    pub html_url: Option<String>,
    /// Author login if present.
    pub author: Option<String>,
    /// Head commit SHA.
    pub head_sha: Option<String>,
    /// Base branch name.
    pub base_ref: Option<String>,
}

/// A file changed by a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestFile {
    /// Path of the file after the change.
    pub filename: String,
    /// Change kind (added, modified, removed, renamed).
    pub status: Option<String>,
    /// Lines added.
    pub additions: u64,
    /// Lines removed.
    pub deletions: u64,
    /// Unified diff hunk; absent for binary or very large files.
    pub patch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) avatar_url: Option<String>,
    pub(crate) html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) full_name: String,
    pub(crate) owner: Option<ApiUser>,
    #[serde(default)]
    pub(crate) private: bool,
    pub(crate) default_branch: Option<String>,
    pub(crate) html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestSummary {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) created_at: Option<String>,
    pub(crate) updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBranch {
    #[serde(rename = "ref")]
    pub(crate) branch_ref: Option<String>,
    pub(crate) sha: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) html_url: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) head: Option<ApiBranch>,
    pub(crate) base: Option<ApiBranch>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestFile {
    pub(crate) filename: String,
    pub(crate) status: Option<String>,
    #[serde(default)]
    pub(crate) additions: u64,
    #[serde(default)]
    pub(crate) deletions: u64,
    pub(crate) patch: Option<String>,
}

impl From<ApiUser> for UserProfile {
    fn from(value: ApiUser) -> Self {
        Self {
            login: value.login.unwrap_or_default(),
            name: value.name,
            avatar_url: value.avatar_url,
            html_url: value.html_url,
        }
    }
}

impl From<ApiRepository> for RepositorySummary {
    fn from(value: ApiRepository) -> Self {
        Self {
            full_name: value.full_name,
            owner: value.owner.and_then(|owner| owner.login),
            private: value.private,
            default_branch: value.default_branch,
            html_url: value.html_url,
        }
    }
}

impl From<ApiPullRequestSummary> for PullRequestSummary {
    fn from(value: ApiPullRequestSummary) -> Self {
        Self {
            number: value.number,
            title: value.title,
            state: value.state,
            author: value.user.and_then(|user| user.login),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<ApiPullRequest> for PullRequestMetadata {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title,
            body: value.body,
            state: value.state,
            html_url: value.html_url,
            author: value.user.and_then(|user| user.login),
            head_sha: value.head.and_then(|head| head.sha),
            base_ref: value.base.and_then(|base| base.branch_ref),
        }
    }
}

impl From<ApiPullRequestFile> for PullRequestFile {
    fn from(value: ApiPullRequestFile) -> Self {
        Self {
            filename: value.filename,
            status: value.status,
            additions: value.additions,
            deletions: value.deletions,
            patch: value.patch,
        }
    }
}
