//! Octocrab implementation of [`GitHubGateway`].
//!
//! Requests go through Octocrab's raw `_get_with_headers` so the response
//! headers stay visible: GitHub reports secondary rate limits through
//! `retry-after` and `x-ratelimit-*` rather than the body.

use async_trait::async_trait;
use http::Uri;
use http::header::HeaderMap;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ApiReason, AppError};
use crate::github::error::IntakeError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator, RepositoryLocator};
use crate::github::models::{
    ApiPullRequest, ApiPullRequestFile, ApiPullRequestSummary, ApiRepository, ApiUser,
    PullRequestFile, PullRequestMetadata, PullRequestSummary, RepositorySummary, UserProfile,
};
use crate::github::pagination::PageCursor;
use crate::github::rate_limit::RateLimitInfo;

use super::client::build_octocrab_client;
use super::error_mapping::{map_http_error, map_octocrab_error};
use super::http_utils::{diff_headers, extract_github_message, rate_limit_hint};
use super::{GitHubGateway, PullRequestState};

/// Octocrab-backed gateway.
pub struct OctocrabGateway {
    client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` when the base URI cannot be parsed or
    /// `IntakeError::Configuration` when Octocrab fails to construct a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &Url) -> Result<Self, IntakeError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }

    /// Fetches `route` and returns the body of a successful response.
    async fn get_body(
        &self,
        operation: &str,
        route: &str,
        headers: Option<HeaderMap>,
    ) -> Result<String, AppError> {
        let uri: Uri = route.parse::<Uri>().map_err(|error| {
            AppError::api(
                ApiReason::ServerError,
                format!("{operation} failed: invalid path: {error}"),
            )
        })?;

        let response = match self.client._get_with_headers(uri, headers).await {
            Ok(response) => response,
            Err(error) => {
                return Err(self
                    .with_rate_limit_reset(map_octocrab_error(operation, &error), None)
                    .await);
            }
        };

        let status = response.status();
        let hint = rate_limit_hint(response.headers());
        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        if status.is_success() {
            return Ok(body);
        }

        let (message, documentation_url) = extract_github_message(&body);
        let error = map_http_error(
            operation,
            status,
            message.as_deref().unwrap_or("unknown error"),
            documentation_url.as_deref(),
        );
        Err(self.with_rate_limit_reset(error, hint).await)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        route: &str,
    ) -> Result<T, AppError> {
        let body = self.get_body(operation, route, None).await?;
        serde_json::from_str(&body).map_err(|error| {
            AppError::api(
                ApiReason::ServerError,
                format!("{operation} failed: unexpected response body: {error}"),
            )
        })
    }

    /// Attaches a wait to a rate-limit error that lacks one.
    ///
    /// The response's own headers win; otherwise the core window's reset is
    /// used when that window is exhausted.
    async fn with_rate_limit_reset(&self, error: AppError, hint: Option<u64>) -> AppError {
        let is_rate_limit = matches!(
            error,
            AppError::Api {
                reason: ApiReason::RateLimit,
                retry_after: None,
                ..
            }
        );
        if !is_rate_limit {
            return error;
        }

        if let Some(seconds) = hint {
            debug!(seconds, "rate limit wait taken from response headers");
            return error.with_retry_after(seconds);
        }

        match self
            .fetch_rate_limit_info()
            .await
            .and_then(|info| info.retry_after())
        {
            Some(seconds) => {
                debug!(seconds, "rate limit resets later");
                error.with_retry_after(seconds)
            }
            None => error,
        }
    }

    async fn fetch_rate_limit_info(&self) -> Option<RateLimitInfo> {
        let rate = self.client.ratelimit().get().await.ok()?.rate;
        let Ok(limit) = u32::try_from(rate.limit) else {
            return None;
        };
        let Ok(remaining) = u32::try_from(rate.remaining) else {
            return None;
        };
        Some(RateLimitInfo::new(limit, remaining, rate.reset))
    }
}

fn paged_route(route: &str, cursor: PageCursor) -> String {
    format!(
        "{route}?page={}&per_page={}",
        cursor.page(),
        cursor.per_page()
    )
}

#[async_trait]
impl GitHubGateway for OctocrabGateway {
    async fn authenticated_user(&self) -> Result<UserProfile, AppError> {
        self.get_json::<ApiUser>("authenticated user", "/user")
            .await
            .map(ApiUser::into)
    }

    async fn list_repositories_page(
        &self,
        cursor: PageCursor,
    ) -> Result<Vec<RepositorySummary>, AppError> {
        let page: Vec<ApiRepository> = self
            .get_json("list repositories", &paged_route("/user/repos", cursor))
            .await?;
        Ok(page.into_iter().map(ApiRepository::into).collect())
    }

    async fn list_pull_requests_page(
        &self,
        repository: &RepositoryLocator,
        state: PullRequestState,
        cursor: PageCursor,
    ) -> Result<Vec<PullRequestSummary>, AppError> {
        let route = format!(
            "{}&state={}",
            paged_route(&repository.pulls_path(), cursor),
            state.as_str()
        );
        let page: Vec<ApiPullRequestSummary> = self.get_json("list pulls", &route).await?;
        Ok(page.into_iter().map(ApiPullRequestSummary::into).collect())
    }

    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestMetadata, AppError> {
        self.get_json::<ApiPullRequest>("pull request", &locator.pull_request_path())
            .await
            .map(ApiPullRequest::into)
    }

    async fn list_pull_request_files_page(
        &self,
        locator: &PullRequestLocator,
        cursor: PageCursor,
    ) -> Result<Vec<PullRequestFile>, AppError> {
        let page: Vec<ApiPullRequestFile> = self
            .get_json(
                "pull request files",
                &paged_route(&locator.files_path(), cursor),
            )
            .await?;
        Ok(page.into_iter().map(ApiPullRequestFile::into).collect())
    }

    async fn pull_request_diff(&self, locator: &PullRequestLocator) -> Result<String, AppError> {
        self.get_body(
            "pull request diff",
            &locator.pull_request_path(),
            Some(diff_headers()),
        )
        .await
    }
}
