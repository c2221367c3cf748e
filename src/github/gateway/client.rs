//! Octocrab client construction.

use std::time::Duration;

use http::Uri;
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use url::Url;

use crate::github::error::IntakeError;
use crate::github::locator::PersonalAccessToken;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds an authenticated Octocrab client for `api_base`.
///
/// Octocrab's retry middleware is disabled; retries happen only in
/// [`crate::github::GitHubRetryPolicy`].
///
/// # Errors
///
/// Returns `IntakeError::InvalidUrl` when the base URI cannot be parsed or
/// `IntakeError::Configuration` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &Url,
) -> Result<Octocrab, IntakeError> {
    let base_uri: Uri = api_base
        .as_str()
        .parse::<Uri>()
        .map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.value())
        .add_retry_config(RetryConfig::None)
        .set_connect_timeout(Some(CONNECT_TIMEOUT))
        .set_read_timeout(Some(READ_TIMEOUT))
        .base_uri(base_uri)
        .map_err(|error| IntakeError::Configuration {
            message: format!("invalid GitHub API base: {error}"),
        })?
        .build()
        .map_err(|error| IntakeError::Configuration {
            message: format!("build GitHub client failed: {error}"),
        })
}
