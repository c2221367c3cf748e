//! Application configuration loaded from CLI, environment, and files.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.revue.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `REVUE_*` (for example `REVUE_TOKEN`), or
//!    `GITHUB_TOKEN` for the token
//! 4. **Command-line arguments** – `--token`/`-t`, `--pr-url`/`-u`, and so on
//!
//! # Configuration File
//!
//! ```toml
//! pr_url = "https://github.com/owner/repo/pull/123"
//! token = "ghp_example"
//! page_size = 50
//! diff_ttl_seconds = 60
//! github_max_retries = 5
//! ```

use std::env;
use std::num::NonZeroUsize;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::cache::CacheSettings;
use crate::github::error::IntakeError;
use crate::github::{GitHubRetryPolicy, PageCursor, ResourceTtls};
use crate::retry::RetryPolicy;

/// Operation mode determined by the configured URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Show one pull request with its files and diff.
    SinglePullRequest,
    /// List open pull requests in a repository.
    RepositoryListing,
    /// Show the authenticated user and their repositories.
    Profile,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use revue::RevueConfig;
///
/// let config = RevueConfig::load().expect("failed to load configuration");
/// config.validate().expect("configuration should be consistent");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "REVUE",
    discovery(
        dotfile_name = ".revue.toml",
        config_file_name = "revue.toml",
        app_name = "revue"
    )
)]
pub struct RevueConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Falls back to `GITHUB_TOKEN` when unset.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Pull request URL to show.
    #[ortho_config(cli_short = 'u')]
    pub pr_url: Option<String>,

    /// Repository URL whose open pull requests should be listed.
    #[ortho_config(cli_short = 'r')]
    pub repo_url: Option<String>,

    /// Items requested per page from list endpoints (1 to 100).
    #[ortho_config()]
    pub page_size: u8,

    /// Maximum entries held by each resource cache.
    #[ortho_config()]
    pub cache_max_size: usize,

    /// Cache entry lifetime, in seconds, for any resource whose own
    /// lifetime is zero.
    #[ortho_config()]
    pub cache_ttl_seconds: u64,

    /// Lifetime of the cached user profile, in seconds (0 uses
    /// `cache_ttl_seconds`).
    #[ortho_config()]
    pub profile_ttl_seconds: u64,

    /// Lifetime of cached repository and pull request listings, in seconds
    /// (0 uses `cache_ttl_seconds`).
    #[ortho_config()]
    pub collection_ttl_seconds: u64,

    /// Lifetime of cached pull request metadata and files, in seconds (0
    /// uses `cache_ttl_seconds`).
    #[ortho_config()]
    pub pull_request_ttl_seconds: u64,

    /// Lifetime of cached diffs, in seconds (0 uses `cache_ttl_seconds`).
    #[ortho_config()]
    pub diff_ttl_seconds: u64,

    /// Interval between sweeps of expired cache entries, in seconds.
    #[ortho_config()]
    pub cache_cleanup_interval_seconds: u64,

    /// Retries after the first GitHub request attempt.
    #[ortho_config()]
    pub github_max_retries: u32,

    /// First GitHub backoff delay, in milliseconds.
    #[ortho_config()]
    pub github_base_delay_ms: u64,

    /// Cap on GitHub backoff delays, in milliseconds. Zero disables the cap.
    ///
    /// Rate-limit waits are never capped.
    #[ortho_config()]
    pub github_max_delay_ms: u64,

    /// Retries after the first AI service attempt.
    #[ortho_config()]
    pub ai_max_retries: u32,

    /// First AI service backoff delay, in milliseconds.
    #[ortho_config()]
    pub ai_base_delay_ms: u64,

    /// Cap on AI service backoff delays, in milliseconds.
    #[ortho_config()]
    pub ai_max_delay_ms: u64,

    /// Multiplier applied to the AI service delay after each failure.
    #[ortho_config()]
    pub ai_backoff_factor: u32,
}

const DEFAULT_PAGE_SIZE: u8 = 100;
const DEFAULT_CACHE_MAX_SIZE: usize = 100;
const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
const DEFAULT_PROFILE_TTL_SECONDS: u64 = 3_600;
const DEFAULT_COLLECTION_TTL_SECONDS: u64 = 600;
const DEFAULT_PULL_REQUEST_TTL_SECONDS: u64 = 300;
const DEFAULT_DIFF_TTL_SECONDS: u64 = 120;
const DEFAULT_CLEANUP_INTERVAL_SECONDS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 1_000;
const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
const DEFAULT_BACKOFF_FACTOR: u32 = 2;

impl Default for RevueConfig {
    fn default() -> Self {
        Self {
            token: None,
            pr_url: None,
            repo_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            cache_max_size: DEFAULT_CACHE_MAX_SIZE,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            profile_ttl_seconds: DEFAULT_PROFILE_TTL_SECONDS,
            collection_ttl_seconds: DEFAULT_COLLECTION_TTL_SECONDS,
            pull_request_ttl_seconds: DEFAULT_PULL_REQUEST_TTL_SECONDS,
            diff_ttl_seconds: DEFAULT_DIFF_TTL_SECONDS,
            cache_cleanup_interval_seconds: DEFAULT_CLEANUP_INTERVAL_SECONDS,
            github_max_retries: DEFAULT_MAX_RETRIES,
            github_base_delay_ms: DEFAULT_BASE_DELAY_MS,
            github_max_delay_ms: DEFAULT_MAX_DELAY_MS,
            ai_max_retries: DEFAULT_MAX_RETRIES,
            ai_base_delay_ms: DEFAULT_BASE_DELAY_MS,
            ai_max_delay_ms: DEFAULT_MAX_DELAY_MS,
            ai_backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl RevueConfig {
    /// Resolves the token from configuration or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, IntakeError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(IntakeError::MissingToken)
    }

    /// Returns the pull request URL.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when `pr_url` is unset.
    pub fn require_pr_url(&self) -> Result<&str, IntakeError> {
        self.pr_url
            .as_deref()
            .ok_or_else(|| configuration_error("pr_url is required"))
    }

    /// Returns the repository URL.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when `repo_url` is unset.
    pub fn require_repo_url(&self) -> Result<&str, IntakeError> {
        self.repo_url
            .as_deref()
            .ok_or_else(|| configuration_error("repo_url is required"))
    }

    /// Determines the operation mode: a pull request URL wins over a
    /// repository URL, and with neither the profile is shown.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.pr_url.is_some() {
            OperationMode::SinglePullRequest
        } else if self.repo_url.is_some() {
            OperationMode::RepositoryListing
        } else {
            OperationMode::Profile
        }
    }

    /// Checks that sizes are non-zero and delay bounds are ordered.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] describing the first
    /// inconsistency, or [`IntakeError::InvalidPagination`] for a page size
    /// outside `1..=100`.
    pub fn validate(&self) -> Result<(), IntakeError> {
        self.first_page()?;
        self.cache_settings()?;

        if self.cache_ttl_seconds == 0 {
            return Err(configuration_error("cache_ttl_seconds must be at least 1"));
        }

        if self.cache_cleanup_interval_seconds == 0 {
            return Err(configuration_error(
                "cache_cleanup_interval_seconds must be at least 1",
            ));
        }

        if self.github_max_delay_ms != 0 && self.github_max_delay_ms < self.github_base_delay_ms
        {
            return Err(configuration_error(
                "github_max_delay_ms must not be below github_base_delay_ms",
            ));
        }

        if self.ai_max_delay_ms < self.ai_base_delay_ms {
            return Err(configuration_error(
                "ai_max_delay_ms must not be below ai_base_delay_ms",
            ));
        }

        if self.ai_backoff_factor == 0 {
            return Err(configuration_error("ai_backoff_factor must be at least 1"));
        }

        Ok(())
    }

    /// Capacity and default lifetime for each resource cache.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when `cache_max_size` is zero.
    pub fn cache_settings(&self) -> Result<CacheSettings, IntakeError> {
        let max_size = NonZeroUsize::new(self.cache_max_size)
            .ok_or_else(|| configuration_error("cache_max_size must be at least 1"))?;
        Ok(CacheSettings::new(
            max_size,
            Duration::from_secs(self.cache_ttl_seconds),
        ))
    }

    /// Per-resource cache lifetimes, with zero entries replaced by
    /// `cache_ttl_seconds`.
    #[must_use]
    pub const fn resource_ttls(&self) -> ResourceTtls {
        ResourceTtls {
            profile: self.ttl_or_default(self.profile_ttl_seconds),
            collections: self.ttl_or_default(self.collection_ttl_seconds),
            pull_request: self.ttl_or_default(self.pull_request_ttl_seconds),
            diff: self.ttl_or_default(self.diff_ttl_seconds),
        }
    }

    const fn ttl_or_default(&self, seconds: u64) -> Duration {
        if seconds == 0 {
            Duration::from_secs(self.cache_ttl_seconds)
        } else {
            Duration::from_secs(seconds)
        }
    }

    /// Interval between sweeps of expired cache entries.
    #[must_use]
    pub const fn cache_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cache_cleanup_interval_seconds)
    }

    /// Retry policy for GitHub requests.
    #[must_use]
    pub const fn github_retry_policy(&self) -> GitHubRetryPolicy {
        let max_delay = if self.github_max_delay_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.github_max_delay_ms))
        };
        GitHubRetryPolicy::new(
            self.github_max_retries,
            Duration::from_millis(self.github_base_delay_ms),
            max_delay,
        )
    }

    /// Retry policy for AI service calls, using the default predicate.
    #[must_use]
    pub fn ai_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_retries(self.ai_max_retries)
            .with_base_delay(Duration::from_millis(self.ai_base_delay_ms))
            .with_max_delay(Duration::from_millis(self.ai_max_delay_ms))
            .with_backoff_factor(self.ai_backoff_factor)
    }

    /// Cursor for the first page of any listing.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidPagination`] when `page_size` is outside
    /// `1..=100`.
    pub fn first_page(&self) -> Result<PageCursor, IntakeError> {
        PageCursor::first(self.page_size)
    }
}

fn configuration_error(message: &str) -> IntakeError {
    IntakeError::Configuration {
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests;
