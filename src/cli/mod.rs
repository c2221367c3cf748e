//! CLI operation mode handlers.
//!
//! This module contains the implementations for each operation mode:
//! - [`profile`]: Show the authenticated user and their repositories
//! - [`repository_listing`]: List open pull requests for a repository
//! - [`single_pr`]: Load one pull request with its files and diff
//!
//! Output formatting utilities are in [`output`].

use std::sync::Arc;

use revue::cache::spawn_cleanup_task;
use revue::{
    GitHubFetcher, IntakeError, OctocrabGateway, PersonalAccessToken, ResourceCaches, RevueConfig,
};
use tokio::task::JoinHandle;
use url::Url;

pub mod output;
pub mod profile;
pub mod repository_listing;
pub mod single_pr;

/// A configured fetcher plus the task sweeping its caches.
///
/// Dropping the session stops the sweeper.
pub struct FetchSession {
    fetcher: GitHubFetcher<OctocrabGateway>,
    cleanup: JoinHandle<()>,
}

impl FetchSession {
    /// Builds a fetcher for `api_base` from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingToken`] when no token is configured,
    /// [`IntakeError::Configuration`] or [`IntakeError::InvalidPagination`]
    /// when settings are unusable, and [`IntakeError::InvalidUrl`] when the
    /// client cannot target `api_base`.
    pub fn connect(config: &RevueConfig, api_base: &Url) -> Result<Self, IntakeError> {
        let token = PersonalAccessToken::new(config.resolve_token()?)?;
        let caches = Arc::new(ResourceCaches::new(
            config.cache_settings()?,
            config.resource_ttls(),
        ));
        let gateway = OctocrabGateway::for_token(&token, api_base)?;
        let fetcher = GitHubFetcher::new(gateway, Arc::clone(&caches), &token)
            .with_retry_policy(config.github_retry_policy())
            .with_first_page(config.first_page()?);
        let cleanup = spawn_cleanup_task(caches, config.cache_cleanup_interval());

        Ok(Self { fetcher, cleanup })
    }

    /// The session's fetcher.
    #[must_use]
    pub const fn fetcher(&self) -> &GitHubFetcher<OctocrabGateway> {
        &self.fetcher
    }
}

impl Drop for FetchSession {
    fn drop(&mut self) {
        self.cleanup.abort();
    }
}
