//! Repository pull request listing operation.

use std::io::{self, Write};

use revue::github::GitHubGateway;
use revue::{GitHubFetcher, IntakeError, PullRequestState, RepositoryLocator, RevueConfig};

use super::FetchSession;
use super::output::write_listing_to;

/// Lists the open pull requests of the configured repository.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] if required configuration is
/// missing, and [`IntakeError::Remote`] if a page fails after retries.
pub async fn run(config: &RevueConfig) -> Result<(), IntakeError> {
    let locator = RepositoryLocator::parse(config.require_repo_url()?)?;
    let session = FetchSession::connect(config, locator.api_base())?;

    let mut stdout = io::stdout().lock();
    run_with_fetcher(session.fetcher(), &locator, &mut stdout).await
}

/// Lists every open pull request of `locator` into `writer`.
///
/// # Errors
///
/// Returns [`IntakeError::Remote`] if a page fails after retries, or
/// [`IntakeError::Io`] when writing fails.
pub async fn run_with_fetcher<G, W>(
    fetcher: &GitHubFetcher<G>,
    locator: &RepositoryLocator,
    writer: &mut W,
) -> Result<(), IntakeError>
where
    G: GitHubGateway,
    W: Write,
{
    let pull_requests = fetcher
        .pull_requests(locator, PullRequestState::Open)
        .await?;
    let name = format!(
        "{}/{}",
        locator.owner().as_str(),
        locator.repository().as_str()
    );
    write_listing_to(writer, &name, &pull_requests)
}
