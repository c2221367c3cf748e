//! Single pull request loading operation.

use std::io::{self, Write};

use revue::github::GitHubGateway;
use revue::{GitHubFetcher, IntakeError, PullRequestLocator, RevueConfig};
use tracing::debug;

use super::FetchSession;
use super::output::{PullRequestView, write_pr_summary_to};

/// Loads a single pull request by URL and prints its summary.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] if required configuration is
/// missing, and [`IntakeError::Remote`] if a request fails after retries.
pub async fn run(config: &RevueConfig) -> Result<(), IntakeError> {
    let locator = PullRequestLocator::parse(config.require_pr_url()?)?;
    let session = FetchSession::connect(config, locator.api_base())?;

    let mut stdout = io::stdout().lock();
    run_with_fetcher(session.fetcher(), &locator, &mut stdout).await
}

/// Loads the metadata, files, and diff of `locator` concurrently and writes
/// the summary to `writer`.
///
/// # Errors
///
/// Returns [`IntakeError::Remote`] for the first failed read, or
/// [`IntakeError::Io`] when writing fails.
pub async fn run_with_fetcher<G, W>(
    fetcher: &GitHubFetcher<G>,
    locator: &PullRequestLocator,
    writer: &mut W,
) -> Result<(), IntakeError>
where
    G: GitHubGateway,
    W: Write,
{
    let (metadata, files, diff) = tokio::try_join!(
        fetcher.pull_request(locator),
        fetcher.pull_request_files(locator),
        fetcher.pull_request_diff(locator),
    )?;

    for (kind, stats) in fetcher.caches().stats() {
        debug!(cache = kind.as_str(), ?stats, "cache statistics");
    }

    let view = PullRequestView {
        metadata: &metadata,
        files: &files,
        diff: &diff,
    };
    write_pr_summary_to(writer, &view)
}
