//! Authenticated user profile operation.

use std::io::{self, Write};

use revue::github::{GitHubGateway, default_api_base};
use revue::{GitHubFetcher, IntakeError, RevueConfig};

use super::FetchSession;
use super::output::write_profile_to;

/// Shows the authenticated user and their repositories.
///
/// # Errors
///
/// Returns [`IntakeError::MissingToken`] when no token is configured, and
/// [`IntakeError::Remote`] if a request fails after retries.
pub async fn run(config: &RevueConfig) -> Result<(), IntakeError> {
    let api_base = default_api_base()?;
    let session = FetchSession::connect(config, &api_base)?;

    let mut stdout = io::stdout().lock();
    run_with_fetcher(session.fetcher(), &mut stdout).await
}

/// Fetches the profile and repositories concurrently and writes them to
/// `writer`.
///
/// # Errors
///
/// Returns [`IntakeError::Remote`] for the first failed read, or
/// [`IntakeError::Io`] when writing fails.
pub async fn run_with_fetcher<G, W>(
    fetcher: &GitHubFetcher<G>,
    writer: &mut W,
) -> Result<(), IntakeError>
where
    G: GitHubGateway,
    W: Write,
{
    let (profile, repositories) = tokio::try_join!(fetcher.profile(), fetcher.repositories())?;
    write_profile_to(writer, &profile, &repositories)
}
