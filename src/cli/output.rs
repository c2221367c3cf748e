//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use revue::IntakeError;
use revue::github::{
    PullRequestFile, PullRequestMetadata, PullRequestSummary, RepositorySummary, UserProfile,
};

/// Everything shown for a single pull request.
pub struct PullRequestView<'a> {
    /// Pull request metadata.
    pub metadata: &'a PullRequestMetadata,
    /// Changed files.
    pub files: &'a [PullRequestFile],
    /// Unified diff.
    pub diff: &'a str,
}

/// Writes a summary of a pull request, its files, and its diff size.
pub fn write_pr_summary_to<W: Write>(
    writer: &mut W,
    view: &PullRequestView<'_>,
) -> Result<(), IntakeError> {
    let metadata = view.metadata;
    let title = metadata
        .title
        .as_deref()
        .unwrap_or("untitled pull request");
    let author = metadata.author.as_deref().unwrap_or("unknown author");
    let url = metadata.html_url.as_deref().unwrap_or("no HTML URL provided");
    let state = metadata.state.as_deref().unwrap_or("unknown");

    writeln!(
        writer,
        "Loaded PR #{} by {author}: {title}\nState: {state}\nURL: {url}",
        metadata.number
    )
    .map_err(|error| io_error(&error))?;

    writeln!(writer, "Files changed: {}", view.files.len()).map_err(|error| io_error(&error))?;
    for file in view.files {
        let status = file.status.as_deref().unwrap_or("modified");
        writeln!(
            writer,
            "  {} [{status}] +{} -{}",
            file.filename, file.additions, file.deletions
        )
        .map_err(|error| io_error(&error))?;
    }

    writeln!(writer, "Diff: {} lines", view.diff.lines().count()).map_err(|error| io_error(&error))
}

/// Writes the pull requests of `repository_name`, one per line.
pub fn write_listing_to<W: Write>(
    writer: &mut W,
    repository_name: &str,
    pull_requests: &[PullRequestSummary],
) -> Result<(), IntakeError> {
    writeln!(writer, "Pull requests for {repository_name}:").map_err(|error| io_error(&error))?;

    for pr in pull_requests {
        let title = pr.title.as_deref().unwrap_or("(no title)");
        let author = pr.author.as_deref().unwrap_or("unknown");
        let state = pr.state.as_deref().unwrap_or("unknown");
        writeln!(writer, "  #{} [{state}] {title} (@{author})", pr.number)
            .map_err(|error| io_error(&error))?;
    }

    writeln!(writer, "{} PRs in total.", pull_requests.len()).map_err(|error| io_error(&error))
}

/// Writes the authenticated user and their repositories.
pub fn write_profile_to<W: Write>(
    writer: &mut W,
    profile: &UserProfile,
    repositories: &[RepositorySummary],
) -> Result<(), IntakeError> {
    let heading = match profile.name.as_deref() {
        Some(name) => format!("Signed in as {} ({name})", profile.login),
        None => format!("Signed in as {}", profile.login),
    };
    writeln!(writer, "{heading}").map_err(|error| io_error(&error))?;

    writeln!(writer, "Repositories: {}", repositories.len()).map_err(|error| io_error(&error))?;
    for repository in repositories {
        let visibility = if repository.private {
            "private"
        } else {
            "public"
        };
        writeln!(writer, "  {} ({visibility})", repository.full_name)
            .map_err(|error| io_error(&error))?;
    }
    Ok(())
}

/// Converts an I/O error to an [`IntakeError::Io`].
pub(crate) fn io_error(error: &io::Error) -> IntakeError {
    IntakeError::Io {
        message: error.to_string(),
    }
}
