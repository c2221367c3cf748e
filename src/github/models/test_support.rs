//! Fixture builders for GitHub models and their JSON payloads.
//!
//! The domain builders feed mocked gateways; the `*_json` builders produce
//! the payload shapes GitHub returns, for HTTP-level tests.
//!
//! # Examples
//!
//! ```
//! use revue::github::models::test_support::{pull_request_summaries, pull_request_summary_json};
//!
//! let page = pull_request_summaries(1..=3);
//! assert_eq!(page.len(), 3);
//! assert_eq!(page[2].number, 3);
//!
//! let json = pull_request_summary_json(7);
//! assert_eq!(json["number"], 7);
//! ```

use std::ops::RangeInclusive;

use serde_json::{Value, json};

use super::{PullRequestFile, PullRequestSummary, RepositorySummary};

/// An open pull request authored by `alice` with the title `PR {number}`.
#[must_use]
pub fn pull_request_summary(number: u64) -> PullRequestSummary {
    PullRequestSummary {
        number,
        title: Some(format!("PR {number}")),
        state: Some("open".to_owned()),
        author: Some("alice".to_owned()),
        ..Default::default()
    }
}

/// One [`pull_request_summary`] per number in `numbers`.
#[must_use]
pub fn pull_request_summaries(numbers: RangeInclusive<u64>) -> Vec<PullRequestSummary> {
    numbers.map(pull_request_summary).collect()
}

/// A public repository owned by the part of `full_name` before the slash.
#[must_use]
pub fn repository(full_name: &str) -> RepositorySummary {
    RepositorySummary {
        full_name: full_name.to_owned(),
        owner: full_name.split('/').next().map(ToOwned::to_owned),
        default_branch: Some("main".to_owned()),
        ..Default::default()
    }
}

/// A modified file with one added line.
#[must_use]
pub fn pull_request_file(filename: &str) -> PullRequestFile {
    PullRequestFile {
        filename: filename.to_owned(),
        status: Some("modified".to_owned()),
        additions: 1,
        deletions: 0,
        patch: Some("@@ -1 +1,2 @@\n+added".to_owned()),
    }
}

/// GitHub's JSON for [`pull_request_summary`].
#[must_use]
pub fn pull_request_summary_json(number: u64) -> Value {
    json!({
        "number": number,
        "title": format!("PR {number}"),
        "state": "open",
        "user": { "login": "alice" },
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-02T00:00:00Z"
    })
}

/// GitHub's JSON array for [`pull_request_summaries`].
#[must_use]
pub fn pull_request_summaries_json(numbers: RangeInclusive<u64>) -> Value {
    Value::Array(numbers.map(pull_request_summary_json).collect())
}

/// GitHub's JSON for pull request metadata.
#[must_use]
pub fn pull_request_json(number: u64) -> Value {
    json!({
        "number": number,
        "title": format!("PR {number}"),
        "body": "Adds retries.",
        "state": "open",
        "html_url": format!("https://github.com/octo/repo/pull/{number}"),
        "user": { "login": "alice" },
        "head": { "ref": "feature", "sha": "abc123" },
        "base": { "ref": "main", "sha": "def456" }
    })
}

/// GitHub's JSON array for one public repository per entry of `full_names`.
#[must_use]
pub fn repositories_json(full_names: &[&str]) -> Value {
    full_names
        .iter()
        .map(|full_name| {
            let owner = full_name.split('/').next().unwrap_or_default();
            json!({
                "full_name": full_name,
                "owner": { "login": owner },
                "private": false,
                "default_branch": "main",
                "html_url": format!("https://github.com/{full_name}")
            })
        })
        .collect()
}

/// GitHub's JSON array for one [`pull_request_file`] per entry of
/// `filenames`.
#[must_use]
pub fn pull_request_files_json(filenames: &[&str]) -> Value {
    filenames
        .iter()
        .map(|filename| {
            json!({
                "filename": filename,
                "status": "modified",
                "additions": 1,
                "deletions": 0,
                "patch": "@@ -1 +1,2 @@\n+added"
            })
        })
        .collect()
}
