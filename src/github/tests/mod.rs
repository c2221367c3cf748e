//! Unit tests for the GitHub access layer.

use rstest::rstest;

use super::{IntakeError, PersonalAccessToken, PullRequestLocator, RepositoryLocator};

mod caches;
mod retry_policy;

// --- PullRequestLocator tests ---

#[rstest]
fn parses_standard_github_url_segments() {
    let locator = PullRequestLocator::parse("https://github.com/octo/repo/pull/12/files")
        .expect("should parse standard GitHub URL");
    assert_eq!(locator.owner().as_str(), "octo", "owner mismatch");
    assert_eq!(locator.repository().as_str(), "repo", "repository mismatch");
    assert_eq!(locator.number().get(), 12_u64, "number mismatch");
    assert_eq!(
        locator.api_base().as_str(),
        "https://api.github.com/",
        "api base mismatch"
    );
}

#[rstest]
fn parses_enterprise_url() {
    let locator = PullRequestLocator::parse("https://ghe.example.com/foo/bar/pull/7")
        .expect("should parse enterprise URL");
    assert_eq!(
        locator.api_base().as_str(),
        "https://ghe.example.com/api/v3",
        "enterprise api base mismatch"
    );
}

#[rstest]
#[case::missing_number("https://github.com/octo/repo/pull/")]
#[case::issues_path("https://github.com/octo/repo/issues/4")]
#[case::pulls_collection("https://github.com/octo/repo/pulls/4")]
#[case::repository_only("https://github.com/octo/repo")]
fn rejects_paths_that_do_not_name_a_pull_request(#[case] url: &str) {
    let result = PullRequestLocator::parse(url);
    assert!(
        matches!(result, Err(IntakeError::MissingPathSegments)),
        "expected MissingPathSegments for {url}, got {result:?}"
    );
}

#[rstest]
#[case::non_numeric("https://github.com/octo/repo/pull/not-a-number")]
#[case::zero("https://github.com/octo/repo/pull/0")]
fn rejects_invalid_numbers(#[case] url: &str) {
    let result = PullRequestLocator::parse(url);
    assert!(
        matches!(result, Err(IntakeError::InvalidPullRequestNumber)),
        "expected InvalidPullRequestNumber for {url}, got {result:?}"
    );
}

#[rstest]
fn rejects_invalid_url() {
    let result = PullRequestLocator::parse("octo/repo/pull/4");
    assert!(
        matches!(result, Err(IntakeError::InvalidUrl(_))),
        "expected InvalidUrl for malformed URL, got {result:?}"
    );
}

#[rstest]
fn pull_request_paths_and_slug() {
    let locator = PullRequestLocator::parse("https://github.com/octo/repo/pull/4")
        .expect("should parse pull request URL");
    assert_eq!(locator.pull_request_path(), "/repos/octo/repo/pulls/4");
    assert_eq!(locator.files_path(), "/repos/octo/repo/pulls/4/files");
    assert_eq!(locator.slug(), "api.github.com/octo/repo#4");
}

// --- RepositoryLocator tests ---

#[rstest]
fn parses_repository_url_with_trailing_path() {
    let locator = RepositoryLocator::parse("https://github.com/octo/repo/pulls")
        .expect("should parse repository URL with trailing path");
    assert_eq!(locator.owner().as_str(), "octo", "owner mismatch");
    assert_eq!(locator.repository().as_str(), "repo", "repository mismatch");
}

#[rstest]
fn repository_slugs_differ_per_host() {
    let public = RepositoryLocator::parse("https://github.com/octo/repo")
        .expect("should parse public URL");
    let enterprise = RepositoryLocator::parse("https://ghe.example.com/octo/repo")
        .expect("should parse enterprise URL");
    assert_ne!(public.slug(), enterprise.slug());
    assert_eq!(public.pulls_path(), enterprise.pulls_path());
}

#[rstest]
#[case::empty_owner("", "repo")]
#[case::empty_repo("octo", "")]
fn repository_locator_rejects_empty_segments(#[case] owner: &str, #[case] repo: &str) {
    let result = RepositoryLocator::from_owner_repo(owner, repo);
    assert!(
        matches!(result, Err(IntakeError::MissingPathSegments)),
        "expected MissingPathSegments, got {result:?}"
    );
}

// --- PersonalAccessToken tests ---

#[rstest]
#[case::empty("")]
#[case::whitespace("   ")]
fn rejects_blank_token(#[case] token: &str) {
    let result = PersonalAccessToken::new(token);
    assert!(
        matches!(result, Err(IntakeError::MissingToken)),
        "expected MissingToken, got {result:?}"
    );
}

#[rstest]
fn token_debug_output_is_redacted() {
    let token = PersonalAccessToken::new("ghp_secret").expect("token should be valid");
    let rendered = format!("{token:?}");
    assert!(!rendered.contains("ghp_secret"), "token leaked: {rendered}");
}

#[rstest]
fn token_fingerprint_is_stable_hex_and_hides_the_token() {
    let first = PersonalAccessToken::new("ghp_secret").expect("token should be valid");
    let second = PersonalAccessToken::new(" ghp_secret ").expect("token should be valid");
    let other = PersonalAccessToken::new("ghp_other").expect("token should be valid");

    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_ne!(first.fingerprint(), other.fingerprint());
    assert_eq!(first.fingerprint().len(), 64);
    assert!(!first.fingerprint().contains("secret"));
}

#[rstest]
fn remote_errors_display_their_code_first() {
    let remote = crate::error::AppError::api(crate::error::ApiReason::NotFound, "no such pull");
    let rendered = IntakeError::from(remote).to_string();
    assert!(
        rendered.starts_with("API_NOT_FOUND: "),
        "unexpected rendering: {rendered}"
    );
}
