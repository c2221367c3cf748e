//! Tests for the GitHub retry policy.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use rstest::{fixture, rstest};
use tokio::time::Instant;

use crate::error::{ApiReason, AppError, AuthReason, LlmReason};
use crate::github::{GitHubRetryPolicy, RetryDecision};

#[fixture]
fn policy() -> GitHubRetryPolicy {
    GitHubRetryPolicy::default()
}

fn retry_after(seconds: u64) -> RetryDecision {
    RetryDecision::RetryAfter(Duration::from_secs(seconds))
}

#[rstest]
#[case::invalid_token(AuthReason::InvalidToken)]
#[case::expired_token(AuthReason::ExpiredToken)]
#[case::permissions(AuthReason::InsufficientPermissions)]
#[case::network(AuthReason::NetworkError)]
fn auth_errors_are_never_retried(policy: GitHubRetryPolicy, #[case] reason: AuthReason) {
    let error = AppError::auth(reason, "rejected");
    assert_eq!(policy.decide(&error, 0), RetryDecision::GiveUp);
}

#[rstest]
#[case::not_found(ApiReason::NotFound, 404)]
#[case::forbidden(ApiReason::Forbidden, 403)]
#[case::unprocessable(ApiReason::Forbidden, 422)]
fn client_errors_are_not_retried(
    policy: GitHubRetryPolicy,
    #[case] reason: ApiReason,
    #[case] status: u16,
) {
    let error = AppError::api(reason, "client error").with_status(status);
    assert_eq!(policy.decide(&error, 0), RetryDecision::GiveUp);
}

#[rstest]
fn rate_limit_waits_exactly_retry_after_even_past_max_delay(policy: GitHubRetryPolicy) {
    let error = AppError::api(ApiReason::RateLimit, "limited")
        .with_status(403)
        .with_retry_after(60);
    assert_eq!(policy.decide(&error, 0), retry_after(60));
    assert_eq!(policy.decide(&error, 2), retry_after(60));
}

#[rstest]
fn rate_limit_without_reset_falls_back_to_backoff(policy: GitHubRetryPolicy) {
    let error = AppError::api(ApiReason::RateLimit, "limited").with_status(429);
    assert_eq!(policy.decide(&error, 1), retry_after(2));
}

#[rstest]
#[case(0, 1)]
#[case(1, 2)]
#[case(2, 4)]
fn server_errors_back_off_exponentially(
    policy: GitHubRetryPolicy,
    #[case] attempt: u32,
    #[case] seconds: u64,
) {
    let error = AppError::api(ApiReason::ServerError, "boom").with_status(502);
    assert_eq!(policy.decide(&error, attempt), retry_after(seconds));
}

#[rstest]
fn backoff_is_capped_by_max_delay() {
    let policy = GitHubRetryPolicy::new(10, Duration::from_secs(1), Some(Duration::from_secs(30)));
    let error = AppError::api(ApiReason::NetworkError, "reset");
    assert_eq!(policy.decide(&error, 6), retry_after(30));
}

#[rstest]
fn backoff_without_cap_keeps_doubling() {
    let policy = GitHubRetryPolicy::new(10, Duration::from_secs(1), None);
    assert_eq!(policy.backoff_delay(6), Duration::from_secs(64));
}

#[rstest]
fn non_api_errors_use_backoff(policy: GitHubRetryPolicy) {
    let error = AppError::llm(LlmReason::Timeout, "slow");
    assert_eq!(policy.decide(&error, 0), retry_after(1));
}

#[rstest]
fn gives_up_once_retries_are_spent(policy: GitHubRetryPolicy) {
    let error = AppError::api(ApiReason::ServerError, "boom");
    assert_eq!(policy.decide(&error, 3), RetryDecision::GiveUp);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn run_makes_max_retries_plus_one_attempts(policy: GitHubRetryPolicy) {
    let calls = AtomicU32::new(0);
    let result: Result<(), _> = policy
        .run("fetch", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::api(ApiReason::ServerError, "boom").with_status(500))
        })
        .await;

    let error = result.expect_err("should exhaust retries");
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(error.status(), Some(500), "last error returned unchanged");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn run_does_not_retry_auth_failures(policy: GitHubRetryPolicy) {
    let calls = AtomicU32::new(0);
    let result: Result<(), _> = policy
        .run("fetch", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::auth(AuthReason::InvalidToken, "bad credentials"))
        })
        .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn run_sleeps_for_the_rate_limit_reset(policy: GitHubRetryPolicy) {
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let result = policy
        .run("fetch", || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::api(ApiReason::RateLimit, "limited")
                    .with_status(403)
                    .with_retry_after(60))
            } else {
                Ok("done")
            }
        })
        .await;

    assert_eq!(result, Ok("done"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(
        started.elapsed() >= Duration::from_secs(60),
        "waited {:?}",
        started.elapsed()
    );
}
