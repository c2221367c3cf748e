//! Unit tests for the generic retry engine.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use rstest::rstest;
use tokio::time::Instant;

use super::{RetryPolicy, create_retry_wrapper, with_retry};
use crate::error::{ApiReason, AppError, AuthReason, LlmReason};

fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy::default()
        .with_max_retries(max_retries)
        .with_base_delay(Duration::from_millis(10))
        .with_max_delay(Duration::from_millis(100))
}

#[rstest]
#[case(0, Duration::from_millis(100))]
#[case(1, Duration::from_millis(200))]
#[case(2, Duration::from_millis(400))]
#[case(3, Duration::from_millis(500))]
#[case(40, Duration::from_millis(500))]
fn delay_grows_geometrically_up_to_cap(#[case] attempt: u32, #[case] expected: Duration) {
    let policy: RetryPolicy = RetryPolicy::default()
        .with_base_delay(Duration::from_millis(100))
        .with_max_delay(Duration::from_millis(500))
        .with_backoff_factor(2);

    assert_eq!(policy.delay_for_attempt(attempt), expected);
}

#[rstest]
fn default_policy_uses_documented_timings() {
    let policy: RetryPolicy = RetryPolicy::default();

    assert_eq!(policy.max_retries(), 3);
    assert_eq!(policy.base_delay(), Duration::from_secs(1));
    assert_eq!(policy.max_delay(), Duration::from_secs(30));
    assert_eq!(policy.backoff_factor(), 2);
}

#[tokio::test(start_paused = true)]
async fn success_on_first_attempt_runs_once() {
    let calls = AtomicU32::new(0);

    let result = with_retry(
        || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AppError>("done")
        },
        &fast_policy(3),
    )
    .await;

    assert_eq!(result, Ok("done"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(4)]
#[tokio::test(start_paused = true)]
async fn exhaustion_runs_max_retries_plus_one(#[case] max_retries: u32) {
    let calls = AtomicU32::new(0);

    let result: Result<(), AppError> = with_retry(
        || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::api(ApiReason::ServerError, "still down"))
        },
        &fast_policy(max_retries),
    )
    .await;

    assert!(result.is_err(), "expected exhaustion to fail");
    assert_eq!(calls.load(Ordering::SeqCst), max_retries + 1);
}

#[tokio::test(start_paused = true)]
async fn non_retryable_error_short_circuits() {
    let calls = AtomicU32::new(0);

    let result: Result<(), AppError> = with_retry(
        || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::auth(AuthReason::InvalidToken, "bad credentials"))
        },
        &fast_policy(5),
    )
    .await;

    let error = result.expect_err("auth failures are not retryable");
    assert_eq!(error.code(), "AUTH_INVALID_TOKEN");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn recovers_after_transient_failures() {
    let calls = AtomicU32::new(0);

    let result = with_retry(
        || async {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            if attempt < 2 {
                Err(AppError::llm(LlmReason::Timeout, "slow model"))
            } else {
                Ok(attempt)
            }
        },
        &fast_policy(3),
    )
    .await;

    assert_eq!(result, Ok(2));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn returns_last_error_unchanged() {
    let last = AppError::api(ApiReason::NetworkError, "connection reset").with_status(599);
    let expected = last.clone();

    let result: Result<(), AppError> =
        with_retry(|| async { Err(last.clone()) }, &fast_policy(2)).await;

    assert_eq!(result, Err(expected));
}

#[tokio::test(start_paused = true)]
async fn custom_condition_overrides_default_predicate() {
    let calls = AtomicU32::new(0);
    let policy = fast_policy(3).with_retry_condition(|_: &AppError| false);

    let result: Result<(), AppError> = with_retry(
        || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::api(ApiReason::ServerError, "boom"))
        },
        &policy,
    )
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn works_with_foreign_error_types() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy::new(|error: &String| error.starts_with("transient"))
        .with_base_delay(Duration::from_millis(1));

    let result: Result<(), String> = with_retry(
        || async {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            if attempt == 0 {
                Err("transient glitch".to_owned())
            } else {
                Err("fatal".to_owned())
            }
        },
        &policy,
    )
    .await;

    assert_eq!(result, Err("fatal".to_owned()));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn waits_at_least_the_backoff_between_attempts() {
    let policy: RetryPolicy = RetryPolicy::default()
        .with_max_retries(4)
        .with_base_delay(Duration::from_millis(100))
        .with_max_delay(Duration::from_millis(350))
        .with_backoff_factor(2);
    let stamps = Mutex::new(Vec::new());

    let _result: Result<(), AppError> = with_retry(
        || async {
            stamps
                .lock()
                .expect("stamps mutex should be available")
                .push(Instant::now());
            Err(AppError::api(ApiReason::ServerError, "down"))
        },
        &policy,
    )
    .await;

    let recorded = stamps.into_inner().expect("stamps mutex should be available");
    assert_eq!(recorded.len(), 5, "expected initial attempt plus four retries");
    for (attempt, pair) in (0_u32..).zip(recorded.windows(2)) {
        let [earlier, later] = pair else {
            panic!("windows(2) should yield pairs");
        };
        let gap = later.duration_since(*earlier);
        assert!(
            gap >= policy.delay_for_attempt(attempt),
            "gap {gap:?} after attempt {attempt} shorter than backoff"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn wrapper_forwards_arguments_on_every_attempt() {
    let seen = Mutex::new(Vec::new());
    let wrapper = create_retry_wrapper(
        |(owner, number): (String, u64)| {
            let mut guard = seen.lock().expect("seen mutex should be available");
            guard.push((owner.clone(), number));
            let attempts = guard.len();
            drop(guard);
            async move {
                if attempts < 2 {
                    Err(AppError::api(ApiReason::RateLimit, "wait"))
                } else {
                    Ok(format!("{owner}#{number}"))
                }
            }
        },
        fast_policy(3),
    );

    let result = wrapper.call(("octo".to_owned(), 7)).await;

    assert_eq!(result, Ok("octo#7".to_owned()));
    let recorded = seen.into_inner().expect("seen mutex should be available");
    assert_eq!(
        recorded,
        vec![("octo".to_owned(), 7), ("octo".to_owned(), 7)],
        "each attempt should receive the original arguments"
    );
}
