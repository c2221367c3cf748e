//! Retry policy for GitHub REST calls.
//!
//! Unlike the generic [`crate::retry`] engine, this policy reads the error
//! itself: authentication failures and client errors are final, and a rate
//! limit that names its reset time is waited out exactly.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{ApiReason, AppError};

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Outcome of consulting the policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Propagate the error.
    GiveUp,
    /// Sleep for the duration, then try again.
    RetryAfter(Duration),
}

/// Rate-limit-aware retry policy for GitHub requests.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use revue::error::{ApiReason, AppError, AuthReason};
/// use revue::github::{GitHubRetryPolicy, RetryDecision};
///
/// let policy = GitHubRetryPolicy::default();
/// let limited = AppError::api(ApiReason::RateLimit, "slow down").with_retry_after(90);
/// assert_eq!(
///     policy.decide(&limited, 0),
///     RetryDecision::RetryAfter(Duration::from_secs(90))
/// );
///
/// let rejected = AppError::auth(AuthReason::InvalidToken, "bad credentials");
/// assert_eq!(policy.decide(&rejected, 0), RetryDecision::GiveUp);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitHubRetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Option<Duration>,
}

impl GitHubRetryPolicy {
    /// Creates a policy; `max_delay` of `None` leaves backoff uncapped.
    #[must_use]
    pub const fn new(max_retries: u32, base_delay: Duration, max_delay: Option<Duration>) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// Retries allowed after the initial attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before the first backoff retry.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Cap on backoff delays; never applied to rate-limit waits.
    #[must_use]
    pub const fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    /// `base * 2^attempt`, capped by `max_delay` when one is set.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let delay = self
            .base_delay
            .saturating_mul(2_u32.saturating_pow(attempt));
        self.max_delay.map_or(delay, |cap| delay.min(cap))
    }

    /// Decides what to do after attempt `attempt` (0-based) failed with
    /// `error`.
    #[must_use]
    pub fn decide(&self, error: &AppError, attempt: u32) -> RetryDecision {
        if attempt >= self.max_retries {
            return RetryDecision::GiveUp;
        }

        match error {
            AppError::Auth { .. } => RetryDecision::GiveUp,
            AppError::Api {
                reason: ApiReason::RateLimit,
                retry_after: Some(seconds),
                ..
            } => RetryDecision::RetryAfter(Duration::from_secs(*seconds)),
            AppError::Api {
                reason,
                status: Some(status),
                ..
            } if *reason != ApiReason::RateLimit && (400..500).contains(status) => {
                RetryDecision::GiveUp
            }
            _ => RetryDecision::RetryAfter(self.backoff_delay(attempt)),
        }
    }

    /// Runs `operation` until it succeeds or [`Self::decide`] gives up.
    ///
    /// # Errors
    ///
    /// Returns the error from the last attempt unchanged.
    pub async fn run<T, F, Fut>(&self, operation_name: &str, mut operation: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            match self.decide(&error, attempt) {
                RetryDecision::GiveUp => {
                    if attempt >= self.max_retries {
                        warn!(
                            operation = operation_name,
                            attempts = attempt + 1,
                            code = %error.code(),
                            "GitHub request failed after retries"
                        );
                    } else {
                        debug!(
                            operation = operation_name,
                            code = %error.code(),
                            "GitHub request failed with a non-retryable error"
                        );
                    }
                    return Err(error);
                }
                RetryDecision::RetryAfter(delay) => {
                    debug!(
                        operation = operation_name,
                        attempt,
                        ?delay,
                        code = %error.code(),
                        "retrying GitHub request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for GitHubRetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_BASE_DELAY, Some(DEFAULT_MAX_DELAY))
    }
}
