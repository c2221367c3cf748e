//! Generic retry with exponential backoff.
//!
//! [`with_retry`] runs an async operation and retries failures that the
//! policy's predicate accepts, sleeping `min(base * factor^attempt, max)`
//! between attempts. It is used for AI-service calls; GitHub REST calls have
//! their own rate-limit-aware policy in [`crate::github::GitHubRetryPolicy`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{AppError, is_retryable};

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);
const DEFAULT_BACKOFF_FACTOR: u32 = 2;

type RetryCondition<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Retry configuration for [`with_retry`].
///
/// A plain value: it holds no per-call state and can be shared between call
/// sites.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use revue::retry::RetryPolicy;
///
/// let policy: RetryPolicy = RetryPolicy::default()
///     .with_max_retries(2)
///     .with_base_delay(Duration::from_millis(100));
/// assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
/// ```
pub struct RetryPolicy<E = AppError> {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    backoff_factor: u32,
    retry_condition: RetryCondition<E>,
}

impl<E> RetryPolicy<E> {
    /// Creates a policy with default timings and the given predicate.
    pub fn new(retry_condition: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            retry_condition: Arc::new(retry_condition),
        }
    }

    /// Sets how many retries follow the initial attempt.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Sets the upper bound on any single delay.
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Sets the multiplier applied to the delay on each successive retry.
    #[must_use]
    pub fn with_backoff_factor(mut self, backoff_factor: u32) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    /// Replaces the retry predicate.
    #[must_use]
    pub fn with_retry_condition(
        mut self,
        retry_condition: impl Fn(&E) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.retry_condition = Arc::new(retry_condition);
        self
    }

    /// Returns the maximum number of retries.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the delay before the first retry.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Returns the upper bound on any single delay.
    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Returns the backoff multiplier.
    #[must_use]
    pub const fn backoff_factor(&self) -> u32 {
        self.backoff_factor
    }

    /// Evaluates the retry predicate.
    #[must_use]
    pub fn should_retry(&self, error: &E) -> bool {
        (self.retry_condition)(error)
    }

    /// Delay slept after the failure of attempt `attempt` (0-based).
    ///
    /// Saturates instead of overflowing for large attempt numbers.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = self.backoff_factor.saturating_pow(attempt);
        self.base_delay
            .saturating_mul(multiplier)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy<AppError> {
    fn default() -> Self {
        Self::new(is_retryable)
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            base_delay: self.base_delay,
            max_delay: self.max_delay,
            backoff_factor: self.backoff_factor,
            retry_condition: Arc::clone(&self.retry_condition),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .field("backoff_factor", &self.backoff_factor)
            .finish_non_exhaustive()
    }
}

/// Runs `operation`, retrying failures accepted by the policy.
///
/// The operation runs at most `max_retries + 1` times. A failure on the final
/// attempt is returned without consulting the predicate; a failure the
/// predicate rejects is returned immediately. The error handed back is the
/// one produced by the last attempt, unchanged.
///
/// # Errors
///
/// Returns the last error produced by `operation` once retries are exhausted
/// or the predicate declines to retry.
pub async fn with_retry<T, E, F, Fut>(mut operation: F, policy: &RetryPolicy<E>) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut attempt: u32 = 0;
    loop {
        let error = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempts = attempt + 1, "operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        if attempt == policy.max_retries() {
            warn!(
                max_retries = policy.max_retries(),
                "retries exhausted: {error}"
            );
            return Err(error);
        }

        if !policy.should_retry(&error) {
            debug!(attempt, "not retrying: {error}");
            return Err(error);
        }

        let delay = policy.delay_for_attempt(attempt);
        debug!(attempt, ?delay, "attempt failed, retrying: {error}");
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

/// An operation bound to a retry policy; see [`create_retry_wrapper`].
#[derive(Clone)]
pub struct RetryWrapper<F, E = AppError> {
    operation: F,
    policy: RetryPolicy<E>,
}

impl<F, E> RetryWrapper<F, E> {
    /// Invokes the wrapped operation with `args`, retrying per the policy.
    ///
    /// `args` is cloned for every attempt. Use a tuple to forward several
    /// arguments.
    ///
    /// # Errors
    ///
    /// Returns the last error from the wrapped operation, as [`with_retry`]
    /// does.
    pub async fn call<A, T, Fut>(&self, args: A) -> Result<T, E>
    where
        A: Clone,
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        with_retry(|| (self.operation)(args.clone()), &self.policy).await
    }

    /// Returns the policy applied to each call.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy<E> {
        &self.policy
    }
}

impl<F, E> fmt::Debug for RetryWrapper<F, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RetryWrapper")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Binds `operation` to `policy` so every call goes through [`with_retry`].
///
/// ```
/// use revue::error::{AppError, LlmReason};
/// use revue::retry::{RetryPolicy, create_retry_wrapper};
///
/// # async fn demo() -> Result<(), AppError> {
/// let analyse = create_retry_wrapper(
///     |diff: String| async move {
///         if diff.is_empty() {
///             Err(AppError::llm(LlmReason::InvalidResponse, "empty diff"))
///         } else {
///             Ok(diff.len())
///         }
///     },
///     RetryPolicy::default(),
/// );
/// let size = analyse.call("+ added".to_owned()).await?;
/// # assert_eq!(size, 7);
/// # Ok(())
/// # }
/// ```
pub fn create_retry_wrapper<F, E>(operation: F, policy: RetryPolicy<E>) -> RetryWrapper<F, E> {
    RetryWrapper { operation, policy }
}

#[cfg(test)]
mod tests;
