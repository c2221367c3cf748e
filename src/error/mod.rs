//! Typed failure taxonomy for every remote call made on behalf of a review.
//!
//! Failures are grouped into four closed kinds (authentication, GitHub API,
//! AI service, and template) and each kind carries an enumerated reason rather
//! than free text. The derived [`AppError::code`] (for example
//! `API_RATE_LIMIT`) is the stable identifier surfaced to users and logs.
//!
//! [`is_retryable`] is the default retry predicate used by
//! [`crate::retry::with_retry`].

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

/// Top-level failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credential problems.
    Auth,
    /// GitHub REST API failures.
    Api,
    /// AI analysis service failures.
    Llm,
    /// Review template failures.
    Template,
}

impl ErrorKind {
    /// Returns the lowercase identifier used in error codes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Api => "api",
            Self::Llm => "llm",
            Self::Template => "template",
        }
    }
}

/// Why authentication failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthReason {
    /// The token was rejected outright.
    InvalidToken,
    /// The token was valid once but has expired.
    ExpiredToken,
    /// The token lacks a required scope.
    InsufficientPermissions,
    /// The credential check could not reach GitHub.
    NetworkError,
}

impl AuthReason {
    /// Returns the `snake_case` reason identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidToken => "invalid_token",
            Self::ExpiredToken => "expired_token",
            Self::InsufficientPermissions => "insufficient_permissions",
            Self::NetworkError => "network_error",
        }
    }
}

/// Why a GitHub API call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiReason {
    /// Primary or secondary rate limit exceeded.
    RateLimit,
    /// The resource does not exist or is hidden from the token.
    NotFound,
    /// GitHub refused the request.
    Forbidden,
    /// Transport-level failure before a response arrived.
    NetworkError,
    /// GitHub answered with a server error, or the failure was unclassifiable.
    ServerError,
}

impl ApiReason {
    /// Returns the `snake_case` reason identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RateLimit => "rate_limit",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::NetworkError => "network_error",
            Self::ServerError => "server_error",
        }
    }
}

/// Why an AI service call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmReason {
    /// The service returned an error response.
    ApiFailure,
    /// The account quota is used up.
    QuotaExceeded,
    /// The response could not be interpreted.
    InvalidResponse,
    /// The call did not complete in time.
    Timeout,
    /// The service is not configured (missing key, model, or endpoint).
    ConfigurationError,
}

impl LlmReason {
    /// Returns the `snake_case` reason identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApiFailure => "api_failure",
            Self::QuotaExceeded => "quota_exceeded",
            Self::InvalidResponse => "invalid_response",
            Self::Timeout => "timeout",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

/// Why a review template could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateReason {
    /// The template is not valid markdown.
    InvalidMarkdown,
    /// The template file does not exist.
    MissingFile,
    /// The template could not be parsed.
    ParsingError,
    /// The template parsed but failed validation.
    ValidationError,
}

impl TemplateReason {
    /// Returns the `snake_case` reason identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidMarkdown => "invalid_markdown",
            Self::MissingFile => "missing_file",
            Self::ParsingError => "parsing_error",
            Self::ValidationError => "validation_error",
        }
    }
}

/// A reason from any of the four kinds, used by [`AppError::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorReason {
    /// Authentication reason.
    Auth(AuthReason),
    /// GitHub API reason.
    Api(ApiReason),
    /// AI service reason.
    Llm(LlmReason),
    /// Template reason.
    Template(TemplateReason),
}

impl From<AuthReason> for ErrorReason {
    fn from(reason: AuthReason) -> Self {
        Self::Auth(reason)
    }
}

impl From<ApiReason> for ErrorReason {
    fn from(reason: ApiReason) -> Self {
        Self::Api(reason)
    }
}

impl From<LlmReason> for ErrorReason {
    fn from(reason: LlmReason) -> Self {
        Self::Llm(reason)
    }
}

impl From<TemplateReason> for ErrorReason {
    fn from(reason: TemplateReason) -> Self {
        Self::Template(reason)
    }
}

/// A classified failure. Immutable once built; retry layers hand the same
/// value back to callers without wrapping it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    /// Authentication failure.
    #[error("{message}")]
    Auth {
        /// Enumerated cause.
        reason: AuthReason,
        /// Human-readable description.
        message: String,
        /// When the failure was classified.
        timestamp: DateTime<Utc>,
    },

    /// GitHub API failure.
    #[error("{message}")]
    Api {
        /// Enumerated cause.
        reason: ApiReason,
        /// Human-readable description.
        message: String,
        /// HTTP status when a response was received.
        status: Option<u16>,
        /// Server-requested wait in seconds before retrying.
        retry_after: Option<u64>,
        /// When the failure was classified.
        timestamp: DateTime<Utc>,
    },

    /// AI service failure.
    #[error("{message}")]
    Llm {
        /// Enumerated cause.
        reason: LlmReason,
        /// Human-readable description.
        message: String,
        /// When the failure was classified.
        timestamp: DateTime<Utc>,
    },

    /// Template failure.
    #[error("{message}")]
    Template {
        /// Enumerated cause.
        reason: TemplateReason,
        /// Human-readable description.
        message: String,
        /// Extra context such as the offending line.
        details: Option<String>,
        /// When the failure was classified.
        timestamp: DateTime<Utc>,
    },
}

impl AppError {
    /// Builds an error of the kind implied by `reason`, stamped with the
    /// current time.
    ///
    /// ```
    /// use revue::error::{AppError, ApiReason, ErrorKind};
    ///
    /// let error = AppError::create(ApiReason::RateLimit, "slow down").with_retry_after(30);
    /// assert_eq!(error.kind(), ErrorKind::Api);
    /// assert_eq!(error.code(), "API_RATE_LIMIT");
    /// ```
    #[must_use]
    pub fn create(reason: impl Into<ErrorReason>, description: impl Into<String>) -> Self {
        let message = description.into();
        let timestamp = Utc::now();
        match reason.into() {
            ErrorReason::Auth(reason) => Self::Auth {
                reason,
                message,
                timestamp,
            },
            ErrorReason::Api(reason) => Self::Api {
                reason,
                message,
                status: None,
                retry_after: None,
                timestamp,
            },
            ErrorReason::Llm(reason) => Self::Llm {
                reason,
                message,
                timestamp,
            },
            ErrorReason::Template(reason) => Self::Template {
                reason,
                message,
                details: None,
                timestamp,
            },
        }
    }

    /// Shorthand for an authentication error.
    #[must_use]
    pub fn auth(reason: AuthReason, message: impl Into<String>) -> Self {
        Self::create(reason, message)
    }

    /// Shorthand for a GitHub API error.
    #[must_use]
    pub fn api(reason: ApiReason, message: impl Into<String>) -> Self {
        Self::create(reason, message)
    }

    /// Shorthand for an AI service error.
    #[must_use]
    pub fn llm(reason: LlmReason, message: impl Into<String>) -> Self {
        Self::create(reason, message)
    }

    /// Shorthand for a template error.
    #[must_use]
    pub fn template(reason: TemplateReason, message: impl Into<String>) -> Self {
        Self::create(reason, message)
    }

    /// Attaches an HTTP status. Ignored for non-API errors.
    #[must_use]
    pub fn with_status(mut self, value: u16) -> Self {
        if let Self::Api { status, .. } = &mut self {
            *status = Some(value);
        }
        self
    }

    /// Attaches a server-requested retry delay in seconds. Ignored for
    /// non-API errors.
    #[must_use]
    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        if let Self::Api { retry_after, .. } = &mut self {
            *retry_after = Some(seconds);
        }
        self
    }

    /// Attaches template details. Ignored for non-template errors.
    #[must_use]
    pub fn with_details(mut self, value: impl Into<String>) -> Self {
        if let Self::Template { details, .. } = &mut self {
            *details = Some(value.into());
        }
        self
    }

    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth { .. } => ErrorKind::Auth,
            Self::Api { .. } => ErrorKind::Api,
            Self::Llm { .. } => ErrorKind::Llm,
            Self::Template { .. } => ErrorKind::Template,
        }
    }

    /// Returns the enumerated reason.
    #[must_use]
    pub const fn reason(&self) -> ErrorReason {
        match self {
            Self::Auth { reason, .. } => ErrorReason::Auth(*reason),
            Self::Api { reason, .. } => ErrorReason::Api(*reason),
            Self::Llm { reason, .. } => ErrorReason::Llm(*reason),
            Self::Template { reason, .. } => ErrorReason::Template(*reason),
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Auth { message, .. }
            | Self::Api { message, .. }
            | Self::Llm { message, .. }
            | Self::Template { message, .. } => message,
        }
    }

    /// Returns the stable `{KIND}_{REASON}` code, e.g. `AUTH_EXPIRED_TOKEN`.
    #[must_use]
    pub fn code(&self) -> String {
        let reason = match self.reason() {
            ErrorReason::Auth(reason) => reason.as_str(),
            ErrorReason::Api(reason) => reason.as_str(),
            ErrorReason::Llm(reason) => reason.as_str(),
            ErrorReason::Template(reason) => reason.as_str(),
        };
        format!("{}_{reason}", self.kind().as_str()).to_ascii_uppercase()
    }

    /// Returns when the failure was classified.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Auth { timestamp, .. }
            | Self::Api { timestamp, .. }
            | Self::Llm { timestamp, .. }
            | Self::Template { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the classification time as an ISO-8601 string.
    #[must_use]
    pub fn iso_timestamp(&self) -> String {
        self.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Returns the HTTP status for API errors that received a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns the server-requested wait for API errors.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Api {
                retry_after: Some(seconds),
                ..
            } => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }

    /// Returns template details when present.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Template { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}

/// Default retry predicate.
///
/// Retryable iff the error is an API network error, rate limit, or server
/// error, or an AI service failure or timeout. Authentication and template
/// errors are never retryable.
#[must_use]
pub const fn is_retryable(error: &AppError) -> bool {
    matches!(
        error,
        AppError::Api {
            reason: ApiReason::NetworkError | ApiReason::RateLimit | ApiReason::ServerError,
            ..
        } | AppError::Llm {
            reason: LlmReason::ApiFailure | LlmReason::Timeout,
            ..
        }
    )
}
