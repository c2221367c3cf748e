//! Classification of Octocrab failures into [`AppError`].

use http::StatusCode;

use crate::error::{ApiReason, AppError, AuthReason};

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether a status and message describe a rate limit.
///
/// GitHub signals primary and secondary limits with 403 plus a message (or
/// documentation URL) mentioning the limit, and sometimes with 429.
pub(super) fn is_rate_limit(
    status: StatusCode,
    message: &str,
    documentation_url: Option<&str>,
) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }

    let message_indicates_rate_limit = message.to_lowercase().contains("rate limit")
        || documentation_url.is_some_and(|url| url.contains("rate-limit"));

    status == StatusCode::FORBIDDEN && message_indicates_rate_limit
}

/// Maps an HTTP failure status to an [`AppError`].
pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    message: &str,
    documentation_url: Option<&str>,
) -> AppError {
    let description = format!("{operation} failed: GitHub returned {status} {message}");
    let code = status.as_u16();

    if status == StatusCode::UNAUTHORIZED {
        let reason = if message.to_lowercase().contains("expired") {
            AuthReason::ExpiredToken
        } else {
            AuthReason::InvalidToken
        };
        return AppError::auth(reason, description);
    }

    if is_rate_limit(status, message, documentation_url) {
        return AppError::api(ApiReason::RateLimit, description).with_status(code);
    }

    let reason = match status {
        StatusCode::NOT_FOUND => ApiReason::NotFound,
        _ if status.is_client_error() => ApiReason::Forbidden,
        _ => ApiReason::ServerError,
    };
    AppError::api(reason, description).with_status(code)
}

/// Maps any Octocrab error to an [`AppError`].
pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> AppError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_http_error(
            operation,
            source.status_code,
            &source.message,
            source.documentation_url.as_deref(),
        );
    }

    if is_network_error(error) {
        return AppError::api(
            ApiReason::NetworkError,
            format!("{operation} failed: {error}"),
        );
    }

    AppError::api(ApiReason::ServerError, format!("{operation} failed: {error}"))
}
