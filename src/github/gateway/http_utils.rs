//! Helpers for raw HTTP requests that bypass Octocrab's JSON decoding.

use http::header::{ACCEPT, HeaderMap, HeaderValue, RETRY_AFTER};

use crate::github::rate_limit::RateLimitInfo;

/// Media type that makes GitHub render a pull request as a unified diff.
pub(super) const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";

pub(super) fn diff_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(DIFF_MEDIA_TYPE));
    headers
}

fn header_to_string(header_value: Option<&HeaderValue>) -> Option<String> {
    header_value
        .and_then(|raw| raw.to_str().ok())
        .map(ToOwned::to_owned)
}

fn header_to_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    header_to_string(headers.get(name)).and_then(|value| value.trim().parse().ok())
}

/// Seconds to wait according to a response's own headers.
///
/// `retry-after` (delta seconds) wins. Otherwise an exhausted
/// `x-ratelimit-remaining` yields the time until `x-ratelimit-reset`.
/// Zero waits count as no hint.
pub(super) fn rate_limit_hint(headers: &HeaderMap) -> Option<u64> {
    if let Some(seconds) = header_to_u64(headers, RETRY_AFTER.as_str()) {
        return (seconds > 0).then_some(seconds);
    }

    let remaining = header_to_u64(headers, "x-ratelimit-remaining")?;
    let reset_at = header_to_u64(headers, "x-ratelimit-reset")?;
    let limit = header_to_u64(headers, "x-ratelimit-limit")
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or_default();
    let remaining_u32 = u32::try_from(remaining).ok()?;

    RateLimitInfo::new(limit, remaining_u32, reset_at).retry_after()
}

/// GitHub error bodies are JSON objects with `message` and an optional
/// `documentation_url`.
pub(super) fn extract_github_message(body: &str) -> (Option<String>, Option<String>) {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return (None, None);
    };
    let field = |name: &str| {
        value
            .get(name)
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned)
    };
    (field("message"), field("documentation_url"))
}
