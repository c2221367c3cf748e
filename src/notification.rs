//! User-facing notifications for failures.
//!
//! The library never reports errors itself; callers turn an
//! [`AppError`](crate::error::AppError) into a [`Notification`] and hand it
//! to whichever [`NotificationSink`] suits their front end.

use std::io;

use serde::Serialize;

use crate::error::{AppError, ErrorKind, is_retryable};

/// Something the user can do about a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAction {
    /// Try the operation again.
    Retry,
    /// Supply or refresh GitHub credentials.
    SignIn,
    /// Close the notification.
    Dismiss,
}

/// A failure rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Short heading.
    pub title: String,
    /// Error description.
    pub message: String,
    /// Stable identifier such as `API_RATE_LIMIT`.
    pub code: String,
    /// When the failure was classified (ISO-8601).
    pub timestamp: String,
    /// Offered actions, most useful first.
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    /// Builds a notification describing `error`.
    ///
    /// Retryable errors offer [`NotificationAction::Retry`], authentication
    /// errors offer [`NotificationAction::SignIn`], and every notification
    /// can be dismissed.
    #[must_use]
    pub fn from_error(error: &AppError) -> Self {
        let title = match error.kind() {
            ErrorKind::Auth => "GitHub authentication failed",
            ErrorKind::Api => "GitHub request failed",
            ErrorKind::Llm => "AI service request failed",
            ErrorKind::Template => "Review template problem",
        };

        let mut actions = Vec::with_capacity(2);
        if is_retryable(error) {
            actions.push(NotificationAction::Retry);
        }
        if error.kind() == ErrorKind::Auth {
            actions.push(NotificationAction::SignIn);
        }
        actions.push(NotificationAction::Dismiss);

        Self {
            title: title.to_owned(),
            message: error.message().to_owned(),
            code: error.code(),
            timestamp: error.iso_timestamp(),
            actions,
        }
    }
}

/// A destination for notifications.
pub trait NotificationSink: Send + Sync {
    /// Presents a notification.
    fn report(&self, notification: &Notification);
}

/// Notification sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotificationSink;

impl NotificationSink for NoopNotificationSink {
    fn report(&self, _notification: &Notification) {}
}

/// Writes notifications to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlNotificationSink;

impl NotificationSink for StderrJsonlNotificationSink {
    fn report(&self, notification: &Notification) {
        let Ok(serialised) = serde_json::to_string(notification) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Notification, NotificationAction, NotificationSink, NoopNotificationSink};
    use crate::error::{ApiReason, AppError, AuthReason, TemplateReason};

    #[derive(Debug, Default)]
    struct RecordingSink {
        notifications: std::sync::Mutex<Vec<Notification>>,
    }

    impl NotificationSink for RecordingSink {
        fn report(&self, notification: &Notification) {
            self.notifications
                .lock()
                .expect("notifications mutex should be available")
                .push(notification.clone());
        }
    }

    #[rstest]
    #[case::rate_limit(
        AppError::api(ApiReason::RateLimit, "slow down"),
        vec![NotificationAction::Retry, NotificationAction::Dismiss]
    )]
    #[case::auth(
        AppError::auth(AuthReason::ExpiredToken, "expired"),
        vec![NotificationAction::SignIn, NotificationAction::Dismiss]
    )]
    #[case::not_found(
        AppError::api(ApiReason::NotFound, "missing"),
        vec![NotificationAction::Dismiss]
    )]
    #[case::template(
        AppError::template(TemplateReason::MissingFile, "no template"),
        vec![NotificationAction::Dismiss]
    )]
    fn actions_follow_error_class(
        #[case] error: AppError,
        #[case] expected: Vec<NotificationAction>,
    ) {
        assert_eq!(Notification::from_error(&error).actions, expected);
    }

    #[rstest]
    fn notification_carries_code_and_message() {
        let error = AppError::api(ApiReason::ServerError, "GitHub returned 502");
        let notification = Notification::from_error(&error);

        assert_eq!(notification.code, "API_SERVER_ERROR");
        assert_eq!(notification.message, "GitHub returned 502");
        assert_eq!(notification.timestamp, error.iso_timestamp());
    }

    #[rstest]
    fn sinks_receive_reported_notifications() {
        let sink = RecordingSink::default();
        let notification =
            Notification::from_error(&AppError::auth(AuthReason::InvalidToken, "bad"));

        sink.report(&notification);

        let recorded = sink
            .notifications
            .lock()
            .expect("notifications mutex should be available");
        assert_eq!(recorded.as_slice(), [notification]);
    }

    #[rstest]
    fn sinks_are_interchangeable_behind_the_trait() {
        let recording = RecordingSink::default();
        let sinks: [&dyn NotificationSink; 2] = [&NoopNotificationSink, &recording];
        let notification =
            Notification::from_error(&AppError::api(ApiReason::RateLimit, "slow down"));

        for sink in sinks {
            sink.report(&notification);
        }

        let recorded = recording
            .notifications
            .lock()
            .expect("notifications mutex should be available");
        assert_eq!(recorded.len(), 1, "only the recording sink keeps notifications");
    }

    #[rstest]
    fn serialises_actions_in_snake_case() {
        let notification =
            Notification::from_error(&AppError::auth(AuthReason::InvalidToken, "bad"));
        let json = serde_json::to_value(&notification).expect("notification should serialise");
        assert_eq!(json["actions"], serde_json::json!(["sign_in", "dismiss"]));
    }
}
