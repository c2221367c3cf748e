//! Revue library crate providing resilient GitHub access for pull request
//! review.
//!
//! The library wraps Octocrab behind a [`github::GitHubGateway`], classifies
//! every failure into an [`AppError`], retries transient failures with
//! rate-limit awareness, walks paginated listings, and memoises results in
//! per-resource TTL caches.

pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod notification;
pub mod retry;

pub use config::{OperationMode, RevueConfig};
pub use error::{AppError, ErrorKind, ErrorReason};
pub use github::{
    GitHubFetcher, GitHubRetryPolicy, IntakeError, OctocrabGateway, PersonalAccessToken,
    PullRequestLocator, PullRequestState, RepositoryLocator, ResourceCaches,
};
pub use notification::{Notification, NotificationSink};
