//! Revue CLI entrypoint for cached, rate-limit-aware GitHub reads.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use revue::notification::StderrJsonlNotificationSink;
use revue::{IntakeError, Notification, NotificationSink, OperationMode, RevueConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(&error);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), IntakeError> {
    let config = load_config()?;
    config.validate()?;

    match config.operation_mode() {
        OperationMode::SinglePullRequest => cli::single_pr::run(&config).await,
        OperationMode::RepositoryListing => cli::repository_listing::run(&config).await,
        OperationMode::Profile => cli::profile::run(&config).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<RevueConfig, IntakeError> {
    RevueConfig::load().map_err(|error| IntakeError::Configuration {
        message: error.to_string(),
    })
}

/// Logs go to stderr, filtered by `RUST_LOG` (default `revue=info`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "revue=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Remote failures become a JSON notification; every failure also gets a
/// plain line on stderr.
fn report(error: &IntakeError) {
    if let IntakeError::Remote(remote) = error {
        StderrJsonlNotificationSink.report(&Notification::from_error(remote));
    }

    let _ignored = writeln!(io::stderr().lock(), "{error}");
}
