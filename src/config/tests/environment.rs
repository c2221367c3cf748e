//! Tests for loading values from the environment and command line.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use rstest::rstest;

use crate::RevueConfig;

/// Loads configuration with `env` applied and `HOME` pointed at an empty
/// directory so no user config file is discovered.
fn load_with(env: &[(&str, Option<&str>)], cli_args: &[&str]) -> RevueConfig {
    let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
    let home = temp_dir.path().to_string_lossy().to_string();

    let mut vars: Vec<(&str, Option<&str>)> = vec![
        ("HOME", Some(home.as_str())),
        ("XDG_CONFIG_HOME", Some(home.as_str())),
    ];
    vars.extend_from_slice(env);
    let _guard = env_lock::lock_env(vars);

    let mut args: Vec<OsString> = vec![OsString::from("revue")];
    args.extend(cli_args.iter().map(OsString::from));

    RevueConfig::load_from_iter(args).expect("config should load")
}

#[rstest]
fn github_max_retries_loads_from_environment_variable() {
    let config = load_with(&[("REVUE_GITHUB_MAX_RETRIES", Some("5"))], &[]);
    assert_eq!(config.github_max_retries, 5);
}

#[rstest]
fn page_size_loads_from_cli_flag() {
    let config = load_with(&[], &["--page-size", "25"]);
    assert_eq!(config.page_size, 25);
}

#[rstest]
fn cli_overrides_environment_for_ttls() {
    let config = load_with(
        &[("REVUE_DIFF_TTL_SECONDS", Some("60"))],
        &["--diff-ttl-seconds", "30"],
    );
    assert_eq!(config.diff_ttl_seconds, 30);
}

#[rstest]
fn token_falls_back_to_github_token() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("ghp_from_env"))]);
    let config = RevueConfig::default();

    assert_eq!(config.resolve_token().ok().as_deref(), Some("ghp_from_env"));
}

#[rstest]
fn configured_token_wins_over_github_token() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("ghp_from_env"))]);
    let config = RevueConfig {
        token: Some("ghp_configured".to_owned()),
        ..Default::default()
    };

    assert_eq!(
        config.resolve_token().ok().as_deref(),
        Some("ghp_configured")
    );
}

#[rstest]
fn missing_token_is_reported() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
    let config = RevueConfig::default();

    assert!(config.resolve_token().is_err());
}
