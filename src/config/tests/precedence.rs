//! Tests for configuration layer precedence.

use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::{Value, json};

use super::helpers::build_config_from_layers;
use crate::RevueConfig;

#[rstest]
#[case::file_overrides_defaults(
    vec![("defaults", json!({"pr_url": "default-url"})), ("file", json!({"pr_url": "file-url"}))],
    "pr_url",
    "file-url"
)]
#[case::environment_overrides_file(
    vec![("file", json!({"token": "file-token"})), ("environment", json!({"token": "env-token"}))],
    "token",
    "env-token"
)]
#[case::cli_overrides_environment(
    vec![("environment", json!({"repo_url": "env-url"})), ("cli", json!({"repo_url": "cli-url"}))],
    "repo_url",
    "cli-url"
)]
fn string_fields_follow_layer_precedence(
    #[case] layers: Vec<(&str, Value)>,
    #[case] field: &str,
    #[case] expected: &str,
) {
    let config = build_config_from_layers(&layers);

    let actual = match field {
        "pr_url" => config.pr_url.as_deref(),
        "token" => config.token.as_deref(),
        "repo_url" => config.repo_url.as_deref(),
        _ => panic!("unknown field: {field}"),
    };

    assert_eq!(actual, Some(expected), "{field} should come from the top layer");
}

#[rstest]
#[case::file_overrides_defaults(
    vec![
        ("defaults", json!({"diff_ttl_seconds": 10})),
        ("file", json!({"diff_ttl_seconds": 20}))
    ],
    20
)]
#[case::environment_overrides_file(
    vec![
        ("file", json!({"diff_ttl_seconds": 10})),
        ("environment", json!({"diff_ttl_seconds": 30}))
    ],
    30
)]
#[case::cli_overrides_everything(
    vec![
        ("defaults", json!({"diff_ttl_seconds": 10})),
        ("file", json!({"diff_ttl_seconds": 20})),
        ("environment", json!({"diff_ttl_seconds": 30})),
        ("cli", json!({"diff_ttl_seconds": 40}))
    ],
    40
)]
fn numeric_fields_follow_layer_precedence(
    #[case] layers: Vec<(&str, Value)>,
    #[case] expected: u64,
) {
    let config = build_config_from_layers(&layers);
    assert_eq!(config.diff_ttl_seconds, expected);
}

#[rstest]
fn unset_layers_keep_built_in_defaults() {
    let mut composer = MergeComposer::new();
    composer.push_defaults(json!({"pr_url": null, "token": null}));

    let config = RevueConfig::merge_from_layers(composer.layers())
        .expect("merge should succeed with empty defaults");

    assert!(config.pr_url.is_none(), "pr_url should be None");
    assert!(config.token.is_none(), "token should be None");
    assert_eq!(config.page_size, 100);
    assert_eq!(config.cache_max_size, 100);
    assert_eq!(config.profile_ttl_seconds, 3_600);
    assert_eq!(config.github_max_delay_ms, 30_000);
}
