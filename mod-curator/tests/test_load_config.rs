use mod_curator::load_config::{load_config, API_KEY_VAR};
use mod_curator_core::config::{RateLimitPolicy, UpdatedPeriod};
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

fn config_file(yaml: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), yaml).unwrap();
    file
}

#[test]
#[serial]
fn minimal_config_uses_fetch_defaults() {
    let file = config_file(
        r#"
input: ./data/tracked.json
output: ./data/curated.json
catalog:
  base_url: "https://api.nexusmods.com/v1/games/baldursgate3"
"#,
    );
    env::set_var(API_KEY_VAR, "secret");

    let config = load_config(file.path()).expect("Config should load");

    assert_eq!(config.sync.input, PathBuf::from("./data/tracked.json"));
    assert_eq!(config.sync.output, PathBuf::from("./data/curated.json"));
    assert_eq!(config.sync.fetch.batch_size, 5);
    assert_eq!(config.sync.fetch.batch_pause(), Duration::from_millis(1000));
    assert_eq!(config.sync.fetch.updated_period, UpdatedPeriod::Day);
    assert_eq!(config.sync.fetch.on_rate_limit, RateLimitPolicy::Abort);
    assert!(!config.sync.fetch.repair_empty);
    assert!(!config.sync.dry_run);
    assert_eq!(config.catalog.api_key, "secret");
    assert_eq!(config.catalog.user_agent, None);
}

#[test]
#[serial]
fn fetch_section_overrides_defaults() {
    let file = config_file(
        r#"
input: tracked.json
output: curated.json
catalog:
  base_url: "https://example.test/v1/games/x"
  user_agent: "curator-bot/2.0"
fetch:
  batch_size: 3
  batch_pause_ms: 250
  updated_period: 1w
  repair_empty: true
  on_rate_limit:
    mode: backoff-and-retry
    max_retries: 5
    initial_delay_ms: 100
    max_delay_ms: 30000
"#,
    );
    env::set_var(API_KEY_VAR, "secret");

    let config = load_config(file.path()).expect("Config should load");

    assert_eq!(config.sync.fetch.batch_size, 3);
    assert_eq!(config.sync.fetch.batch_pause(), Duration::from_millis(250));
    assert_eq!(config.sync.fetch.updated_period, UpdatedPeriod::Week);
    assert!(config.sync.fetch.repair_empty);
    assert_eq!(
        config.sync.fetch.on_rate_limit,
        RateLimitPolicy::BackoffAndRetry {
            max_retries: 5,
            initial_delay_ms: 100,
            max_delay_ms: 30_000
        }
    );
    assert_eq!(config.catalog.user_agent.as_deref(), Some("curator-bot/2.0"));
}

#[test]
#[serial]
fn missing_api_key_is_an_error() {
    let file = config_file(
        "input: tracked.json\noutput: curated.json\ncatalog:\n  base_url: \"https://example.test\"\n",
    );
    env::remove_var(API_KEY_VAR);

    let err = load_config(file.path()).expect_err("missing key must fail");
    assert!(err.to_string().contains(API_KEY_VAR));
}

#[test]
#[serial]
fn missing_catalog_section_is_an_error() {
    let file = config_file("input: tracked.json\noutput: curated.json\n");
    env::set_var(API_KEY_VAR, "secret");

    let err = load_config(file.path()).expect_err("catalog is required");
    assert!(err.to_string().contains("Failed to parse config YAML"));
}

#[test]
#[serial]
fn zero_batch_size_is_rejected() {
    let file = config_file(
        "input: a\noutput: b\ncatalog:\n  base_url: \"https://example.test\"\nfetch:\n  batch_size: 0\n",
    );
    env::set_var(API_KEY_VAR, "secret");

    assert!(load_config(file.path()).is_err());
}
