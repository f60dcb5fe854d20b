use metal_json::load_config::{env_only, load_config, TOKEN_ENV};
use serial_test::serial;
use std::env;
use std::fs::write;
use tempfile::NamedTempFile;

#[test]
#[serial]
fn test_load_config_reads_publish_section_and_env_token() {
    let config_yaml = r#"
publish:
  repo: owner/prices
  path: data/gold.json
  api_base: https://github.example.test/api/v3
  commit_message: Daily prices
  timeout_secs: 15
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();
    env::set_var(TOKEN_ENV, "ghp_from_env");

    let config = load_config(config_file.path()).expect("Config should load");

    assert_eq!(config.publish.repo.as_deref(), Some("owner/prices"));
    assert_eq!(config.publish.path.as_deref(), Some("data/gold.json"));
    assert_eq!(
        config.publish.api_base.as_deref(),
        Some("https://github.example.test/api/v3")
    );
    assert_eq!(config.publish.commit_message.as_deref(), Some("Daily prices"));
    assert_eq!(config.publish.timeout_secs, Some(15));
    assert_eq!(config.token.expect("token").expose(), "ghp_from_env");

    env::remove_var(TOKEN_ENV);
}

#[test]
#[serial]
fn test_token_is_never_taken_from_yaml() {
    let config_yaml = "publish:\n  repo: owner/prices\n  token: leaked\n";
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();
    env::remove_var(TOKEN_ENV);

    let config = load_config(config_file.path()).expect("Unknown keys are ignored");
    assert!(config.token.is_none());
}

#[test]
#[serial]
fn test_empty_config_file_uses_defaults() {
    let config_file = NamedTempFile::new().expect("temp file");
    env::remove_var(TOKEN_ENV);

    let config = load_config(config_file.path()).expect("Empty config should load");
    assert!(config.publish.repo.is_none());
    assert!(config.publish.path.is_none());
}

#[test]
#[serial]
fn test_env_only_config_picks_up_token() {
    env::set_var(TOKEN_ENV, "  ghp_trimmed  ");
    let config = env_only();
    assert_eq!(config.token.expect("token").expose(), "ghp_trimmed");
    env::remove_var(TOKEN_ENV);
}

#[test]
fn test_load_config_missing_file_is_an_error() {
    let err = load_config("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_load_config_invalid_yaml_is_an_error() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "publish: [unclosed").unwrap();
    let err = load_config(config_file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config YAML"));
}
