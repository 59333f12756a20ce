//! Tests for client configuration.

use super::*;
use serial_test::serial;
use std::io::Write;

fn clear_env() {
    std::env::remove_var("SQS_COURIER__REGION");
    std::env::remove_var("SQS_COURIER__ENDPOINT_URL");
}

#[test]
fn test_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.region, "us-east-1");
    assert_eq!(config.endpoint_url, None);
    assert_eq!(config.profile_name, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_with_region() {
    let config = ClientConfig::with_region("ap-southeast-2");
    assert_eq!(config.region, "ap-southeast-2");
    assert_eq!(config.endpoint_url, None);
}

#[test]
fn test_empty_region_is_rejected() {
    let config = ClientConfig::with_region("  ");
    assert!(matches!(
        config.validate(),
        Err(ConfigurationError::Invalid { .. })
    ));
}

#[test]
fn test_endpoint_must_be_http() {
    let mut config = ClientConfig::default();

    config.endpoint_url = Some("http://localhost:4566".to_string());
    assert!(config.validate().is_ok());

    config.endpoint_url = Some("ftp://localhost:4566".to_string());
    assert!(config.validate().is_err());

    config.endpoint_url = Some("not a url".to_string());
    assert!(config.validate().is_err());
}

#[test]
#[serial]
fn test_load_without_sources_uses_defaults() {
    clear_env();

    let config = ClientConfig::load(None).expect("defaults should load");
    assert_eq!(config, ClientConfig::default());
}

#[test]
#[serial]
fn test_load_from_file() {
    clear_env();

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp file");
    writeln!(
        file,
        "region = \"eu-central-1\"\nendpoint_url = \"http://localhost:4566\""
    )
    .expect("write config");

    let config = ClientConfig::load(Some(file.path())).expect("file should load");
    assert_eq!(config.region, "eu-central-1");
    assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
    assert_eq!(config.profile_name, None);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp file");
    writeln!(file, "region = \"eu-central-1\"").expect("write config");

    std::env::set_var("SQS_COURIER__REGION", "sa-east-1");
    let result = ClientConfig::load(Some(file.path()));
    clear_env();

    assert_eq!(result.expect("config should load").region, "sa-east-1");
}

#[test]
#[serial]
fn test_missing_file_is_an_error() {
    clear_env();

    let result = ClientConfig::load(Some(Path::new("/nonexistent/sqs-courier.toml")));
    assert!(matches!(result, Err(ConfigurationError::Parsing { .. })));
}

#[test]
#[serial]
fn test_invalid_loaded_config_is_rejected() {
    clear_env();

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp file");
    writeln!(file, "region = \"\"").expect("write config");

    let result = ClientConfig::load(Some(file.path()));
    assert!(matches!(result, Err(ConfigurationError::Invalid { .. })));
}
