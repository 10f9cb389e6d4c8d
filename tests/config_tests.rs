use inference_relay::{
    Error,
    config::{self, Config},
    dispatch::{ModelRegistry, Operation},
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

mod common;
use common::{INVALID_CONFIG_YAML, MINIMAL_CONFIG_YAML, SAMPLE_CONFIG_YAML, create_test_config};

async fn write_config(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("config.yaml");
    tokio::fs::write(&path, content).await.unwrap();
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn test_load_sample_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SAMPLE_CONFIG_YAML).await;

    let config = config::load_from(&path).await.unwrap();
    assert_ok!(config.validate());

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9000);
    assert_eq!(
        config.server.client_ip_header.as_deref(),
        Some("cf-connecting-ip")
    );
    assert_eq!(config.server.logs.level, "debug");
    assert_eq!(config.backend.account_id, "abc123");
    assert_eq!(config.backend.timeout_secs, Some(60));
    assert_eq!(config.rate_limit.limit, 5);
    assert_eq!(config.rate_limit.window_ms, 60_000);
    assert_eq!(config.rate_limit.exempt.len(), 2);
    assert_eq!(config.validation.max_prompt_chars, 1000);

    let registry = ModelRegistry::new(&config.backend.models);
    assert_eq!(
        registry.model_for(Operation::TextGeneration),
        "@cf/meta/llama-3.1-8b-instruct"
    );
    assert_eq!(
        registry.model_for(Operation::Image),
        "@cf/bytedance/stable-diffusion-xl-lightning"
    );
}

#[test]
fn test_minimal_config_uses_defaults() {
    let config: Config = config::parse(MINIMAL_CONFIG_YAML).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8787);
    assert_eq!(config.server.max_body_bytes, 10 * 1024 * 1024);
    assert!(config.server.client_ip_header.is_none());
    assert_eq!(config.server.logs.level, "info");
    assert_eq!(
        config.backend.base_url,
        "https://api.cloudflare.com/client/v4"
    );
    assert!(config.backend.timeout_secs.is_none());
    assert!(config.backend.models.is_empty());
    assert!(config.rate_limit.enabled);
    assert_eq!(config.rate_limit.limit, 10);
    assert_eq!(config.rate_limit.window_ms, 3_600_000);
    assert!(config.rate_limit.exempt.is_empty());
    assert_eq!(config.validation.max_prompt_chars, 25_000);
    assert_ok!(config.validate());
}

#[test]
fn test_invalid_yaml_is_rejected() {
    let err = assert_err!(config::parse(INVALID_CONFIG_YAML));
    assert!(matches!(err, Error::Yaml(_)));
}

#[test]
fn test_unknown_model_override_is_rejected() {
    let yaml = r#"
backend:
  account_id: "abc"
  models:
    videoGeneration: "@cf/whatever"
"#;
    assert_err!(config::parse(yaml));
}

#[test]
fn test_missing_backend_section_is_rejected() {
    assert_err!(config::parse("server:\n  port: 8080\n"));
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = create_test_config();
    config.backend.account_id = "  ".to_string();
    assert!(matches!(config.validate(), Err(Error::Config(_))));

    let mut config = create_test_config();
    config.rate_limit.limit = 0;
    assert!(matches!(config.validate(), Err(Error::Config(_))));

    let mut config = create_test_config();
    config.rate_limit.enabled = false;
    config.rate_limit.limit = 0;
    assert_ok!(config.validate());

    let mut config = create_test_config();
    config.validation.max_prompt_chars = 0;
    assert!(matches!(config.validate(), Err(Error::Config(_))));

    let mut config = create_test_config();
    config.backend.timeout_secs = Some(0);
    assert!(matches!(config.validate(), Err(Error::Config(_))));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let err = assert_err!(config::load_from("/nonexistent/relay/config.yaml").await);
    assert!(matches!(err, Error::Io(_)));
}
