use super::mocks::MockBackend;
use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, header::CONTENT_TYPE},
};
use inference_relay::{
    config::{
        BackendConfig, Config, LogsConfig, RateLimitConfig, ServerConfig, ValidationConfig,
    },
    server::{handlers::AppState, router},
};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8787,
            welcome_message: "Welcome to the test relay!".to_string(),
            max_body_bytes: 64 * 1024,
            client_ip_header: None,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        backend: BackendConfig {
            base_url: "http://localhost:9999".to_string(),
            account_id: "test-account".to_string(),
            api_token: "test-token".to_string(),
            timeout_secs: None,
            models: HashMap::new(),
        },
        rate_limit: RateLimitConfig {
            enabled: true,
            limit: 10,
            window_ms: 3_600_000,
            exempt: vec!["67.161.80.232".to_string()],
            sweep_interval_secs: 300,
        },
        validation: ValidationConfig {
            max_prompt_chars: 25_000,
        },
    }
}

/// Build the full relay router around a mock backend
pub fn create_test_app(config: &Config, backend: Arc<MockBackend>) -> Router {
    let state = AppState::from_config(config, backend).unwrap();
    router(state, config.server.max_body_bytes)
}

/// POST a JSON body from the given client address
pub fn json_request(body: &Value, client: [u8; 4]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(CONTENT_TYPE, "application/json")
        .extension(ConnectInfo(SocketAddr::from((client, 40000))))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// POST an arbitrary body with an optional content type
pub fn raw_request(content_type: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/")
        .extension(ConnectInfo(SocketAddr::from(([10, 0, 0, 99], 40000))));
    if let Some(ct) = content_type {
        builder = builder.header(CONTENT_TYPE, ct);
    }
    builder.body(body.into()).unwrap()
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9000
  client_ip_header: "cf-connecting-ip"
  logs:
    level: "debug"

backend:
  base_url: "https://api.cloudflare.com/client/v4"
  account_id: "abc123"
  api_token: "secret"
  timeout_secs: 60
  models:
    textGeneration: "@cf/meta/llama-3.1-8b-instruct"

rate_limit:
  limit: 5
  window_ms: 60000
  exempt:
    - "67.161.80.232"
    - "127.0.0.1"

validation:
  max_prompt_chars: 1000
"#;

/// Smallest valid configuration
pub const MINIMAL_CONFIG_YAML: &str = r#"
backend:
  account_id: "abc123"
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
backend:
  account_id: "abc123"
"#;
