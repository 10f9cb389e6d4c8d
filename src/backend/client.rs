use super::types::*;
use crate::{Error, Result, config::BackendConfig};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// The remote inference capability: run a model on a payload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn run(&self, model: &str, payload: &BackendPayload) -> Result<BackendOutput>;
}

/// Client for the Workers AI REST API.
pub struct WorkersAiClient {
    client: reqwest::Client,
    base_url: String,
    account_id: String,
    api_token: String,
}

impl WorkersAiClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id.clone(),
            api_token: config.api_token.clone(),
        })
    }

    pub fn run_url(&self, model: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url, self.account_id, model
        )
    }
}

#[async_trait]
impl InferenceBackend for WorkersAiClient {
    async fn run(&self, model: &str, payload: &BackendPayload) -> Result<BackendOutput> {
        let url = self.run_url(model);
        debug!("Running backend model {} at {}", model, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::unavailable(format!("Failed to reach backend: {e}")))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Failed to read backend error body: {}", e);
                    String::new()
                }
            };
            let message = serde_json::from_str::<Envelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error_summary())
                .unwrap_or(body);
            return Err(Error::backend(status.as_u16(), message));
        }

        if is_binary(content_type.as_deref()) {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| Error::unavailable(format!("Failed to read backend body: {e}")))?;
            debug!("Backend returned {} binary bytes", bytes.len());
            return Ok(BackendOutput::Binary {
                bytes,
                content_type,
            });
        }

        let value: Value = response.json().await.map_err(|e| {
            Error::backend(status.as_u16(), format!("Invalid JSON from backend: {e}"))
        })?;

        if value.get("success").is_none() {
            return Ok(BackendOutput::Structured(value));
        }

        let envelope: Envelope = serde_json::from_value(value).map_err(|e| {
            Error::backend(status.as_u16(), format!("Unexpected backend envelope: {e}"))
        })?;
        if !envelope.success {
            let message = envelope
                .error_summary()
                .unwrap_or_else(|| "backend reported failure".to_string());
            return Err(Error::backend(status.as_u16(), message));
        }

        Ok(BackendOutput::Structured(
            envelope.result.unwrap_or(Value::Null),
        ))
    }
}

fn is_binary(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        ct.starts_with("image/") || ct.starts_with("application/octet-stream")
    })
}
