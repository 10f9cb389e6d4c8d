mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    let mut config = load_from(&config_path).await?;

    if let Ok(token) = env::var("BACKEND_API_TOKEN") {
        config.backend.api_token = token;
    }

    config.validate()?;
    Ok(config)
}

pub async fn load_from(config_path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    parse(&config_str)
}

pub fn parse(config_str: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(config_str)?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.backend.account_id.trim().is_empty() {
            return Err(Error::config("backend.account_id must not be empty"));
        }
        if self.rate_limit.enabled && self.rate_limit.limit == 0 {
            return Err(Error::config("rate_limit.limit must be at least 1"));
        }
        if self.rate_limit.window_ms == 0 {
            return Err(Error::config("rate_limit.window_ms must be positive"));
        }
        if self.rate_limit.sweep_interval_secs == 0 {
            return Err(Error::config(
                "rate_limit.sweep_interval_secs must be positive",
            ));
        }
        if self.validation.max_prompt_chars == 0 {
            return Err(Error::config("validation.max_prompt_chars must be positive"));
        }
        if self.backend.timeout_secs == Some(0) {
            return Err(Error::config("backend.timeout_secs must be positive when set"));
        }
        Ok(())
    }
}
