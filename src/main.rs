use anyhow::Result;
use inference_relay::{
    config,
    dispatch::{ModelRegistry, Operation},
    server,
};
use tracing::info;

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration comes first so the log level can be read from it
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))?,
        )
        .json()
        .init();

    info!("Starting inference relay with log level: {}", log_level);
    info!(
        "Backend: {} (account {}, timeout {})",
        config.backend.base_url,
        config.backend.account_id,
        config
            .backend
            .timeout_secs
            .map_or_else(|| "none".to_string(), |secs| format!("{secs}s"))
    );

    let registry = ModelRegistry::new(&config.backend.models);
    for operation in Operation::ALL {
        let overridden = config.backend.models.contains_key(&operation);
        info!(
            "Model for {}: {}{}",
            operation,
            registry.model_for(operation),
            if overridden { " (configured)" } else { "" }
        );
    }
    info!(
        "Request limits: {} prompt characters, {} body bytes",
        config.validation.max_prompt_chars, config.server.max_body_bytes
    );

    server::run(config).await?;

    Ok(())
}
