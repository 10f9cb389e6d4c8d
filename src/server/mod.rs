pub mod body;
pub mod handlers;

use crate::{
    Error, Result,
    backend::{InferenceBackend, WorkersAiClient},
    config::Config,
    dispatch::{Dispatcher, ModelRegistry},
    rate_limit::RateLimiter,
};
use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::{
        HeaderName, HeaderValue,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
};
use handlers::AppState;
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{info, info_span};
use uuid::Uuid;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, HEAD, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

impl AppState {
    pub fn from_config(config: &Config, backend: Arc<dyn InferenceBackend>) -> Result<Self> {
        let dispatcher = Dispatcher::new(
            backend,
            ModelRegistry::new(&config.backend.models),
            config.validation.max_prompt_chars,
        );

        let rate_limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiter::from_config(&config.rate_limit)));

        let client_ip_header = config
            .server
            .client_ip_header
            .as_deref()
            .map(|name| {
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    Error::config(format!("Invalid server.client_ip_header '{name}': {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            dispatcher: Arc::new(dispatcher),
            rate_limiter,
            welcome_message: config.server.welcome_message.clone(),
            client_ip_header,
        })
    }
}

/// Builds the relay router. Every response, errors and preflights included,
/// carries the permissive CORS header set.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .fallback(handlers::relay)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
            info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                request_id = %Uuid::new_v4(),
            )
        }))
}

/// Periodically evicts rate limit entries whose window has passed.
pub fn spawn_sweeper(limiter: Arc<RateLimiter>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            limiter.sweep(Instant::now());
        }
    })
}

pub async fn run(config: Config) -> Result<()> {
    let backend = Arc::new(WorkersAiClient::new(&config.backend)?);
    let state = AppState::from_config(&config, backend)?;

    if let Some(limiter) = &state.rate_limiter {
        info!(
            "Rate limiting {} requests per {} ms ({} exempt)",
            config.rate_limit.limit,
            config.rate_limit.window_ms,
            config.rate_limit.exempt.len()
        );
        spawn_sweeper(
            limiter.clone(),
            Duration::from_secs(config.rate_limit.sweep_interval_secs),
        );
    }

    let app = router(state, config.server.max_body_bytes);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
