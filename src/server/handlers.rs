use super::body;
use crate::{
    Error, Result,
    dispatch::{Dispatcher, OutboundResponse},
    rate_limit::RateLimiter,
};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{debug, info};

/// Identity used for clients whose address cannot be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub rate_limiter: Option<Arc<RateLimiter>>,
    pub welcome_message: String,
    pub client_ip_header: Option<HeaderName>,
}

/// Single entry point for every method and path.
pub async fn relay(State(state): State<AppState>, req: Request) -> Response {
    match *req.method() {
        Method::OPTIONS => {
            debug!("Answering CORS preflight");
            StatusCode::NO_CONTENT.into_response()
        }
        Method::GET => state.welcome_message.clone().into_response(),
        _ => match dispatch(&state, req).await {
            Ok(response) => response.into_response(),
            Err(e) => e.into_response(),
        },
    }
}

async fn dispatch(state: &AppState, req: Request) -> Result<OutboundResponse> {
    if let Some(limiter) = &state.rate_limiter {
        let identity = client_identity(&req, state.client_ip_header.as_ref());
        if !limiter.admit(&identity) {
            return Err(Error::RateLimited);
        }
        debug!(client = %identity, "Request admitted");
    }

    let body = body::decode(req).await?;
    let response = state.dispatcher.dispatch(&body).await?;

    info!("Relayed backend response");
    Ok(response)
}

/// The client's IP, taken from the trusted header when configured and
/// present, otherwise from the connection's peer address.
pub fn client_identity(req: &Request, trusted_header: Option<&HeaderName>) -> String {
    let forwarded = trusted_header
        .and_then(|name| req.headers().get(name))
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
