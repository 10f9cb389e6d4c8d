use super::{
    operation::{ModelRegistry, OperationFamily},
    request::{DecodedBody, InboundRequest},
};
use crate::{
    Error, Result,
    backend::{BackendOutput, InferenceBackend},
};
use axum::{
    Json,
    body::Bytes,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/png";

/// Response body for a successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundResponse {
    Image { content_type: String, bytes: Bytes },
    Json(Value),
}

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        match self {
            OutboundResponse::Image {
                content_type,
                bytes,
            } => ([(CONTENT_TYPE, content_type)], bytes).into_response(),
            OutboundResponse::Json(value) => Json(value).into_response(),
        }
    }
}

pub struct Dispatcher {
    backend: Arc<dyn InferenceBackend>,
    registry: ModelRegistry,
    max_prompt_chars: usize,
}

impl Dispatcher {
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        registry: ModelRegistry,
        max_prompt_chars: usize,
    ) -> Self {
        Self {
            backend,
            registry,
            max_prompt_chars,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, body: &DecodedBody) -> Result<OutboundResponse> {
        let request = InboundRequest::from_body(body, self.max_prompt_chars)?;
        let model = self.registry.model_for(request.operation);

        info!(
            operation = %request.operation,
            model = model,
            "Dispatching request to backend"
        );

        let output = self.backend.run(model, &request.payload).await?;
        let response = shape_response(request.operation.family(), output)?;

        debug!("Backend call for {} completed", request.operation);
        Ok(response)
    }
}

/// Maps a backend result to the response shape of its operation family.
pub fn shape_response(family: OperationFamily, output: BackendOutput) -> Result<OutboundResponse> {
    match (family, output) {
        (
            OperationFamily::ImageGeneration,
            BackendOutput::Binary {
                bytes,
                content_type,
            },
        ) => Ok(OutboundResponse::Image {
            content_type: image_content_type(content_type),
            bytes,
        }),
        (OperationFamily::TextGeneration, BackendOutput::Structured(result)) => {
            Ok(OutboundResponse::Json(json!({ "data": result })))
        }
        (OperationFamily::Classification, BackendOutput::Structured(result)) => {
            Ok(OutboundResponse::Json(result))
        }
        (OperationFamily::ImageGeneration, BackendOutput::Structured(_)) => Err(Error::backend(
            StatusCode::BAD_GATEWAY.as_u16(),
            "expected image data from backend, got a structured result",
        )),
        (_, BackendOutput::Binary { .. }) => Err(Error::backend(
            StatusCode::BAD_GATEWAY.as_u16(),
            "expected a structured result from backend, got binary data",
        )),
    }
}

fn image_content_type(reported: Option<String>) -> String {
    reported
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or_else(|| DEFAULT_IMAGE_CONTENT_TYPE.to_string())
}
