use async_trait::async_trait;
use axum::body::Bytes;
use inference_relay::{
    Error, Result,
    backend::{BackendOutput, BackendPayload, InferenceBackend},
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Recorded backend invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendCall {
    pub model: String,
    pub payload: BackendPayload,
}

/// Mock inference backend returning queued results in order
#[derive(Debug, Default)]
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<BackendOutput>>>,
    calls: Mutex<Vec<BackendCall>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_structured(self, value: Value) -> Self {
        self.push(Ok(BackendOutput::Structured(value)));
        self
    }

    pub fn with_image(self, bytes: &'static [u8]) -> Self {
        self.push(Ok(BackendOutput::Binary {
            bytes: Bytes::from_static(bytes),
            content_type: Some("image/png".to_string()),
        }));
        self
    }

    pub fn with_error(self, error: Error) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, response: Result<BackendOutput>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn run(&self, model: &str, payload: &BackendPayload) -> Result<BackendOutput> {
        self.calls.lock().unwrap().push(BackendCall {
            model: model.to_string(),
            payload: payload.clone(),
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::unavailable("No more mock responses available")))
    }
}
