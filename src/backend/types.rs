use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body sent to the backend for a single `run` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackendPayload {
    Prompt { prompt: String },
    Image { image: Vec<u8> },
}

/// What a backend `run` call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOutput {
    Binary {
        bytes: Bytes,
        content_type: Option<String>,
    },
    Structured(Value),
}

/// Workers AI response envelope for JSON results.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub result: Option<Value>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<EnvelopeMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeMessage {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

impl Envelope {
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| match (e.code, e.message.is_empty()) {
                (Some(code), true) => format!("error code {code}"),
                (Some(code), false) => format!("{} (code {})", e.message, code),
                (None, _) => e.message.clone(),
            })
            .collect();
        Some(messages.join("; "))
    }
}
