use super::operation::Operation;
use crate::{Error, Result, backend::BackendPayload, sanitize::sanitize};
use serde_json::{Map, Value};

/// A request body after content-type decoding, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    Fields(Map<String, Value>),
    Text(String),
    Opaque,
}

impl DecodedBody {
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        match self {
            DecodedBody::Fields(fields) => Some(fields),
            DecodedBody::Text(_) | DecodedBody::Opaque => None,
        }
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.fields()
            .and_then(|fields| fields.get(name))
            .filter(|value| !value.is_null())
    }
}

/// A validated request, ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundRequest {
    pub operation: Operation,
    pub payload: BackendPayload,
}

impl InboundRequest {
    /// Validates a decoded body. Checks run in a fixed order and the first
    /// failure is returned; the operation name is only resolved after the
    /// prompt has been validated.
    pub fn from_body(body: &DecodedBody, max_prompt_chars: usize) -> Result<Self> {
        let model = body.field("model");

        if model.and_then(Value::as_str) == Some(Operation::ImageClassification.name()) {
            let image = body
                .field("image")
                .ok_or_else(|| Error::invalid_payload(NOT_AN_ARRAY))?;
            return Ok(Self {
                operation: Operation::ImageClassification,
                payload: BackendPayload::Image {
                    image: parse_image(image)?,
                },
            });
        }

        let prompt = validate_prompt(body.field("prompt"), max_prompt_chars)?;

        let operation = model
            .and_then(Value::as_str)
            .and_then(Operation::from_name)
            .ok_or_else(|| Error::unsupported(describe_model(model)))?;

        Ok(Self {
            operation,
            payload: BackendPayload::Prompt {
                prompt: sanitize(prompt),
            },
        })
    }
}

fn validate_prompt(prompt: Option<&Value>, max_chars: usize) -> Result<&str> {
    let prompt = prompt.ok_or(Error::MissingInput)?;
    let prompt = prompt.as_str().ok_or(Error::TypeMismatch)?;

    if prompt.is_empty() {
        return Err(Error::EmptyInput);
    }
    if prompt.chars().count() > max_chars {
        return Err(Error::InputTooLarge { max: max_chars });
    }

    Ok(prompt)
}

const NOT_AN_ARRAY: &str = "image must be an array of numbers";
const NOT_A_PIXEL_BYTE: &str = "image values must be pixel bytes (integers 0-255)";

fn parse_image(image: &Value) -> Result<Vec<u8>> {
    let values = image
        .as_array()
        .ok_or_else(|| Error::invalid_payload(NOT_AN_ARRAY))?;
    values
        .iter()
        .map(|v| {
            v.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| Error::invalid_payload(NOT_A_PIXEL_BYTE))
        })
        .collect()
}

fn describe_model(model: Option<&Value>) -> String {
    match model {
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
        None => "undefined".to_string(),
    }
}
