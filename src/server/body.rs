use crate::{Error, Result, dispatch::DecodedBody};
use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Multipart, Request, rejection::BytesRejection},
    http::{StatusCode, header::CONTENT_TYPE},
};
use serde_json::{Map, Value};
use tracing::debug;

/// How a body is read, chosen from its content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Text,
    UrlEncodedForm,
    MultipartForm,
    Opaque,
}

impl BodyKind {
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return BodyKind::Opaque;
        };
        let content_type = content_type.to_ascii_lowercase();

        if content_type.contains("application/json") {
            BodyKind::Json
        } else if content_type.contains("text") || content_type.contains("html") {
            BodyKind::Text
        } else if content_type.contains("multipart/form-data") {
            BodyKind::MultipartForm
        } else if content_type.contains("form") {
            BodyKind::UrlEncodedForm
        } else {
            BodyKind::Opaque
        }
    }
}

pub async fn decode(req: Request) -> Result<DecodedBody> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let kind = BodyKind::from_content_type(content_type.as_deref());

    debug!("Decoding {:?} body (content type: {:?})", kind, content_type);

    match kind {
        BodyKind::Json => {
            let bytes = read_bytes(req).await?;
            decode_json(&bytes)
        }
        BodyKind::Text => {
            let bytes = read_bytes(req).await?;
            Ok(DecodedBody::Text(String::from_utf8_lossy(&bytes).into_owned()))
        }
        BodyKind::UrlEncodedForm => decode_urlencoded(req).await,
        BodyKind::MultipartForm => decode_multipart(req).await,
        BodyKind::Opaque => Ok(DecodedBody::Opaque),
    }
}

pub fn decode_json(bytes: &[u8]) -> Result<DecodedBody> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| Error::malformed(format!("invalid JSON: {e}")))?;

    match value {
        Value::Object(fields) => Ok(DecodedBody::Fields(fields)),
        _ => Err(Error::malformed("expected a JSON object")),
    }
}

async fn read_bytes(req: Request) -> Result<Bytes> {
    Bytes::from_request(req, &()).await.map_err(bytes_rejection)
}

fn bytes_rejection(rejection: BytesRejection) -> Error {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge
    } else {
        Error::malformed(rejection.body_text())
    }
}

async fn decode_urlencoded(req: Request) -> Result<DecodedBody> {
    let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, &())
        .await
        .map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                Error::PayloadTooLarge
            } else {
                Error::malformed(rejection.body_text())
            }
        })?;

    let fields: Map<String, Value> = pairs
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();
    Ok(DecodedBody::Fields(fields))
}

async fn decode_multipart(req: Request) -> Result<DecodedBody> {
    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|err| Error::malformed(format!("Invalid multipart payload: {err}")))?;

    let mut fields = Map::new();
    while let Some(field) = multipart.next_field().await.map_err(|err| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Error::PayloadTooLarge
        } else {
            Error::malformed(format!("Failed reading multipart field: {err}"))
        }
    })? {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            debug!("Skipping multipart file field '{}'", name);
            continue;
        }

        let text = field.text().await.map_err(|err| {
            Error::malformed(format!("Failed reading multipart '{name}' field: {err}"))
        })?;
        fields.insert(name, Value::String(text));
    }

    Ok(DecodedBody::Fields(fields))
}
