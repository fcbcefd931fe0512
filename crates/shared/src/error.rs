use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Structured failure body returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Extracts the user-facing message from a backend failure body.
///
/// A bare string body is returned verbatim, an object with a string `error` field yields
/// that field, anything else yields `None` so the caller can pick a generic message.
pub fn backend_error_message(body: Option<&Value>) -> Option<String> {
    match body? {
        Value::String(text) => Some(text.clone()),
        value @ Value::Object(_) => serde_json::from_value::<ApiError>(value.clone())
            .ok()
            .map(|api_error| api_error.error)
            .filter(|message| !message.is_empty()),
        _ => None,
    }
}
