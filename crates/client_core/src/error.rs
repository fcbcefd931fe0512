use serde_json::Value;
use thiserror::Error;

pub const VALIDATION_FAILED_MESSAGE: &str = "Fill in all required fields correctly.";
pub const POSTAL_CODE_NOT_FOUND_MESSAGE: &str = "Invalid or unlocatable postal code.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid document number or password.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error. Please try again.";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("request to {url} returned status {status}")]
    Status {
        url: String,
        status: u16,
        body: Option<Value>,
    },
    #[error("invalid request url '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        let url = value
            .url()
            .map(|url| url.to_string())
            .unwrap_or_default();
        if value.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network {
                url,
                message: value.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local readiness check failed; no request was made.
    Validation,
    /// Postal-code lookup failed or returned not-found.
    Enrichment,
    Auth,
    Submission,
}

/// The message currently shown to the user, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    kind: ErrorKind,
    message: String,
}

impl UiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation() -> Self {
        Self::new(ErrorKind::Validation, VALIDATION_FAILED_MESSAGE)
    }

    pub fn postal_code_not_found() -> Self {
        Self::new(ErrorKind::Enrichment, POSTAL_CODE_NOT_FOUND_MESSAGE)
    }

    /// Derives the submission failure message from the backend response, falling back to
    /// the generic internal-error text.
    pub fn submission(error: &TransportError) -> Self {
        let message = shared::error::backend_error_message(error.body())
            .unwrap_or_else(|| INTERNAL_ERROR_MESSAGE.to_string());
        Self::new(ErrorKind::Submission, message)
    }

    pub fn auth(error: &TransportError) -> Self {
        match error.status() {
            Some(400) | Some(401) => Self::new(ErrorKind::Auth, INVALID_CREDENTIALS_MESSAGE),
            _ => Self::unexpected_auth(),
        }
    }

    pub fn unexpected_auth() -> Self {
        Self::new(ErrorKind::Auth, UNEXPECTED_ERROR_MESSAGE)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for UiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
