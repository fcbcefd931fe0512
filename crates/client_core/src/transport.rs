//! HTTP seam used by enrichment, submission and login.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::error::TransportError;

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetches `url`, which may be absolute or relative to the transport's base url.
    async fn get(&self, url: &str) -> Result<Value, TransportError>;
    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError>;
}

pub struct ReqwestTransport {
    http: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::Network {
                url: base_url.clone(),
                message: err.to_string(),
            })?;
        Ok(Self {
            http,
            base_url,
            bearer_token: None,
        })
    }

    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<String, TransportError> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        };
        url::Url::parse(&raw)
            .map(|url| url.to_string())
            .map_err(|err| TransportError::InvalidUrl {
                url: raw,
                message: err.to_string(),
            })
    }

    async fn finish(url: String, res: Response) -> Result<Value, TransportError> {
        let status = res.status();
        let text = res.text().await?;
        let body = decode_body(&text);
        debug!(%url, status = status.as_u16(), "http response received");
        if status.is_success() {
            Ok(body.unwrap_or(Value::Null))
        } else {
            Err(TransportError::Status {
                url,
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// JSON bodies are decoded; any other non-empty body is kept as a plain string.
fn decode_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<Value, TransportError> {
        let url = self.resolve(url)?;
        debug!(%url, "GET");
        let mut req = self.http.get(&url);
        if let Some(token) = &self.bearer_token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        Self::finish(url, res).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        let url = self.resolve(path)?;
        debug!(%url, "POST");
        let mut req = self.http.post(&url).json(&body);
        if let Some(token) = &self.bearer_token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        Self::finish(url, res).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
