//! Login flow and token persistence.

use std::{
    io::ErrorKind as IoErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use shared::protocol::{auth_api_path, dashboard_route, AuthRequest, AuthResponse};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    error::UiError, error_channel::ErrorChannel, transport::HttpTransport, Navigator,
};

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("failed to access token file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn save(&self, token: &str) -> Result<(), TokenStoreError>;
    async fn load(&self) -> Result<Option<String>, TokenStoreError>;
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.read().await.clone())
    }
}

/// Keeps the token in a plain file so it survives between CLI invocations.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.io_error(err))?;
        }
        tokio::fs::write(&self.path, token)
            .await
            .map_err(|err| self.io_error(err))
    }

    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == IoErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    Rejected(UiError),
}

pub struct LoginFlow {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    errors: ErrorChannel,
}

impl LoginFlow {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            tokens,
            navigator,
            errors: ErrorChannel::new(),
        }
    }

    pub fn error(&self) -> Option<&UiError> {
        self.errors.current()
    }

    pub async fn login(&mut self, document_number: &str, password: &str) -> LoginOutcome {
        self.errors.clear();

        match self.try_login(document_number, password).await {
            Ok(()) => {
                info!(route = dashboard_route(), "login succeeded");
                self.navigator.navigate(dashboard_route());
                LoginOutcome::LoggedIn
            }
            Err(error) => {
                self.errors.show(error.clone());
                LoginOutcome::Rejected(error)
            }
        }
    }

    async fn try_login(&self, document_number: &str, password: &str) -> Result<(), UiError> {
        let request = AuthRequest {
            document_number: document_number.to_string(),
            password: password.to_string(),
        };
        let body = serde_json::to_value(&request).map_err(|_| UiError::unexpected_auth())?;

        let response = self
            .transport
            .post(auth_api_path(), body)
            .await
            .map_err(|err| {
                warn!(status = ?err.status(), error = %err, "login request failed");
                UiError::auth(&err)
            })?;

        let AuthResponse { token } = serde_json::from_value(response).map_err(|err| {
            warn!(error = %err, "login response carried no token");
            UiError::unexpected_auth()
        })?;

        self.tokens.save(&token).await.map_err(|err| {
            warn!(error = %err, "failed to persist session token");
            UiError::unexpected_auth()
        })
    }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
