use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;

pub mod auth;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod error_channel;
pub mod form_store;
pub mod session;
pub mod submission;
pub mod transport;
pub mod validators;

pub use auth::{FileTokenStore, LoginFlow, LoginOutcome, MemoryTokenStore, TokenStore};
pub use config::{load_settings, Settings};
pub use enrichment::{AddressEnrichment, EnrichmentResult, PendingLookup, ResolvedLookup};
pub use error::{ErrorKind, TransportError, UiError};
pub use session::{LookupApplied, RegistrationSession, SubmissionOutcome};
pub use submission::{Settled, SubmissionState, SubmitBlocked};
pub use transport::{HttpTransport, ReqwestTransport};

/// Where the interaction layer goes next. Implementations decide what a route means.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Builds a registration session against the configured backend, attaching the stored
/// session token to API calls when one exists.
pub async fn connect_registration(
    settings: &Settings,
    tokens: &dyn TokenStore,
    navigator: Arc<dyn Navigator>,
) -> Result<RegistrationSession> {
    let token = match tokens.load().await {
        Ok(token) => token,
        Err(err) => {
            warn!(error = %err, "could not read stored session token; continuing without it");
            None
        }
    };

    let api = ReqwestTransport::new(&settings.api_base_url, settings.request_timeout())
        .context("failed to build api client")?
        .with_bearer_token(token);
    let postal = ReqwestTransport::new(&settings.postal_lookup_base_url, settings.lookup_timeout())
        .context("failed to build postal code lookup client")?;

    let enrichment = AddressEnrichment::new(Arc::new(postal), &settings.postal_lookup_base_url);
    Ok(RegistrationSession::new(enrichment, Arc::new(api), navigator))
}

pub fn connect_login(
    settings: &Settings,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
) -> Result<LoginFlow> {
    let api = ReqwestTransport::new(&settings.api_base_url, settings.request_timeout())
        .context("failed to build api client")?;
    Ok(LoginFlow::new(Arc::new(api), tokens, navigator))
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
