//! Postal-code lookup and the ticketing that keeps late responses from landing.

use std::sync::Arc;

use shared::{domain::AddressPatch, protocol::PostalCodeLookupResponse};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    error::TransportError,
    transport::HttpTransport,
    validators::{digits_only, POSTAL_CODE_DIGITS},
};

#[derive(Debug, Error)]
pub enum EnrichmentFailure {
    #[error("postal code {code} not found")]
    NotFound { code: String },
    #[error("postal code lookup failed: {0}")]
    Transport(#[from] TransportError),
    #[error("malformed lookup response for {code}: {message}")]
    Malformed { code: String, message: String },
}

#[derive(Debug)]
pub enum EnrichmentResult {
    /// The code is not complete yet; no request was made.
    Skipped,
    Found(AddressPatch),
    Failed(EnrichmentFailure),
}

#[derive(Clone)]
pub struct AddressEnrichment {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl AddressEnrichment {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn lookup_url(&self, code: &str) -> String {
        format!("{}/{code}/json/", self.base_url)
    }

    pub async fn lookup(&self, raw_postal_code: &str) -> EnrichmentResult {
        let code = digits_only(raw_postal_code);
        if code.len() != POSTAL_CODE_DIGITS {
            return EnrichmentResult::Skipped;
        }

        let body = match self.transport.get(&self.lookup_url(&code)).await {
            Ok(body) => body,
            Err(err) => {
                warn!(%code, error = %err, "postal code lookup request failed");
                return EnrichmentResult::Failed(err.into());
            }
        };

        let response: PostalCodeLookupResponse = match serde_json::from_value(body) {
            Ok(response) => response,
            Err(err) => {
                warn!(%code, error = %err, "postal code lookup returned malformed body");
                return EnrichmentResult::Failed(EnrichmentFailure::Malformed {
                    code,
                    message: err.to_string(),
                });
            }
        };

        if response.is_not_found() {
            info!(%code, "postal code not found by provider");
            return EnrichmentResult::Failed(EnrichmentFailure::NotFound { code });
        }

        debug!(%code, "postal code resolved");
        EnrichmentResult::Found(response.into_patch())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupTicket(pub u64);

/// Tracks the most recent lookup issued for the postal-code field.
#[derive(Debug, Default)]
pub struct LookupSequencer {
    latest: u64,
}

impl LookupSequencer {
    pub fn issue(&mut self) -> LookupTicket {
        self.latest += 1;
        LookupTicket(self.latest)
    }

    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        ticket.0 == self.latest
    }
}

/// A lookup that has been issued but not awaited. Holds no borrow on the session, so the
/// form stays editable while it runs.
pub struct PendingLookup {
    ticket: LookupTicket,
    postal_code: String,
    enrichment: AddressEnrichment,
}

impl PendingLookup {
    pub(crate) fn new(
        ticket: LookupTicket,
        postal_code: String,
        enrichment: AddressEnrichment,
    ) -> Self {
        Self {
            ticket,
            postal_code,
            enrichment,
        }
    }

    pub fn ticket(&self) -> LookupTicket {
        self.ticket
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub async fn resolve(self) -> ResolvedLookup {
        let result = self.enrichment.lookup(&self.postal_code).await;
        ResolvedLookup {
            ticket: self.ticket,
            result,
        }
    }
}

#[derive(Debug)]
pub struct ResolvedLookup {
    pub ticket: LookupTicket,
    pub result: EnrichmentResult,
}

#[cfg(test)]
#[path = "tests/enrichment_tests.rs"]
mod tests;
