//! Submission state machine: validate, build the payload, send, settle.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use serde_json::Value;
use shared::{
    domain::RegistrationDraft,
    protocol::{clients_api_path, AddressRequestDto, CreateClientRequest, RepresentativeRequestDto},
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    error::{TransportError, UiError},
    transport::HttpTransport,
    validators::{digits_only, is_registration_ready},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    #[error("draft is not ready for submission")]
    NotReady,
    #[error("a submission is already in flight")]
    InFlight,
    #[error("registration was already submitted")]
    Completed,
}

/// How a submission response was settled by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Accepted,
    Rejected(UiError),
    /// The response does not belong to the request currently in flight.
    Ignored,
}

/// Attempt ids are unique across controllers so a response can only settle the request it
/// was sent for.
static NEXT_ATTEMPT: AtomicU64 = AtomicU64::new(1);

pub fn build_payload(draft: &RegistrationDraft) -> CreateClientRequest {
    CreateClientRequest {
        name: draft.company_name.clone(),
        document_number: digits_only(&draft.document_number),
        representative_request_dto: RepresentativeRequestDto {
            name: draft.representative.name.clone(),
            phone: digits_only(&draft.representative.phone),
            email: draft.representative.email.clone(),
        },
        address_request_dto: AddressRequestDto {
            zip_code: digits_only(&draft.address.postal_code),
            street: draft.address.street.clone(),
            number: draft.address.number.clone(),
            complement: draft.address.complement.clone(),
            reference: draft.address.reference.clone(),
            city: draft.address.city.clone(),
            state: draft.address.state.clone(),
            neighbourhood: draft.address.neighbourhood.clone(),
        },
    }
}

pub struct SubmissionController {
    state: SubmissionState,
    attempt: Option<u64>,
    transport: Arc<dyn HttpTransport>,
}

impl SubmissionController {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            state: SubmissionState::Idle,
            attempt: None,
            transport,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    fn transition(&mut self, next: SubmissionState) {
        debug!(from = ?self.state, to = ?next, "submission state transition");
        self.state = next;
    }

    /// Runs the readiness check and, on pass, moves to `Submitting` and hands back the
    /// request to send. Refused while a request is in flight or after success.
    pub fn begin(&mut self, draft: &RegistrationDraft) -> Result<PendingSubmission, SubmitBlocked> {
        match self.state {
            SubmissionState::Idle | SubmissionState::Failed => {}
            // `Validating` never outlives `begin`; treat it like a request in flight.
            SubmissionState::Validating | SubmissionState::Submitting => {
                return Err(SubmitBlocked::InFlight)
            }
            SubmissionState::Success => return Err(SubmitBlocked::Completed),
        }

        self.transition(SubmissionState::Validating);
        if !is_registration_ready(draft) {
            info!("submission refused: draft not ready");
            self.transition(SubmissionState::Failed);
            self.transition(SubmissionState::Idle);
            return Err(SubmitBlocked::NotReady);
        }

        let payload = build_payload(draft);
        let attempt = NEXT_ATTEMPT.fetch_add(1, Ordering::Relaxed);
        self.attempt = Some(attempt);
        self.transition(SubmissionState::Submitting);
        Ok(PendingSubmission {
            attempt,
            transport: Arc::clone(&self.transport),
            payload,
        })
    }

    /// Settles the in-flight request. A failure leaves the controller back in `Idle`; a
    /// response for any other request is ignored and changes nothing.
    pub fn complete(&mut self, response: SubmissionResponse) -> Settled {
        if self.state != SubmissionState::Submitting || self.attempt != Some(response.attempt) {
            warn!(
                state = ?self.state,
                attempt = response.attempt,
                "ignoring submission response that is not in flight"
            );
            return Settled::Ignored;
        }
        self.attempt = None;

        match response.result {
            Ok(_) => {
                info!("client registration accepted");
                self.transition(SubmissionState::Success);
                Settled::Accepted
            }
            Err(err) => {
                warn!(error = %err, "client registration rejected");
                self.transition(SubmissionState::Failed);
                self.transition(SubmissionState::Idle);
                Settled::Rejected(UiError::submission(&err))
            }
        }
    }

    /// Drops the in-flight request, if any. Its response will be ignored.
    pub fn abandon(&mut self) {
        if self.state == SubmissionState::Submitting {
            info!("abandoning submission in flight");
            self.attempt = None;
            self.transition(SubmissionState::Idle);
        }
    }
}

pub struct PendingSubmission {
    attempt: u64,
    transport: Arc<dyn HttpTransport>,
    payload: CreateClientRequest,
}

impl PendingSubmission {
    pub fn payload(&self) -> &CreateClientRequest {
        &self.payload
    }

    pub async fn send(self) -> SubmissionResponse {
        let result = match serde_json::to_value(&self.payload) {
            Ok(body) => self.transport.post(clients_api_path(), body).await,
            Err(err) => Err(TransportError::Network {
                url: clients_api_path().to_string(),
                message: format!("failed to encode payload: {err}"),
            }),
        };
        SubmissionResponse {
            attempt: self.attempt,
            result,
        }
    }
}

#[derive(Debug)]
pub struct SubmissionResponse {
    attempt: u64,
    result: Result<Value, TransportError>,
}

impl SubmissionResponse {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
