//! One registration form session: draft, error slot, enrichment and submission wired
//! together.

use std::sync::Arc;

use shared::{
    domain::{DraftField, RegistrationDraft},
    protocol::clients_route,
};
use tracing::{debug, info};

use crate::{
    enrichment::{AddressEnrichment, EnrichmentResult, LookupSequencer, PendingLookup, ResolvedLookup},
    error::UiError,
    error_channel::ErrorChannel,
    form_store::FormStore,
    submission::{
        PendingSubmission, Settled, SubmissionController, SubmissionResponse, SubmissionState,
        SubmitBlocked,
    },
    transport::HttpTransport,
    validators::{digits_only, is_registration_ready, POSTAL_CODE_DIGITS},
    Navigator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupApplied {
    Merged,
    Failed,
    Skipped,
    /// A newer postal code was typed after this lookup was issued.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted,
    Rejected(UiError),
    Blocked(SubmitBlocked),
    /// The response did not belong to this session's request in flight; nothing changed.
    Ignored,
}

pub struct RegistrationSession {
    store: FormStore,
    errors: ErrorChannel,
    enrichment: AddressEnrichment,
    lookups: LookupSequencer,
    submission: SubmissionController,
    navigator: Arc<dyn Navigator>,
}

impl RegistrationSession {
    pub fn new(
        enrichment: AddressEnrichment,
        api: Arc<dyn HttpTransport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store: FormStore::new(),
            errors: ErrorChannel::new(),
            enrichment,
            lookups: LookupSequencer::default(),
            submission: SubmissionController::new(api),
            navigator,
        }
    }

    pub fn draft(&self) -> &RegistrationDraft {
        self.store.draft()
    }

    pub fn is_ready(&self) -> bool {
        is_registration_ready(self.store.draft())
    }

    pub fn error(&self) -> Option<&UiError> {
        self.errors.current()
    }

    pub fn dismiss_error(&mut self) {
        self.errors.clear();
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission.state()
    }

    /// Stores the value as typed. Editing the postal code supersedes any lookup still in
    /// flight and, once the code is complete, returns a new lookup for the caller to run.
    pub fn edit(&mut self, field: DraftField, value: impl Into<String>) -> Option<PendingLookup> {
        let value = value.into();
        self.store.set_field(field, value.clone());
        if field != DraftField::PostalCode {
            return None;
        }

        let ticket = self.lookups.issue();
        if digits_only(&value).len() != POSTAL_CODE_DIGITS {
            return None;
        }
        debug!(ticket = ticket.0, "postal code lookup issued");
        Some(PendingLookup::new(ticket, value, self.enrichment.clone()))
    }

    pub fn apply_lookup(&mut self, resolved: ResolvedLookup) -> LookupApplied {
        if !self.lookups.is_current(resolved.ticket) {
            debug!(ticket = resolved.ticket.0, "discarding stale postal code lookup");
            return LookupApplied::Stale;
        }

        match resolved.result {
            EnrichmentResult::Skipped => LookupApplied::Skipped,
            EnrichmentResult::Found(patch) => {
                self.store.merge_address(patch);
                LookupApplied::Merged
            }
            EnrichmentResult::Failed(_) => {
                self.errors.show(UiError::postal_code_not_found());
                LookupApplied::Failed
            }
        }
    }

    /// Edits the postal code and awaits its lookup in place.
    pub async fn update_postal_code(&mut self, raw: impl Into<String>) -> LookupApplied {
        match self.edit(DraftField::PostalCode, raw) {
            Some(pending) => {
                let resolved = pending.resolve().await;
                self.apply_lookup(resolved)
            }
            None => LookupApplied::Skipped,
        }
    }

    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitBlocked> {
        let pending = self.submission.begin(self.store.draft());
        if let Err(SubmitBlocked::NotReady) = pending {
            self.errors.show(UiError::validation());
        }
        pending
    }

    pub fn complete_submit(&mut self, response: SubmissionResponse) -> SubmissionOutcome {
        match self.submission.complete(response) {
            Settled::Accepted => {
                self.store.reset();
                self.errors.clear();
                self.lookups.issue();
                info!(route = clients_route(), "registration complete, leaving form");
                self.navigator.navigate(clients_route());
                SubmissionOutcome::Accepted
            }
            Settled::Rejected(error) => {
                self.errors.show(error.clone());
                SubmissionOutcome::Rejected(error)
            }
            Settled::Ignored => SubmissionOutcome::Ignored,
        }
    }

    pub async fn submit(&mut self) -> SubmissionOutcome {
        match self.begin_submit() {
            Ok(pending) => {
                let response = pending.send().await;
                self.complete_submit(response)
            }
            Err(SubmitBlocked::NotReady) => SubmissionOutcome::Rejected(UiError::validation()),
            Err(blocked) => SubmissionOutcome::Blocked(blocked),
        }
    }

    /// Abandons the form: the draft is discarded, outstanding lookups and any submission in
    /// flight are invalidated and the user is sent back to the client listing.
    pub fn cancel(&mut self) {
        self.store.reset();
        self.errors.clear();
        self.lookups.issue();
        self.submission.abandon();
        self.navigator.navigate(clients_route());
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
