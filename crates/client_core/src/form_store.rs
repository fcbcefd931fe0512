use shared::domain::{AddressPatch, DraftField, RegistrationDraft};
use tracing::trace;

/// Owns the draft for one form session. Updates never fail and never validate.
#[derive(Debug, Default)]
pub struct FormStore {
    draft: RegistrationDraft,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(draft: RegistrationDraft) -> Self {
        Self { draft }
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        *self.draft.field_mut(field) = value.into();
        trace!(field = field.as_str(), "draft field updated");
    }

    /// Applies the provided subset of a lookup result. Number, complement and reference
    /// are never part of a patch.
    pub fn merge_address(&mut self, patch: AddressPatch) {
        let address = &mut self.draft.address;
        if let Some(street) = patch.street {
            address.street = street;
        }
        if let Some(city) = patch.city {
            address.city = city;
        }
        if let Some(state) = patch.state {
            address.state = state;
        }
        if let Some(neighbourhood) = patch.neighbourhood {
            address.neighbourhood = neighbourhood;
        }
    }

    pub fn reset(&mut self) {
        self.draft = RegistrationDraft::default();
    }
}

#[cfg(test)]
#[path = "tests/form_store_tests.rs"]
mod tests;
