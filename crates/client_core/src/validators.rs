//! Field normalization and the submission readiness rule.

use shared::domain::RegistrationDraft;

pub const DOCUMENT_NUMBER_DIGITS: usize = 14;
pub const POSTAL_CODE_DIGITS: usize = 8;

pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn digit_count(raw: &str) -> usize {
    raw.chars().filter(char::is_ascii_digit).count()
}

/// Single pass/fail verdict for a draft. Complement, reference and neighbourhood are
/// optional; everything else must be filled and both documents must have their exact
/// digit counts.
pub fn is_registration_ready(draft: &RegistrationDraft) -> bool {
    let required = [
        draft.company_name.as_str(),
        draft.representative.name.as_str(),
        draft.representative.phone.as_str(),
        draft.representative.email.as_str(),
        draft.address.street.as_str(),
        draft.address.number.as_str(),
        draft.address.city.as_str(),
        draft.address.state.as_str(),
    ];
    if required.into_iter().any(is_blank) {
        return false;
    }

    digit_count(&draft.document_number) == DOCUMENT_NUMBER_DIGITS
        && digit_count(&draft.address.postal_code) == POSTAL_CODE_DIGITS
}

#[cfg(test)]
#[path = "tests/validators_tests.rs"]
mod tests;
