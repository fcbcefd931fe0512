use shared::domain::{Address, RegistrationDraft, Representative};

use super::*;

fn minimal_ready_draft() -> RegistrationDraft {
    RegistrationDraft {
        company_name: "Acme Ltda".into(),
        document_number: "12.345.678/0001-90".into(),
        representative: Representative {
            name: "Ana Souza".into(),
            phone: "(11) 99999-0000".into(),
            email: "ana@acme.test".into(),
        },
        address: Address {
            postal_code: "01001-000".into(),
            street: "Praça da Sé".into(),
            number: "100".into(),
            city: "São Paulo".into(),
            state: "SP".into(),
            ..Address::default()
        },
    }
}

#[test]
fn digits_only_strips_formatting() {
    assert_eq!(digits_only("12.345.678/0001-90"), "12345678000190");
    assert_eq!(digits_only("(11) 9 9999-0000"), "11999990000");
    assert_eq!(digits_only("no digits here"), "");
    assert_eq!(digits_only(""), "");
}

#[test]
fn digits_only_is_idempotent() {
    for raw in ["01001-000", " 1a2b3c ", "٣٤٥ 67", "---", "0"] {
        let once = digits_only(raw);
        assert_eq!(digits_only(&once), once, "input {raw:?}");
        assert!(once.chars().all(|c| c.is_ascii_digit()));
    }
}

#[test]
fn is_blank_ignores_surrounding_whitespace() {
    assert!(is_blank(""));
    assert!(is_blank("   "));
    assert!(is_blank("\t\n "));
    assert!(!is_blank(" a "));
    assert!(!is_blank("0"));
}

#[test]
fn minimal_required_fields_are_ready() {
    assert!(is_registration_ready(&minimal_ready_draft()));
}

#[test]
fn each_required_field_blocks_readiness_when_blank() {
    let blankers: [fn(&mut RegistrationDraft); 8] = [
        |d| d.company_name = "  ".into(),
        |d| d.representative.name.clear(),
        |d| d.representative.phone.clear(),
        |d| d.representative.email = " ".into(),
        |d| d.address.street.clear(),
        |d| d.address.number.clear(),
        |d| d.address.city.clear(),
        |d| d.address.state.clear(),
    ];

    for (index, blank) in blankers.iter().enumerate() {
        let mut draft = minimal_ready_draft();
        blank(&mut draft);
        assert!(!is_registration_ready(&draft), "field #{index} should be required");
    }
}

#[test]
fn optional_fields_do_not_affect_readiness() {
    let mut draft = minimal_ready_draft();
    draft.address.neighbourhood.clear();
    draft.address.complement.clear();
    draft.address.reference.clear();
    assert!(is_registration_ready(&draft));
}

#[test]
fn document_number_must_have_fourteen_digits() {
    let mut draft = minimal_ready_draft();
    draft.document_number = "12.345.678/0001-9".into();
    assert!(!is_registration_ready(&draft));

    draft.document_number = "12.345.678/0001-901".into();
    assert!(!is_registration_ready(&draft));

    draft.document_number = "12345678000190".into();
    assert!(is_registration_ready(&draft));
}

#[test]
fn postal_code_must_have_eight_digits() {
    let mut draft = minimal_ready_draft();
    draft.address.postal_code = "01001-00".into();
    assert!(!is_registration_ready(&draft));

    draft.address.postal_code = "010010000".into();
    assert!(!is_registration_ready(&draft));
}

#[test]
fn readiness_is_stable_across_repeated_calls() {
    let draft = minimal_ready_draft();
    let verdicts: Vec<bool> = (0..5).map(|_| is_registration_ready(&draft)).collect();
    assert!(verdicts.iter().all(|ready| *ready));
}
