use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representative {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub postal_code: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub reference: String,
    pub city: String,
    pub state: String,
    pub neighbourhood: String,
}

/// In-progress registration record. Values are kept exactly as typed; nothing here is
/// normalized or validated until submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub company_name: String,
    pub document_number: String,
    pub representative: Representative,
    pub address: Address,
}

/// Addressable field of a [`RegistrationDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    CompanyName,
    DocumentNumber,
    RepresentativeName,
    RepresentativePhone,
    RepresentativeEmail,
    PostalCode,
    Street,
    Number,
    Complement,
    Reference,
    City,
    State,
    Neighbourhood,
}

impl DraftField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompanyName => "company_name",
            Self::DocumentNumber => "document_number",
            Self::RepresentativeName => "representative.name",
            Self::RepresentativePhone => "representative.phone",
            Self::RepresentativeEmail => "representative.email",
            Self::PostalCode => "address.postal_code",
            Self::Street => "address.street",
            Self::Number => "address.number",
            Self::Complement => "address.complement",
            Self::Reference => "address.reference",
            Self::City => "address.city",
            Self::State => "address.state",
            Self::Neighbourhood => "address.neighbourhood",
        }
    }
}

impl RegistrationDraft {
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::CompanyName => &self.company_name,
            DraftField::DocumentNumber => &self.document_number,
            DraftField::RepresentativeName => &self.representative.name,
            DraftField::RepresentativePhone => &self.representative.phone,
            DraftField::RepresentativeEmail => &self.representative.email,
            DraftField::PostalCode => &self.address.postal_code,
            DraftField::Street => &self.address.street,
            DraftField::Number => &self.address.number,
            DraftField::Complement => &self.address.complement,
            DraftField::Reference => &self.address.reference,
            DraftField::City => &self.address.city,
            DraftField::State => &self.address.state,
            DraftField::Neighbourhood => &self.address.neighbourhood,
        }
    }

    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::CompanyName => &mut self.company_name,
            DraftField::DocumentNumber => &mut self.document_number,
            DraftField::RepresentativeName => &mut self.representative.name,
            DraftField::RepresentativePhone => &mut self.representative.phone,
            DraftField::RepresentativeEmail => &mut self.representative.email,
            DraftField::PostalCode => &mut self.address.postal_code,
            DraftField::Street => &mut self.address.street,
            DraftField::Number => &mut self.address.number,
            DraftField::Complement => &mut self.address.complement,
            DraftField::Reference => &mut self.address.reference,
            DraftField::City => &mut self.address.city,
            DraftField::State => &mut self.address.state,
            DraftField::Neighbourhood => &mut self.address.neighbourhood,
        }
    }
}

/// Subset of address fields produced by a postal-code lookup. `None` leaves the draft
/// value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPatch {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub neighbourhood: Option<String>,
}

impl AddressPatch {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.neighbourhood.is_none()
    }
}
