use serde::{Deserialize, Serialize};

use crate::domain::AddressPatch;

pub fn clients_api_path() -> &'static str {
    "/api/clients"
}

pub fn auth_api_path() -> &'static str {
    "/api/auth"
}

pub fn clients_route() -> &'static str {
    "/clients"
}

pub fn dashboard_route() -> &'static str {
    "/dashboard"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeRequestDto {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequestDto {
    pub zip_code: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub reference: String,
    pub city: String,
    pub state: String,
    pub neighbourhood: String,
}

/// Body of `POST /api/clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub name: String,
    pub document_number: String,
    #[serde(rename = "representativeRequestDTO")]
    pub representative_request_dto: RepresentativeRequestDto,
    #[serde(rename = "addressRequestDTO")]
    pub address_request_dto: AddressRequestDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub document_number: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Postal-code provider payload. The provider answers unknown codes with a 200 carrying
/// `erro`, sometimes as a boolean and sometimes as the string `"true"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostalCodeLookupResponse {
    #[serde(default)]
    pub erro: Option<serde_json::Value>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
}

impl PostalCodeLookupResponse {
    pub fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn into_patch(self) -> AddressPatch {
        AddressPatch {
            street: Some(self.logradouro.unwrap_or_default()),
            city: Some(self.localidade.unwrap_or_default()),
            state: Some(self.uf.unwrap_or_default()),
            neighbourhood: Some(self.bairro.unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_client_request_uses_backend_field_names() {
        let request = CreateClientRequest {
            name: "Acme".into(),
            document_number: "12345678000190".into(),
            representative_request_dto: RepresentativeRequestDto {
                name: "Ana".into(),
                phone: "11999990000".into(),
                email: "ana@acme.test".into(),
            },
            address_request_dto: AddressRequestDto {
                zip_code: "01001000".into(),
                street: "Praça da Sé".into(),
                number: "100".into(),
                complement: String::new(),
                reference: String::new(),
                city: "São Paulo".into(),
                state: "SP".into(),
                neighbourhood: "Sé".into(),
            },
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["documentNumber"], "12345678000190");
        assert_eq!(value["representativeRequestDTO"]["phone"], "11999990000");
        assert_eq!(value["addressRequestDTO"]["zipCode"], "01001000");
        assert_eq!(value["addressRequestDTO"]["neighbourhood"], "Sé");
    }

    #[test]
    fn lookup_not_found_flag_accepts_bool_and_string() {
        let as_bool: PostalCodeLookupResponse =
            serde_json::from_str(r#"{"erro": true}"#).expect("bool");
        let as_string: PostalCodeLookupResponse =
            serde_json::from_str(r#"{"erro": "true"}"#).expect("string");
        let found: PostalCodeLookupResponse =
            serde_json::from_str(r#"{"cep": "01001-000", "uf": "SP"}"#).expect("found");

        assert!(as_bool.is_not_found());
        assert!(as_string.is_not_found());
        assert!(!found.is_not_found());
    }
}
