use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::domain::DraftField;

use crate::{
    enrichment::AddressEnrichment, error::TransportError, session::RegistrationSession,
    transport::HttpTransport, Navigator,
};

pub const LOOKUP_BASE: &str = "https://lookup.test/ws";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// In-memory transport answering from per-method queues.
#[derive(Default)]
pub struct ScriptedTransport {
    gets: Mutex<VecDeque<Result<Value, TransportError>>>,
    by_url: Mutex<HashMap<String, Result<Value, TransportError>>>,
    posts: Mutex<VecDeque<Result<Value, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_get(&self, result: Result<Value, TransportError>) {
        self.gets.lock().expect("gets").push_back(result);
    }

    /// Answers GETs for exactly `url`, regardless of call order.
    pub fn respond_to(&self, url: &str, result: Result<Value, TransportError>) {
        self.by_url
            .lock()
            .expect("by_url")
            .insert(url.to_string(), result);
    }

    pub fn push_post(&self, result: Result<Value, TransportError>) {
        self.posts.lock().expect("posts").push_back(result);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls").clone()
    }

    fn unscripted(url: &str) -> TransportError {
        TransportError::Network {
            url: url.to_string(),
            message: "no scripted response".into(),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<Value, TransportError> {
        self.calls.lock().expect("calls").push(RecordedCall {
            method: "GET",
            url: url.to_string(),
            body: None,
        });
        if let Some(result) = self.by_url.lock().expect("by_url").remove(url) {
            return result;
        }
        self.gets
            .lock()
            .expect("gets")
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted(url)))
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        self.calls.lock().expect("calls").push(RecordedCall {
            method: "POST",
            url: path.to_string(),
            body: Some(body),
        });
        self.posts
            .lock()
            .expect("posts")
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted(path)))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().expect("routes").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().expect("routes").push(route.to_string());
    }
}

pub fn status_error(status: u16, body: Option<Value>) -> TransportError {
    TransportError::Status {
        url: "http://backend.test".into(),
        status,
        body,
    }
}

pub fn se_lookup_body() -> Value {
    json!({
        "cep": "01001-000",
        "logradouro": "Praça da Sé",
        "complemento": "lado ímpar",
        "bairro": "Sé",
        "localidade": "São Paulo",
        "uf": "SP"
    })
}

pub struct Harness {
    pub session: RegistrationSession,
    pub lookup: Arc<ScriptedTransport>,
    pub api: Arc<ScriptedTransport>,
    pub navigator: Arc<RecordingNavigator>,
}

pub fn harness() -> Harness {
    let lookup = ScriptedTransport::new();
    let api = ScriptedTransport::new();
    let navigator = RecordingNavigator::new();
    let enrichment = AddressEnrichment::new(lookup.clone(), LOOKUP_BASE);
    let session = RegistrationSession::new(enrichment, api.clone(), navigator.clone());
    Harness {
        session,
        lookup,
        api,
        navigator,
    }
}

/// Fills every required field with formatted input, leaving optional fields empty. The
/// postal code is set directly so no lookup is issued.
pub fn fill_required(session: &mut RegistrationSession) {
    let fields = [
        (DraftField::CompanyName, "Acme Ltda"),
        (DraftField::DocumentNumber, "12.345.678/0001-90"),
        (DraftField::RepresentativeName, "Ana Souza"),
        (DraftField::RepresentativePhone, "(11) 99999-0000"),
        (DraftField::RepresentativeEmail, "ana@acme.test"),
        (DraftField::Street, "Praça da Sé"),
        (DraftField::Number, "100"),
        (DraftField::City, "São Paulo"),
        (DraftField::State, "SP"),
    ];
    for (field, value) in fields {
        assert!(session.edit(field, value).is_none());
    }
    let _ = session.edit(DraftField::PostalCode, "01001-000");
}
