//! In-memory collaborators shared by the application integration tests.

#![allow(dead_code)]

use hostdesk_application::{AppContext, SessionService};
use hostdesk_core::api::endpoints;
use hostdesk_core::session::{Authenticator, Credentials, Identity, LoginGrant, TokenStore};
use hostdesk_core::{ApiClient, ApiRequest, HostdeskError, HttpMethod, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Host API
// ============================================================================

struct ServerState {
    profile: Value,
    travelers: Vec<Value>,
    templates: Vec<Value>,
    reviews: Value,
    failures: HashMap<(HttpMethod, String), HostdeskError>,
}

/// A host API backed by in-memory state that records every request.
pub struct FakeHostApi {
    state: Mutex<ServerState>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl FakeHostApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ServerState {
                profile: json!({
                    "description": "Family farm near the coast",
                    "location": "Brittany",
                    "accommodation": "Private room",
                    "languages": "French, English",
                    "helpTypes": ["gardening"]
                }),
                travelers: vec![
                    json!({ "id": 7, "name": "Ana", "skills": ["cooking"], "availability": "June" }),
                    json!({ "id": "8", "name": "Ben", "skills": ["gardening"], "availability": "July" }),
                ],
                templates: vec![json!({ "id": 1, "name": "Greeting", "content": "Hello!" })],
                reviews: json!([
                    { "id": 1, "rating": 5, "travelerName": "Ana", "date": "2024-05-01", "comment": "Lovely" }
                ]),
                failures: HashMap::new(),
            }),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Makes every `method path` request fail with `err` until [`Self::recover`].
    pub fn fail(&self, method: HttpMethod, path: &str, err: HostdeskError) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((method, path.to_string()), err);
    }

    pub fn recover(&self, method: HttpMethod, path: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .remove(&(method, path.to_string()));
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last_call(&self, method: HttpMethod, path: &str) -> Option<ApiRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .cloned()
    }
}

#[async_trait::async_trait]
impl ApiClient for FakeHostApi {
    async fn request(&self, request: ApiRequest) -> Result<Value> {
        self.calls.lock().unwrap().push(request.clone());

        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.failures.get(&(request.method, request.path.clone())) {
            return Err(err.clone());
        }

        let body = request.body.clone().unwrap_or(Value::Null);
        match (request.method, request.path.as_str()) {
            (HttpMethod::Get, endpoints::HOST_PROFILE) => Ok(state.profile.clone()),
            (HttpMethod::Put, endpoints::HOST_PROFILE) => {
                state.profile = body.clone();
                Ok(body)
            }
            (HttpMethod::Get, endpoints::TRAVELERS) => Ok(Value::Array(state.travelers.clone())),
            (HttpMethod::Post, endpoints::MESSAGES) => {
                let target = body["travelerId"].as_str().unwrap_or_default().to_string();
                for traveler in state.travelers.iter_mut() {
                    let id = match &traveler["id"] {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    if id == target {
                        traveler["lastContacted"] = json!("2024-06-01");
                    }
                }
                Ok(json!({ "success": true }))
            }
            (HttpMethod::Get, endpoints::MESSAGE_TEMPLATES) => {
                Ok(Value::Array(state.templates.clone()))
            }
            (HttpMethod::Post, endpoints::MESSAGE_TEMPLATES) => {
                let mut created = body;
                created["id"] = json!(state.templates.len() + 1);
                state.templates.push(created.clone());
                Ok(created)
            }
            (HttpMethod::Get, endpoints::REVIEWS) => Ok(state.reviews.clone()),
            (method, path) => Err(HostdeskError::http(404, format!("{} {} not found", method, path))),
        }
    }
}

// ============================================================================
// Session collaborators
// ============================================================================

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
    read_only: AtomicBool,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Arc<Self> {
        Arc::new(Self {
            token: Mutex::new(Some(token.to_string())),
            read_only: AtomicBool::new(false),
        })
    }

    /// Makes every later `clear` fail, as on a read-only disk.
    pub fn make_read_only(&self) {
        self.read_only.store(true, Ordering::SeqCst);
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.token())
    }

    async fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(HostdeskError::storage("disk read-only"));
        }
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

/// Accepts one password and answers `verify` with a scripted result.
pub struct FakeAuthenticator {
    password: String,
    verify_result: Mutex<Result<Identity>>,
}

impl FakeAuthenticator {
    pub fn new(password: &str) -> Arc<Self> {
        Arc::new(Self {
            password: password.to_string(),
            verify_result: Mutex::new(Ok(host_identity())),
        })
    }

    pub fn verify_with(&self, result: Result<Identity>) {
        *self.verify_result.lock().unwrap() = result;
    }
}

#[async_trait::async_trait]
impl Authenticator for FakeAuthenticator {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant> {
        if credentials.password != self.password {
            return Err(HostdeskError::http(401, "Invalid credentials"));
        }
        Ok(LoginGrant {
            token: "fresh-token".to_string(),
            identity: host_identity(),
        })
    }

    async fn verify(&self, _token: &str) -> Result<Identity> {
        self.verify_result.lock().unwrap().clone()
    }
}

pub fn host_identity() -> Identity {
    Identity {
        id: "42".to_string(),
        name: "Marie".to_string(),
    }
}

pub fn credentials(password: &str) -> Credentials {
    Credentials {
        email: "marie@example.com".to_string(),
        password: password.to_string(),
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub api: Arc<FakeHostApi>,
    pub tokens: Arc<MemoryTokenStore>,
    pub auth: Arc<FakeAuthenticator>,
    pub ctx: AppContext,
}

impl Harness {
    pub fn new(tokens: Arc<MemoryTokenStore>) -> Self {
        let api = FakeHostApi::new();
        let auth = FakeAuthenticator::new("secret");
        let session = Arc::new(SessionService::new(tokens.clone(), auth.clone()));
        let ctx = AppContext::new(session, api.clone());
        Self {
            api,
            tokens,
            auth,
            ctx,
        }
    }

    /// A harness with a logged-in, verified session.
    pub async fn logged_in() -> Self {
        let harness = Self::new(Arc::new(MemoryTokenStore::default()));
        harness.ctx.login(&credentials("secret")).await.unwrap();
        harness
    }
}
