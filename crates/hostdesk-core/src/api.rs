//! Outbound request contract for the remote host API.
//!
//! `ApiClient` is the seam between the application layer and the transport.
//! The [`endpoints`] module is the single table of REST operations.

use crate::error::Result;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call against the remote API. JSON in, JSON out.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the API base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// Transport for [`ApiRequest`]s.
///
/// Implementations attach the bearer token of the current session, map every
/// non-success status to [`crate::HostdeskError::Http`] and never retry. They
/// do not touch any local state.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn request(&self, request: ApiRequest) -> Result<Value>;
}

/// Read access to the bearer token of the current session.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Option<String>;
}

/// The REST operations of the host API.
pub mod endpoints {
    use super::ApiRequest;
    use crate::error::Result;
    use crate::model::{HostProfile, NewTemplate, OutgoingMessage, TravelerFilters};
    use serde_json::json;

    pub const HOST_PROFILE: &str = "/host/profile";
    pub const TRAVELERS: &str = "/travelers";
    pub const MESSAGES: &str = "/messages";
    pub const MESSAGE_TEMPLATES: &str = "/host/message-templates";
    pub const REVIEWS: &str = "/host/reviews";
    pub const AUTH_LOGIN: &str = "/auth/login";
    pub const AUTH_ME: &str = "/auth/me";

    pub fn get_host_profile() -> ApiRequest {
        ApiRequest::get(HOST_PROFILE)
    }

    /// Full replace of the host profile.
    pub fn update_host_profile(profile: &HostProfile) -> Result<ApiRequest> {
        Ok(ApiRequest::put(HOST_PROFILE, serde_json::to_value(profile)?))
    }

    pub fn list_travelers(filters: &TravelerFilters) -> ApiRequest {
        ApiRequest::get(TRAVELERS).with_query(filters.to_query())
    }

    pub fn send_message(message: &OutgoingMessage) -> Result<ApiRequest> {
        Ok(ApiRequest::post(MESSAGES, serde_json::to_value(message)?))
    }

    pub fn list_message_templates() -> ApiRequest {
        ApiRequest::get(MESSAGE_TEMPLATES)
    }

    pub fn save_message_template(template: &NewTemplate) -> Result<ApiRequest> {
        Ok(ApiRequest::post(
            MESSAGE_TEMPLATES,
            serde_json::to_value(template)?,
        ))
    }

    pub fn list_reviews() -> ApiRequest {
        ApiRequest::get(REVIEWS)
    }

    pub fn login(email: &str, password: &str) -> ApiRequest {
        ApiRequest::post(AUTH_LOGIN, json!({ "email": email, "password": password }))
    }

    pub fn current_identity() -> ApiRequest {
        ApiRequest::get(AUTH_ME)
    }
}
