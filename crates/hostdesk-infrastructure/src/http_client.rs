//! reqwest-backed HTTP client adapter.
//!
//! Every request carries `Authorization: Bearer <token>` from the current
//! session and an `X-Request-Id` for log correlation. Non-success statuses
//! become [`HostdeskError::Http`]; nothing is retried.

use hostdesk_core::{ApiClient, ApiRequest, HostdeskConfig, HostdeskError, HttpMethod, Result, TokenProvider};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Low-level transport shared by the API client and the authenticator.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HostdeskError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request, optionally authorized with `token`.
    pub async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, request.path);
        let request_id = uuid::Uuid::new_v4().to_string();

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &url)
            .header(REQUEST_ID_HEADER, &request_id);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(
            "[HttpClient] {} {} (request_id={})",
            request.method,
            request.path,
            request_id
        );

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(
                "[HttpClient] {} {} did not complete (request_id={}): {}",
                request.method,
                request.path,
                request_id,
                e
            );
            HostdeskError::network(format!("{} {}: {}", request.method, request.path, e))
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| HostdeskError::network(format!("Failed to read response body: {}", e)))?;

        tracing::debug!(
            "[HttpClient] {} {} -> {} (request_id={})",
            request.method,
            request.path,
            status.as_u16(),
            request_id
        );

        if !status.is_success() {
            let message = error_message(status, &text);
            tracing::warn!(
                "[HttpClient] {} {} failed with {}: {} (request_id={})",
                request.method,
                request.path,
                status.as_u16(),
                message,
                request_id
            );
            return Err(HostdeskError::http(status.as_u16(), message));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
    }
}

/// Derives a human-readable message from an error response body.
///
/// Prefers a JSON `message` or `error` field, then the raw body, then the
/// canonical reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for field in ["message", "error"] {
            if let Some(text) = json.get(field).and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

/// [`ApiClient`] that reads the bearer token from the session on every call.
#[derive(Clone)]
pub struct ReqwestApiClient {
    transport: HttpTransport,
    tokens: Arc<dyn TokenProvider>,
}

impl ReqwestApiClient {
    pub fn new(transport: HttpTransport, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { transport, tokens }
    }

    pub fn from_config(config: &HostdeskConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let transport = HttpTransport::new(&config.api_base_url, config.request_timeout())?;
        Ok(Self::new(transport, tokens))
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn request(&self, request: ApiRequest) -> Result<Value> {
        let token = self.tokens.bearer_token().await;
        self.transport.send(&request, token.as_deref()).await
    }
}
