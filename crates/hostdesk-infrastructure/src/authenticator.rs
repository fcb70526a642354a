//! API-backed credential and token validation.

use crate::http_client::HttpTransport;
use hostdesk_core::api::endpoints;
use hostdesk_core::session::{Authenticator, Credentials, Identity, LoginGrant};
use hostdesk_core::{HostdeskConfig, Result};

/// Validates credentials and tokens against the remote auth endpoints.
#[derive(Debug, Clone)]
pub struct ApiAuthenticator {
    transport: HttpTransport,
}

impl ApiAuthenticator {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &HostdeskConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::new(
            &config.api_base_url,
            config.request_timeout(),
        )?))
    }
}

#[async_trait::async_trait]
impl Authenticator for ApiAuthenticator {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant> {
        let request = endpoints::login(&credentials.email, &credentials.password);
        let response = self.transport.send(&request, None).await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn verify(&self, token: &str) -> Result<Identity> {
        let response = self
            .transport
            .send(&endpoints::current_identity(), Some(token))
            .await?;
        Ok(serde_json::from_value(response)?)
    }
}
