//! Collaborators of the session state machine.

use super::model::{Credentials, Identity};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Fixed key under which the auth token is persisted.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Durable client storage for the auth token. Absence means anonymous.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<String>>;

    async fn save(&self, token: &str) -> Result<()>;

    /// Removes the token. Clearing an absent token is not an error.
    async fn clear(&self) -> Result<()>;
}

/// What a successful login returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginGrant {
    pub token: String,
    #[serde(rename = "user")]
    pub identity: Identity,
}

/// Server-side credential and token validation.
#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchanges credentials for a token. Any non-success is an error.
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant>;

    /// Resolves the identity behind a previously issued token.
    async fn verify(&self, token: &str) -> Result<Identity>;
}
