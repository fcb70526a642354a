//! Session/auth state machine.
//!
//! `SessionService` owns the two-state [`AuthState`] and is the only place it
//! changes. Everything else reads it, either directly or as the
//! [`TokenProvider`] behind the HTTP client.

use hostdesk_core::session::{
    guard, AuthState, Authenticator, Credentials, Identity, Route, Session, SessionStatus,
    TokenStore,
};
use hostdesk_core::{HostdeskError, Result, TokenProvider};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct SessionService {
    state: RwLock<AuthState>,
    token_store: Arc<dyn TokenStore>,
    authenticator: Arc<dyn Authenticator>,
}

impl SessionService {
    /// Starts anonymous; call [`SessionService::restore`] on startup.
    pub fn new(token_store: Arc<dyn TokenStore>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            state: RwLock::new(AuthState::Anonymous),
            token_store,
            authenticator,
        }
    }

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.state.read().await.session().cloned()
    }

    /// Resolves the route to render for `requested` under the current state.
    pub async fn resolve(&self, requested: Route) -> Route {
        guard(&*self.state.read().await, requested)
    }

    /// Returns the session or `Unauthenticated`.
    pub async fn require_session(&self) -> Result<Session> {
        self.current_session()
            .await
            .ok_or(HostdeskError::Unauthenticated)
    }

    /// Restores a provisional session from the persisted token, if any.
    ///
    /// The identity is a placeholder until [`SessionService::verify`]
    /// confirms or revokes it.
    pub async fn restore(&self) -> Result<AuthState> {
        let token = self.token_store.load().await?;
        let mut state = self.state.write().await;
        *state = match token {
            Some(token) => {
                tracing::info!("[Session] Restored provisional session from stored token");
                AuthState::Authenticated(Session {
                    identity: Identity::placeholder(),
                    token,
                    status: SessionStatus::Provisional,
                })
            }
            None => {
                tracing::debug!("[Session] No stored token, staying anonymous");
                AuthState::Anonymous
            }
        };
        Ok(state.clone())
    }

    /// Validates a provisional session with the server.
    ///
    /// - success: the placeholder identity is replaced and the session is
    ///   marked verified
    /// - 401/403: the session is revoked and the stored token cleared
    /// - anything else: the provisional session is kept and the error returned
    pub async fn verify(&self) -> Result<AuthState> {
        let Some(session) = self.current_session().await else {
            return Ok(AuthState::Anonymous);
        };
        if !session.is_provisional() {
            return Ok(self.state().await);
        }

        match self.authenticator.verify(&session.token).await {
            Ok(identity) => {
                let mut state = self.state.write().await;
                // Only upgrade the session that was verified; a logout or
                // re-login in the meantime wins.
                if state.token() == Some(session.token.as_str()) {
                    tracing::info!("[Session] Verified identity '{}'", identity.name);
                    *state = AuthState::Authenticated(Session {
                        identity,
                        token: session.token,
                        status: SessionStatus::Verified,
                    });
                }
                Ok(state.clone())
            }
            Err(err) if err.is_auth_rejection() => {
                tracing::warn!("[Session] Stored token rejected: {}", err);
                let mut state = self.state.write().await;
                if state.token() == Some(session.token.as_str()) {
                    *state = AuthState::Anonymous;
                    drop(state);
                    self.token_store.clear().await?;
                }
                Ok(self.state().await)
            }
            Err(err) => {
                tracing::warn!("[Session] Could not verify stored token: {}", err);
                Err(err)
            }
        }
    }

    /// Exchanges credentials for a session and persists its token.
    ///
    /// Any failure leaves the state anonymous and is returned to the caller.
    pub async fn login(&self, credentials: &Credentials) -> Result<Route> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(HostdeskError::validation("Email and password are required"));
        }

        let grant = match self.authenticator.login(credentials).await {
            Ok(grant) => grant,
            Err(err) => {
                tracing::warn!("[Session] Login failed: {}", err);
                self.reset_to_anonymous().await;
                return Err(err);
            }
        };

        if let Err(err) = self.token_store.save(&grant.token).await {
            tracing::warn!("[Session] Failed to persist token: {}", err);
            self.reset_to_anonymous().await;
            return Err(err);
        }

        tracing::info!("[Session] Logged in as '{}'", grant.identity.name);
        *self.state.write().await = AuthState::Authenticated(Session {
            identity: grant.identity,
            token: grant.token,
            status: SessionStatus::Verified,
        });
        Ok(Route::home())
    }

    /// Clears the persisted token and in-memory session.
    ///
    /// The in-memory session ends even if the token file cannot be cleared.
    pub async fn logout(&self) -> Result<Route> {
        *self.state.write().await = AuthState::Anonymous;
        if let Err(err) = self.token_store.clear().await {
            tracing::warn!("[Session] Logged out, but the stored token remains: {}", err);
            return Err(err);
        }
        tracing::info!("[Session] Logged out");
        Ok(Route::Login)
    }

    /// Drops back to anonymous after a failed login. A storage failure here
    /// is logged so that it does not mask the login error.
    async fn reset_to_anonymous(&self) {
        *self.state.write().await = AuthState::Anonymous;
        if let Err(err) = self.token_store.clear().await {
            tracing::warn!("[Session] Failed to clear stored token: {}", err);
        }
    }
}

#[async_trait::async_trait]
impl TokenProvider for SessionService {
    async fn bearer_token(&self) -> Option<String> {
        self.state.read().await.token().map(str::to_string)
    }
}
