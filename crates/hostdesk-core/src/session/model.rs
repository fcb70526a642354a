use serde::{Deserialize, Serialize};
use std::fmt;

/// Who the current user is, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(deserialize_with = "crate::model::id_as_string")]
    pub id: String,
    pub name: String,
}

impl Identity {
    /// Stand-in identity used while a restored token awaits validation.
    pub fn placeholder() -> Self {
        Self {
            id: String::new(),
            name: "Host".to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }
}

/// Whether the identity has been confirmed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Restored from a persisted token, not yet validated.
    Provisional,
    Verified,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    pub token: String,
    pub status: SessionStatus,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.identity.id
    }

    pub fn display_name(&self) -> &str {
        &self.identity.name
    }

    pub fn is_provisional(&self) -> bool {
        self.status == SessionStatus::Provisional
    }
}

// Keeps the token out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("token", &"<redacted>")
            .field("status", &self.status)
            .finish()
    }
}

/// Two-state authentication machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(Session),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.session().map(|s| s.token.as_str())
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
