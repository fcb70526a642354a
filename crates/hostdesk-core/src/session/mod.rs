//! Session domain module.
//!
//! - `model`: identity, session and the two-state auth machine
//! - `route`: views and the access guard evaluated on every render
//! - `service`: collaborator traits for durable token storage and
//!   credential/identity validation

mod model;
mod route;
mod service;

pub use model::{AuthState, Credentials, Identity, Session, SessionStatus};
pub use route::{guard, Route, Tab};
pub use service::{Authenticator, LoginGrant, TokenStore, AUTH_TOKEN_KEY};
