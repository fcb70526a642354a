use super::model::AuthState;
use serde::{Deserialize, Serialize};

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tab {
    Profile,
    Travelers,
    Templates,
    Reviews,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Login,
    Dashboard(Tab),
}

impl Route {
    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Where a fresh login lands.
    pub fn home() -> Self {
        Route::Dashboard(Tab::Profile)
    }
}

/// Resolves the route that should actually be rendered.
///
/// Pure function of the current state, evaluated on every render: protected
/// routes redirect to `Login` while anonymous, and `Login` redirects to the
/// dashboard while a session (even a provisional one) exists.
pub fn guard(state: &AuthState, requested: Route) -> Route {
    match (state.is_authenticated(), requested) {
        (false, route) if route.requires_session() => Route::Login,
        (true, Route::Login) => Route::home(),
        (_, route) => route,
    }
}
