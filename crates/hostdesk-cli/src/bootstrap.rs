//! Composition root: builds the application context from config and
//! persisted state.

use anyhow::{Context, Result};
use hostdesk_application::{AppContext, SessionService};
use hostdesk_core::HostdeskConfig;
use hostdesk_infrastructure::paths::HostdeskPaths;
use hostdesk_infrastructure::{ApiAuthenticator, ConfigService, FileTokenStore, ReqwestApiClient};
use std::sync::Arc;

pub struct Bootstrapped {
    pub config: HostdeskConfig,
    pub ctx: AppContext,
}

/// Wires every service and restores the persisted session.
///
/// A restored session is verified with the server. If the server cannot be
/// reached the session stays provisional and the error is only logged.
pub async fn bootstrap(paths: &HostdeskPaths) -> Result<Bootstrapped> {
    let config = ConfigService::new(paths)?
        .get_config()
        .context("Failed to load configuration")?;

    let token_store = match &config.token_file {
        Some(path) => FileTokenStore::with_path(path.clone()),
        None => FileTokenStore::new(paths)?,
    };
    tracing::debug!("[Bootstrap] Token store at {}", token_store.path().display());

    let authenticator = ApiAuthenticator::from_config(&config)?;
    let session = Arc::new(SessionService::new(
        Arc::new(token_store),
        Arc::new(authenticator),
    ));
    let api = ReqwestApiClient::from_config(&config, session.clone())?;

    let ctx = AppContext::new(session.clone(), Arc::new(api));

    if session.restore().await?.is_authenticated()
        && let Err(err) = session.verify().await
    {
        tracing::warn!("[Bootstrap] Session left unverified: {}", err);
    }

    Ok(Bootstrapped { config, ctx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostdesk_core::session::{AuthState, Route};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unreadable_session_file_starts_anonymous() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HostdeskPaths::new(Some(temp_dir.path()));
        std::fs::write(paths.token_file().unwrap(), "{ not json").unwrap();

        let app = bootstrap(&paths).await.unwrap();

        assert_eq!(app.ctx.session().state().await, AuthState::Anonymous);
        assert_eq!(app.ctx.route(Route::Login).await, Route::Login);
    }
}
