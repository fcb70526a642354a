pub mod auth;
pub mod profile;
pub mod reviews;
pub mod templates;
pub mod travelers;
pub mod watch;

use anyhow::{bail, Result};
use hostdesk_application::AppContext;
use hostdesk_core::session::{Route, Tab};

/// Runs the access guard for a dashboard tab.
pub(crate) async fn enter(ctx: &AppContext, tab: Tab) -> Result<()> {
    match ctx.route(Route::Dashboard(tab)).await {
        Route::Login => bail!("Not logged in. Run `hostdesk login --email <EMAIL>` first."),
        Route::Dashboard(_) => Ok(()),
    }
}
