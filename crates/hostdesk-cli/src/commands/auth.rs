use crate::output;
use anyhow::{Context, Result};
use colored::Colorize;
use hostdesk_application::{AppContext, Notice};
use hostdesk_core::session::{Credentials, Route, Tab};
use std::io::{self, BufRead, Write};

pub async fn login(ctx: &AppContext, email: String, password: Option<String>) -> Result<()> {
    // An existing session skips the login form.
    if ctx.route(Route::Login).await != Route::Login {
        if let Some(session) = ctx.session().current_session().await {
            println!("Already logged in as {}.", session.display_name().bold());
        }
        return Ok(());
    }

    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };
    ctx.login(&Credentials { email, password }).await?;

    let name = ctx
        .session()
        .current_session()
        .await
        .map(|s| s.display_name().to_string())
        .unwrap_or_default();
    output::print_notice(&Notice::info("Logged In", format!("Welcome back, {}.", name)));
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    super::enter(ctx, Tab::Profile).await?;
    ctx.logout().await?;
    output::print_notice(&Notice::info("Logged Out", "Your session has been cleared."));
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> Result<()> {
    super::enter(ctx, Tab::Profile).await?;
    let session = ctx.session().require_session().await?;

    output::heading("Session");
    output::field("Name", session.display_name());
    output::field("User id", session.user_id());
    let status = if session.is_provisional() {
        "unverified (server unreachable)".yellow().to_string()
    } else {
        "verified".green().to_string()
    };
    output::field("Status", &status);
    Ok(())
}

fn prompt_password() -> Result<String> {
    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
