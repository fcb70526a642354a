use anyhow::Result;
use colored::Colorize;
use hostdesk_application::{AppContext, SyntheticNotificationSource};
use hostdesk_core::session::Tab;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

/// Prints notifications until `ticks` have arrived or Ctrl-C.
pub async fn run(ctx: &AppContext, period: Duration, ticks: Option<usize>) -> Result<()> {
    super::enter(ctx, Tab::Profile).await?;

    let mut events = ctx.notifications().subscribe();
    let poller = ctx.start_notifications(Arc::new(SyntheticNotificationSource::default()), period);
    println!(
        "Watching for notifications every {}s (Ctrl-C to stop)...",
        period.as_secs()
    );

    let mut seen = 0usize;
    while ticks.is_none_or(|limit| seen < limit) {
        tokio::select! {
            event = events.recv() => match event {
                Ok(notification) => {
                    seen += 1;
                    println!(
                        "{} {}",
                        notification.created_at.format("%H:%M:%S").to_string().dimmed(),
                        notification.message
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Watch] Skipped {} notification(s)", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.stop().await;
    println!("{} notification(s) received.", ctx.notifications().len());
    Ok(())
}
