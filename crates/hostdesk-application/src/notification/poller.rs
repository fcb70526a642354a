use super::center::NotificationCenter;
use super::source::NotificationSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Recurring timer that appends one notification per tick.
pub struct NotificationPoller;

impl NotificationPoller {
    /// Spawns the timer. The first tick fires one full `period` after start.
    ///
    /// Ticks run strictly one after another on a single task: a slow source
    /// delays the next tick instead of overlapping it, and missed ticks are
    /// not replayed in a burst.
    pub fn start(
        center: NotificationCenter,
        source: Arc<dyn NotificationSource>,
        period: Duration,
    ) -> PollerHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!("[Poller] Started with period {:?}", period);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            biased;
                            _ = cancelled.cancelled() => break,
                            message = source.next_message() => {
                                if let Some(message) = message {
                                    let notification = center.push(message);
                                    tracing::debug!("[Poller] Appended notification {}", notification.id);
                                }
                            }
                        }
                    }
                }
            }

            tracing::debug!("[Poller] Stopped");
        });

        PollerHandle {
            token,
            task: Some(task),
        }
    }
}

/// Owns a running poller. Stopping it, or dropping it when the owning scope
/// is torn down, cancels the timer.
pub struct PollerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancels the timer and waits for the in-progress tick, if any, to end.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
            && !err.is_cancelled()
        {
            tracing::warn!("[Poller] Task ended abnormally: {}", err);
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::SyntheticNotificationSource;
    use std::collections::HashSet;

    const PERIOD: Duration = Duration::from_secs(30);

    fn synthetic() -> Arc<dyn NotificationSource> {
        Arc::new(SyntheticNotificationSource::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_n_intervals_produce_n_notifications() {
        let center = NotificationCenter::new();
        let handle = NotificationPoller::start(center.clone(), synthetic(), PERIOD);

        tokio::time::sleep(PERIOD * 3 + Duration::from_millis(1)).await;

        let notifications = center.snapshot();
        assert_eq!(notifications.len(), 3);
        let ids: HashSet<u64> = notifications.iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), 3);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_before_first_interval() {
        let center = NotificationCenter::new();
        let handle = NotificationPoller::start(center.clone(), synthetic(), PERIOD);

        tokio::time::sleep(PERIOD - Duration::from_millis(1)).await;
        assert!(center.is_empty());

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_future_ticks() {
        let center = NotificationCenter::new();
        let handle = NotificationPoller::start(center.clone(), synthetic(), PERIOD);

        tokio::time::sleep(PERIOD + Duration::from_millis(1)).await;
        assert!(handle.is_running());
        handle.stop().await;

        tokio::time::sleep(PERIOD * 5).await;
        assert_eq!(center.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_cancels_timer() {
        let center = NotificationCenter::new();
        {
            let _handle = NotificationPoller::start(center.clone(), synthetic(), PERIOD);
            tokio::time::sleep(PERIOD * 2 + Duration::from_millis(1)).await;
        }

        tokio::time::sleep(PERIOD * 4).await;
        assert_eq!(center.len(), 2);
    }
}
