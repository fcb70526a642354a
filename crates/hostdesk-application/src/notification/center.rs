use chrono::Utc;
use hostdesk_core::model::Notification;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

const BROADCAST_CAPACITY: usize = 64;

#[derive(Default)]
struct Feed {
    items: Vec<Notification>,
    last_id: u64,
}

/// The process-wide notification list.
///
/// Entries accumulate for the life of the session until dismissed or cleared
/// on logout. Ids are wall-clock milliseconds forced strictly increasing, so
/// they stay unique even when the clock stalls or steps back.
#[derive(Clone)]
pub struct NotificationCenter {
    feed: Arc<Mutex<Feed>>,
    events: broadcast::Sender<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            feed: Arc::new(Mutex::new(Feed::default())),
            events,
        }
    }

    /// Appends a notification and announces it to overlay subscribers.
    pub fn push(&self, message: impl Into<String>) -> Notification {
        let created_at = Utc::now();
        let notification = {
            let mut feed = self.feed.lock().unwrap_or_else(|e| e.into_inner());
            let now_ms = u64::try_from(created_at.timestamp_millis()).unwrap_or(0);
            let id = now_ms.max(feed.last_id + 1);
            feed.last_id = id;

            let notification = Notification {
                id,
                message: message.into(),
                created_at,
            };
            feed.items.push(notification.clone());
            notification
        };

        // No overlay listening is fine.
        let _ = self.events.send(notification.clone());
        notification
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.feed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .items
            .clone()
    }

    pub fn len(&self) -> usize {
        self.feed.lock().unwrap_or_else(|e| e.into_inner()).items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes one notification; returns whether it existed.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut feed = self.feed.lock().unwrap_or_else(|e| e.into_inner());
        let before = feed.items.len();
        feed.items.retain(|n| n.id != id);
        feed.items.len() != before
    }

    /// Takes every pending notification, oldest first, for the overlay.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut self.feed.lock().unwrap_or_else(|e| e.into_inner()).items)
    }

    /// Removes everything. The id sequence keeps increasing.
    pub fn clear(&self) {
        self.feed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .items
            .clear();
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}
