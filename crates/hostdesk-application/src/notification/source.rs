/// Supplies the content of the next notification.
#[async_trait::async_trait]
pub trait NotificationSource: Send + Sync {
    /// `None` means nothing to report this tick.
    async fn next_message(&self) -> Option<String>;
}

/// Always reports the same synthetic event.
#[derive(Debug, Clone)]
pub struct SyntheticNotificationSource {
    message: String,
}

impl SyntheticNotificationSource {
    pub const DEFAULT_MESSAGE: &'static str = "New message from a potential traveler!";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for SyntheticNotificationSource {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MESSAGE)
    }
}

#[async_trait::async_trait]
impl NotificationSource for SyntheticNotificationSource {
    async fn next_message(&self) -> Option<String> {
        Some(self.message.clone())
    }
}
