use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A process-local notification. Never persisted, never sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Milliseconds since the epoch, strictly increasing within a session.
    pub id: u64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
