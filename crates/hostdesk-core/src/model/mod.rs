//! Domain models mirrored from the remote host API.
//!
//! # Module Structure
//!
//! - `profile`: the host's self-description and field-level edits
//! - `traveler`: candidate travelers and list filters
//! - `message`: outgoing messages and reusable templates
//! - `review`: server-owned reviews
//! - `notification`: process-local notification events

use serde::Deserialize;

mod message;
mod notification;
mod profile;
mod review;
mod traveler;

pub use message::{MessageTemplate, NewTemplate, OutgoingMessage};
pub use notification::Notification;
pub use profile::{HostProfile, ProfilePatch};
pub use review::{Review, ReviewSummary};
pub use traveler::{Traveler, TravelerFilters};

/// The API is inconsistent about numeric vs string ids.
pub(crate) fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

