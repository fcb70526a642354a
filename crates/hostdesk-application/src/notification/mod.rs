//! Process-local notification feed and its polling timer.

mod center;
mod poller;
mod source;

pub use center::NotificationCenter;
pub use poller::{NotificationPoller, PollerHandle};
pub use source::{NotificationSource, SyntheticNotificationSource};
