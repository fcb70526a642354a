//! Application layer for hostdesk.
//!
//! This crate wires the domain types from `hostdesk-core` into the data-sync
//! layer the dashboard renders from: the resource cache, mutations with their
//! invalidation footprints, the session state machine and the notification
//! feed.

pub mod compose;
pub mod context;
pub mod mutation;
pub mod notice;
pub mod notification;
pub mod query;
pub mod session_service;

pub use compose::MessageComposer;
pub use context::{view_keys, AppContext};
pub use mutation::{Mutation, MutationKind, MutationRunner};
pub use notice::{Notice, NoticeLevel};
pub use notification::{
    NotificationCenter, NotificationPoller, NotificationSource, PollerHandle,
    SyntheticNotificationSource,
};
pub use query::{render_state, HostQueries, QueryCache, RenderState, SlotState, ViewSubscription};
pub use session_service::SessionService;
