//! Resource cache and query layer.
//!
//! This module contains the keyed cache with its pending/ready/failed slot
//! states, the render policy for views that depend on several resources, and
//! typed queries for each host resource.

mod cache;
mod host_queries;
mod view;

pub use cache::{fetcher, Fetcher, QueryCache, SlotState};
pub use host_queries::HostQueries;
pub use view::{render_state, RenderState, ViewSubscription};
