pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod resource;
pub mod session;

// Re-export common types
pub use api::{ApiClient, ApiRequest, HttpMethod, TokenProvider};
pub use config::HostdeskConfig;
pub use error::{HostdeskError, Result};
pub use resource::ResourceKey;
