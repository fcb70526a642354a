pub mod authenticator;
pub mod config_service;
pub mod http_client;
pub mod paths;
pub mod token_storage;

pub use crate::authenticator::ApiAuthenticator;
pub use crate::config_service::ConfigService;
pub use crate::http_client::ReqwestApiClient;
pub use crate::token_storage::FileTokenStore;
