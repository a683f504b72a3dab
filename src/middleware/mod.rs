pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::{hash_api_secret, verify_api_secret, ApiKeyAuth, ApiKeyRecord, OwnerId};
pub use rate_limit::RateLimiter;
pub use request_id::RequestId;
