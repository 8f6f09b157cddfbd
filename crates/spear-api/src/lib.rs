// spear-api: Async Rust client for the Odin telephony-management API

pub mod dispatcher;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod sanitise;
pub mod session;
pub mod transport;

pub use dispatcher::{ApiConfig, CredentialState, Dispatcher};
pub use error::Error;
pub use models::{
    Group, GroupCreate, ServiceInstanceDetail, ServiceInstanceProfile, ServiceInstanceSummary,
    SessionInfo, SessionToken, UserSummary,
};
pub use rate_limit::{RateLimitPolicy, RateLimiter, RateWindow};
pub use session::SessionManager;
pub use transport::{TlsMode, TransportConfig};
