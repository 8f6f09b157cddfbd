// spear-core: alias resolution and a session-aware facade over spear-api.
//
// `AliasResolver` owns the concurrent fetch / retry / match pipeline;
// `Api` couples it with login and token renewal.

pub mod alias;
pub mod api;
pub mod error;
pub mod resolver;

pub use api::{Api, ApiUpdate};
pub use error::{CoreError, TransientFetchFailure};
pub use resolver::{
    AliasMatch, AliasResolver, EntityKind, MAX_RETRIES, PendingOperation, ResolvedEntity,
};

// Re-export the API layer so downstream crates need only one dependency.
pub use spear_api::{
    ApiConfig, Dispatcher, Error as ApiError, Group, GroupCreate, RateLimitPolicy, SessionInfo,
    TlsMode, TransportConfig,
};
