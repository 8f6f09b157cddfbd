// ── Core error types ──
//
// Transport and auth failures from `spear-api` pass through unchanged;
// this layer only adds the outcomes that belong to alias resolution.

use thiserror::Error;

use crate::resolver::EntityKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Any dispatcher or session failure, propagated as-is.
    #[error(transparent)]
    Api(#[from] spear_api::Error),

    /// The full search (structured entities, then users) found nothing.
    #[error("Alias '{alias}' not found in auto attendants, hunt groups, call centers or users")]
    AliasNotFound { alias: String },

    /// The caller abandoned the search.
    #[error("Alias search cancelled")]
    Cancelled,
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::AliasNotFound { .. } => true,
            Self::Api(e) => e.is_not_found(),
            Self::Cancelled => false,
        }
    }

    /// The underlying API error, if this is one.
    pub fn api_error(&self) -> Option<&spear_api::Error> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// A detail fetch for one entity failed during alias resolution.
///
/// Never returned from the search itself: it drives the retry queue and
/// ends up in the log once the entity is dropped.
#[derive(Debug, Error)]
#[error("failed to fetch {kind} {key}: {source}")]
pub struct TransientFetchFailure {
    pub kind: EntityKind,
    pub key: String,
    #[source]
    pub source: spear_api::Error,
}
