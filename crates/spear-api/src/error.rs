use thiserror::Error;

/// Top-level error type for the `spear-api` crate.
///
/// Covers every failure mode of the dispatcher and the session layer.
/// `spear-core` wraps these without masking them.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Initial login did not succeed (network, non-2xx, or malformed body).
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Token renewal failed. The previously installed token is still in use.
    #[error("Session refresh failed: {message}")]
    SessionRefreshFailed { message: String },

    /// No active session when one was queried.
    #[error("No active session found -- authenticate first or re-authenticate")]
    SessionNotFound,

    // ── Remote ──────────────────────────────────────────────────────
    /// The API answered with a status outside `200..300`.
    #[error("Remote API error (HTTP {status}): {body}")]
    RemoteResponse { status: u16, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request body could not be serialized to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// The HTTP status carried by a remote error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteResponse { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response text of a remote error, if any.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::RemoteResponse { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionNotFound) || self.status() == Some(401)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_exposes_status_and_body() {
        let err = Error::RemoteResponse {
            status: 404,
            body: r#"{"error":"group not found"}"#.into(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.response_body(), Some(r#"{"error":"group not found"}"#));
        assert!(err.is_not_found());
        assert!(!err.is_auth_expired());
    }

    #[test]
    fn unauthorized_counts_as_expired_auth() {
        let err = Error::RemoteResponse {
            status: 401,
            body: String::new(),
        };
        assert!(err.is_auth_expired());
        assert!(Error::SessionNotFound.is_auth_expired());
        assert!(!Error::Tls("x".into()).is_auth_expired());
    }
}
