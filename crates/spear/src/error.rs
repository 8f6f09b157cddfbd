//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use spear_config::ConfigError;
use spear_core::{ApiError, CoreError};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the API at {url}")]
    #[diagnostic(
        code(spear::connection_failed),
        help(
            "Check that the API is reachable and the base URL is right.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: ApiError,
    },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(spear::tls_error),
        help("Use --insecure (-k) to skip verification, or set ca_cert in your profile.")
    )]
    TlsError { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(spear::timeout),
        help("Increase the timeout with --timeout or check API responsiveness.")
    )]
    Timeout {
        #[source]
        source: ApiError,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for profile '{profile}'")]
    #[diagnostic(
        code(spear::auth_failed),
        help(
            "Verify the username and password.\n\
             Run: spear config set-password --profile {profile}"
        )
    )]
    AuthFailed {
        profile: String,
        #[source]
        source: ApiError,
    },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(spear::no_credentials),
        help(
            "Configure credentials with: spear config init\n\
             Or set SPEAR_USERNAME and SPEAR_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    #[error("Session expired or missing")]
    #[diagnostic(code(spear::session), help("Run the command again to log in afresh."))]
    SessionExpired,

    // ── Lookup ───────────────────────────────────────────────────────
    #[error("Alias '{alias}' not found")]
    #[diagnostic(
        code(spear::alias_not_found),
        help(
            "Searched auto attendants, hunt groups, call centers and users.\n\
             Aliases are matched on the part before '@' and are case-sensitive."
        )
    )]
    AliasNotFound { alias: String },

    #[error("{resource} not found")]
    #[diagnostic(code(spear::not_found))]
    NotFound {
        resource: String,
        #[source]
        source: ApiError,
    },

    #[error("Interrupted")]
    #[diagnostic(code(spear::interrupted))]
    Interrupted,

    // ── API ──────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(spear::api_error))]
    Api(ApiError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(spear::validation))]
    Validation { field: String, reason: String },

    #[error("Missing {what}")]
    #[diagnostic(
        code(spear::missing_argument),
        help("Pass --{flag}, or set {profile_key} in your profile.")
    )]
    MissingArgument {
        what: String,
        flag: String,
        profile_key: String,
    },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(spear::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(spear::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: spear config init, or pass --base-url"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(spear::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(spear::json), help("Check the JSON and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::SessionExpired => {
                exit_code::AUTH
            }
            Self::AliasNotFound { .. } | Self::NotFound { .. } | Self::ProfileNotFound { .. } => {
                exit_code::NOT_FOUND
            }
            Self::Validation { .. }
            | Self::MissingArgument { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Interrupted => exit_code::INTERRUPTED,
            _ => exit_code::GENERAL,
        }
    }

    /// Classify an API error for the given profile.
    pub fn from_api(err: ApiError, profile: &str) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } => Self::AuthFailed {
                profile: profile.into(),
                source: err,
            },
            ref e if e.is_auth_expired() => Self::SessionExpired,
            ApiError::Tls(reason) => Self::TlsError { reason },
            ApiError::Transport(ref e) if e.is_timeout() => Self::Timeout { source: err },
            ApiError::Transport(ref e) if e.is_connect() => Self::ConnectionFailed {
                url: e.url().map(ToString::to_string).unwrap_or_default(),
                source: err,
            },
            ApiError::RemoteResponse { status: 404, .. } => Self::NotFound {
                resource: "Resource".into(),
                source: err,
            },
            other => Self::Api(other),
        }
    }

    /// Classify a core error for the given profile.
    pub fn from_core(err: CoreError, profile: &str) -> Self {
        match err {
            CoreError::Api(api) => Self::from_api(api, profile),
            CoreError::AliasNotFound { alias } => Self::AliasNotFound { alias },
            CoreError::Cancelled => Self::Interrupted,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

/// Comma-separated profile names for help text.
pub fn available_profiles(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::UnknownProfile { name, available } => Self::ProfileNotFound {
                name,
                available: available_profiles(&available),
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::from_core(err, "current")
    }
}
