// Wire types for the Odin API endpoints the workspace consumes.
//
// Only the fields the resolver and CLI read are modelled; everything else
// the API returns is kept in a flattened `extra` map where it matters.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Session ──────────────────────────────────────────────────────────

/// Body returned by the token endpoints. Only `token` is needed.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawSessionToken")]
pub struct SessionToken {
    pub token: SecretString,
}

#[derive(Deserialize)]
struct RawSessionToken {
    token: String,
}

impl From<RawSessionToken> for SessionToken {
    fn from(raw: RawSessionToken) -> Self {
        Self {
            token: SecretString::from(raw.token),
        }
    }
}

/// Details of the currently established session.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub login_type: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Service instances (auto attendants, hunt groups, call centers) ───

/// Lightweight listing record for a group service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstanceSummary {
    pub service_user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
}

/// Detail record for a single service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstanceDetail {
    pub service_instance_profile: ServiceInstanceProfile,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstanceProfile {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub calling_line_id_last_name: Option<String>,
    #[serde(default)]
    pub calling_line_id_first_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
}

// ── Users ────────────────────────────────────────────────────────────

/// One row of the (extended) group user listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

// ── Groups ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub group_id: String,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub user_limit: Option<u32>,
    #[serde(default)]
    pub user_count: Option<u32>,
    #[serde(default)]
    pub default_domain: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Request body for creating a group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCreate {
    pub service_provider_id: String,
    pub group_id: String,
    pub group_name: String,
    pub user_limit: u32,
    pub default_domain: String,
}
