//! CLI configuration: thin wrapper around `spear_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--base-url, --username, --timeout, ...).

use std::io::IsTerminal;

use secrecy::SecretString;
use tracing::debug;

use spear_config::ConfigError;
use spear_core::ApiConfig;

use crate::cli::{GlobalOpts, GroupScope};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use spear_config::{
    Config, Defaults, Profile, config_path, load_config, load_config_or_default, save_config,
};

/// Everything needed to log in and run a command.
#[derive(Debug)]
pub struct Connection {
    pub profile_name: String,
    pub api: ApiConfig,
    pub username: String,
    pub password: SecretString,
    pub service_provider_id: Option<String>,
    pub group_id: Option<String>,
}

impl Connection {
    /// Service provider and group from flags, else the profile.
    pub fn group_scope(&self, scope: &GroupScope) -> Result<(String, String), CliError> {
        let service_provider = self.service_provider(scope.service_provider.as_deref())?;
        let group = scope
            .group
            .clone()
            .or_else(|| self.group_id.clone())
            .ok_or_else(|| CliError::MissingArgument {
                what: "group ID".into(),
                flag: "group".into(),
                profile_key: "group_id".into(),
            })?;
        Ok((service_provider, group))
    }

    pub fn service_provider(&self, flag: Option<&str>) -> Result<String, CliError> {
        flag.map(str::to_owned)
            .or_else(|| self.service_provider_id.clone())
            .ok_or_else(|| CliError::MissingArgument {
                what: "service provider ID".into(),
                flag: "service-provider".into(),
                profile_key: "service_provider_id".into(),
            })
    }
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `Connection` from the config file, profile, and CLI overrides.
///
/// Without a matching profile, `--base-url` plus username and password
/// from flags or the environment are enough.
pub fn resolve_connection(global: &GlobalOpts) -> Result<Connection, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.base_url.is_some() => Profile::default(),
        None => {
            let available: Vec<_> = cfg.profiles.keys().cloned().collect();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: crate::error::available_profiles(&available),
            });
        }
    };

    resolve_profile(profile, &profile_name, &cfg.defaults, global)
}

/// Apply flag overrides to `profile` and resolve credentials.
///
/// Flags beat the profile, the profile beats `[defaults]`.
pub fn resolve_profile(
    mut profile: Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<Connection, CliError> {
    if let Some(ref url) = global.base_url {
        profile.base_url.clone_from(url);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if global.no_rate_limit {
        profile.rate_limit = Some(false);
    }

    let api = spear_config::profile_to_api_config(&profile, defaults)?;
    let username = spear_config::resolve_username(&profile, profile_name)?;
    let password = match spear_config::resolve_password(&profile, profile_name) {
        Ok(password) => password,
        Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
            debug!(profile = profile_name, "no stored password, prompting");
            let entered = rpassword::prompt_password(format!("Password for {username}: "))?;
            SecretString::from(entered)
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Connection {
        profile_name: profile_name.to_owned(),
        api,
        username,
        password,
        service_provider_id: profile.service_provider_id,
        group_id: profile.group_id,
    })
}
