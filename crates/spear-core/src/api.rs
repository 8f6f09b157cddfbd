// ── Api facade ──
//
// Bundles a dispatcher handle, a session manager and the login
// credentials so callers can log in once and then reach every endpoint,
// the session operations and alias resolution from one value.

use std::fmt;

use secrecy::SecretString;
use spear_api::{Dispatcher, SessionInfo, SessionManager};
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

use crate::error::CoreError;
use crate::resolver::{AliasMatch, AliasResolver};

/// Changes applied by [`Api::update`]. `None` leaves a field alone.
#[derive(Debug, Default)]
pub struct ApiUpdate {
    pub base_url: Option<Url>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub rate_limit: Option<bool>,
}

/// An authenticated connection to the API.
pub struct Api {
    session: SessionManager,
    username: String,
    password: SecretString,
}

impl Api {
    /// Log in through `dispatcher` and return the connected facade.
    pub async fn connect(
        dispatcher: Dispatcher,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, CoreError> {
        let api = Self {
            session: SessionManager::new(dispatcher),
            username: username.into(),
            password,
        };
        api.authenticate().await?;
        Ok(api)
    }

    /// Log in again with the stored credentials.
    pub async fn authenticate(&self) -> Result<(), CoreError> {
        self.session
            .authenticate(&self.username, &self.password)
            .await?;
        Ok(())
    }

    /// Renew the bearer token. The old token stays in use on failure.
    pub async fn refresh_authorisation(&self) -> Result<(), CoreError> {
        self.session.refresh().await?;
        Ok(())
    }

    /// Details of the session the current token belongs to.
    pub async fn session_details(&self) -> Result<SessionInfo, CoreError> {
        Ok(self.session.current_session().await?)
    }

    /// Apply connection changes in place.
    ///
    /// A new base URL or rate-limit setting takes effect on the next call
    /// made through any clone of the dispatcher. New credentials are only
    /// stored; call [`Api::authenticate`] to log in with them.
    pub fn update(&mut self, update: ApiUpdate) {
        if let Some(base_url) = update.base_url {
            info!(%base_url, "updating base URL");
            self.session.dispatcher().set_base_url(base_url);
        }
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(password) = update.password {
            self.password = password;
        }
        if let Some(enabled) = update.rate_limit {
            self.session.dispatcher().set_rate_limit(enabled);
        }
    }

    pub fn is_authorised(&self) -> bool {
        self.session.is_authorised()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The dispatcher, for calling endpoints directly.
    pub fn dispatcher(&self) -> &Dispatcher {
        self.session.dispatcher()
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn resolver(&self) -> AliasResolver {
        AliasResolver::new(self.dispatcher().clone())
    }

    /// See [`AliasResolver::find_alias`].
    pub async fn find_alias(
        &self,
        service_provider_id: &str,
        group_id: &str,
        alias: &str,
        cancel: &CancellationToken,
    ) -> Result<AliasMatch, CoreError> {
        self.resolver()
            .find_alias(service_provider_id, group_id, alias, cancel)
            .await
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API - url: {}, username: {}, authorised: {}",
            self.dispatcher().base_url(),
            self.username,
            self.is_authorised()
        )
    }
}

impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("username", &self.username)
            .field("dispatcher", self.dispatcher())
            .finish_non_exhaustive()
    }
}
