// Session management: login, token renewal and session lookup.
//
// A successful login or refresh installs the new bearer token into the
// dispatcher. A failed refresh installs nothing, so the previous token
// keeps working until the API expires it.

use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::models::{SessionInfo, SessionToken};

/// Obtains and refreshes the dispatcher's bearer token.
#[derive(Debug)]
pub struct SessionManager {
    dispatcher: Dispatcher,
    authorised: AtomicBool,
}

impl SessionManager {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            authorised: AtomicBool::new(false),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// `true` once a login has succeeded.
    pub fn is_authorised(&self) -> bool {
        self.authorised.load(Ordering::Acquire)
    }

    /// Log in and install the resulting token.
    ///
    /// Any failure (network, non-2xx, malformed body) is reported as
    /// [`Error::AuthenticationFailed`].
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SessionToken, Error> {
        debug!(username, "authenticating");
        let session = self
            .dispatcher
            .post_session(username, password)
            .await
            .map_err(|e| {
                warn!(username, error = %e, "authentication failed");
                Error::AuthenticationFailed {
                    message: e.to_string(),
                }
            })?;

        self.install(&session);
        info!(username, "authenticated");
        Ok(session)
    }

    /// Renew the token ahead of expiry.
    ///
    /// On failure the old token stays installed and
    /// [`Error::SessionRefreshFailed`] is returned.
    pub async fn refresh(&self) -> Result<SessionToken, Error> {
        let session = self.dispatcher.put_session().await.map_err(|e| {
            warn!(error = %e, "session refresh failed, keeping previous token");
            Error::SessionRefreshFailed {
                message: e.to_string(),
            }
        })?;

        self.install(&session);
        info!("session refreshed");
        Ok(session)
    }

    /// Details of the current session, or [`Error::SessionNotFound`].
    pub async fn current_session(&self) -> Result<SessionInfo, Error> {
        if !self.is_authorised() || !self.dispatcher.has_token() {
            return Err(Error::SessionNotFound);
        }
        self.dispatcher.get_session().await.map_err(|e| {
            debug!(error = %e, "session lookup failed");
            Error::SessionNotFound
        })
    }

    fn install(&self, session: &SessionToken) {
        self.dispatcher.set_token(session.token.clone());
        self.authorised.store(true, Ordering::Release);
    }
}
