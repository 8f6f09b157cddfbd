// Session endpoints
//
// `POST /auth/token` logs in, `PUT /auth/token` renews the current token,
// `GET /auth/session` describes the session behind the installed token.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::models::{SessionInfo, SessionToken};

impl Dispatcher {
    /// Log in with username and password.
    ///
    /// `POST /auth/token`
    pub async fn post_session(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SessionToken, Error> {
        debug!(username, "requesting session token");
        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });
        self.post("/auth/token", &body).await
    }

    /// Exchange the installed token for a fresh one.
    ///
    /// `PUT /auth/token`
    pub async fn put_session(&self) -> Result<SessionToken, Error> {
        self.put("/auth/token", &json!({})).await
    }

    /// Details of the session the installed token belongs to.
    ///
    /// `GET /auth/session`
    pub async fn get_session(&self) -> Result<SessionInfo, Error> {
        self.get("/auth/session", &[]).await
    }
}
