// Shared request gateway for the Odin API
//
// Owns the one HTTP client, the credential state (base URL + bearer token)
// and the global rate limiter. Endpoint collaborators (session, groups,
// users, ...) are inherent methods in `crate::endpoints` so this module
// stays focused on transport mechanics.

use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Level, debug, error, info};
use url::Url;

use crate::error::Error;
use crate::rate_limit::{RateLimitPolicy, RateLimiter};
use crate::sanitise::sanitise;
use crate::transport::TransportConfig;

static SHARED: OnceLock<Dispatcher> = OnceLock::new();

// ── Configuration ────────────────────────────────────────────────────

/// Everything needed to build a [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API root, e.g. `https://odin.example.com/api/v2`.
    pub base_url: Url,
    pub rate_limit: RateLimitPolicy,
    pub transport: TransportConfig,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            rate_limit: RateLimitPolicy::default(),
            transport: TransportConfig::default(),
        }
    }
}

/// The credential half of the dispatcher's state.
///
/// Replaced wholesale on every change, so a request always sees a
/// matching base URL and token.
#[derive(Debug, Clone)]
pub struct CredentialState {
    pub base_url: Url,
    pub token: Option<SecretString>,
}

// ── Dispatcher ───────────────────────────────────────────────────────

/// The single point through which every API call is made.
///
/// Cheaply cloneable via `Arc<DispatcherInner>`; every clone shares the
/// same credentials and rate-limit window, and reconfiguration through any
/// clone is observed by all of them. Build one per process with
/// [`Dispatcher::new`] and hand it out, or use [`Dispatcher::shared`] to
/// get the process-wide instance.
///
/// Retries are not done here; callers pick their own retry semantics.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    http: reqwest::Client,
    credentials: ArcSwap<CredentialState>,
    limiter: RateLimiter,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let credentials = self.inner.credentials.load();
        f.debug_struct("Dispatcher")
            .field("base_url", &credentials.base_url.as_str())
            .field("authorised", &credentials.token.is_some())
            .field("rate_limit", &self.inner.limiter.is_enabled())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a new dispatcher from config. No token is installed yet.
    pub fn new(config: &ApiConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        info!(
            base_url = %config.base_url,
            rate_limit = config.rate_limit.enabled,
            "dispatcher initialised"
        );
        Ok(Self {
            inner: Arc::new(DispatcherInner {
                http,
                credentials: ArcSwap::from_pointee(CredentialState {
                    base_url: config.base_url.clone(),
                    token: None,
                }),
                limiter: RateLimiter::new(config.rate_limit),
            }),
        })
    }

    /// The process-wide dispatcher.
    ///
    /// The first call builds it from `config`; later calls return the same
    /// instance and ignore their argument. Use the setters to reconfigure.
    pub fn shared(config: &ApiConfig) -> Result<Self, Error> {
        if let Some(existing) = SHARED.get() {
            return Ok(existing.clone());
        }
        let candidate = Self::new(config)?;
        Ok(SHARED.get_or_init(|| candidate).clone())
    }

    /// `true` if both handles point at the same underlying dispatcher.
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ── Credential state ─────────────────────────────────────────────

    /// Snapshot of the current credential state.
    pub fn credentials(&self) -> Arc<CredentialState> {
        self.inner.credentials.load_full()
    }

    pub fn base_url(&self) -> Url {
        self.inner.credentials.load().base_url.clone()
    }

    pub fn has_token(&self) -> bool {
        self.inner.credentials.load().token.is_some()
    }

    /// Point every subsequent call at a different API root.
    pub fn set_base_url(&self, base_url: Url) {
        let old = self.inner.credentials.rcu(|current| CredentialState {
            base_url: base_url.clone(),
            token: current.token.clone(),
        });
        info!(old = %old.base_url, new = %base_url, "dispatcher base_url updated");
    }

    /// Install a bearer token for every subsequent call.
    pub fn set_token(&self, token: SecretString) {
        self.inner.credentials.rcu(|current| CredentialState {
            base_url: current.base_url.clone(),
            token: Some(token.clone()),
        });
        info!("dispatcher session updated with new token");
    }

    pub fn rate_limit_enabled(&self) -> bool {
        self.inner.limiter.is_enabled()
    }

    pub fn set_rate_limit(&self, enabled: bool) {
        self.inner.limiter.set_enabled(enabled);
        info!(rate_limit = enabled, "dispatcher rate_limit updated");
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.inner.limiter
    }

    // ── Sending ──────────────────────────────────────────────────────

    /// Issue one request and return the decoded JSON body.
    ///
    /// Waits for the rate limiter first when limiting is enabled; the
    /// request is never dropped. Statuses in `200..300` yield the body
    /// (`Value::Null` when empty); anything else is
    /// [`Error::RemoteResponse`] carrying the status and raw text.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<Value, Error> {
        info!(method = %method, endpoint = path, "initiating API request");

        if self.inner.limiter.is_enabled() {
            debug!(method = %method, endpoint = path, "rate limit active, request may be delayed");
            self.inner.limiter.acquire().await;
        }

        let credentials = self.inner.credentials.load_full();
        let url = join_url(&credentials.base_url, path)?;

        if tracing::enabled!(Level::DEBUG) {
            let data = body.map_or(Value::Null, sanitise);
            debug!(
                method = %method,
                %url,
                params = ?query,
                %data,
                "sending request"
            );
        }

        let mut request = self.inner.http.request(method.clone(), url);
        if let Some(token) = &credentials.token {
            request = request.bearer_auth(token.expose_secret());
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        handle_response(&method, path, resp).await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let value = self.send(Method::GET, path, None, query).await?;
        decode(value)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let body = serde_json::to_value(body)?;
        let value = self.send(Method::POST, path, Some(&body), &[]).await?;
        decode(value)
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let body = serde_json::to_value(body)?;
        let value = self.send(Method::PUT, path, Some(&body), &[]).await?;
        decode(value)
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let value = self.send(Method::DELETE, path, None, query).await?;
        decode(value)
    }

    /// DELETE with a JSON body (some Odin resources take their key that way).
    pub async fn delete_with_body<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let body = serde_json::to_value(body)?;
        let value = self.send(Method::DELETE, path, Some(&body), &[]).await?;
        decode(value)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// `base_url + path`, tolerating a slash on either side of the seam.
fn join_url(base: &Url, path: &str) -> Result<Url, Error> {
    let full = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Ok(Url::parse(&full)?)
}

async fn handle_response(
    method: &Method,
    path: &str,
    resp: reqwest::Response,
) -> Result<Value, Error> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        error!(
            method = %method,
            endpoint = path,
            status_code = status.as_u16(),
            response_text = %text,
            "API error"
        );
        return Err(Error::RemoteResponse {
            status: status.as_u16(),
            body: text,
        });
    }

    info!(
        method = %method,
        endpoint = path,
        status_code = status.as_u16(),
        "API call success"
    );

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    let value: Value = serde_json::from_str(&text).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: text.clone(),
    })?;

    if tracing::enabled!(Level::DEBUG) {
        debug!(response_data = %sanitise(&value), "response body");
    }
    Ok(value)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(&value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}
