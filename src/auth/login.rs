//! AppRole login exchange.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::OnceCell;
use url::Url;

use super::SessionToken;
use super::headers::{NAMESPACE_HEADER, namespace_value};
use crate::client::HttpClientConfig;
use crate::{Error, Result};

/// Mount path of the AppRole auth backend unless configured otherwise.
pub const DEFAULT_APPROLE_MOUNT: &str = "approle";

/// Inputs for one AppRole login.
#[derive(Debug)]
pub struct AppRoleLoginRequest<'a> {
    pub base_url: &'a Url,
    pub namespace: Option<&'a str>,
    pub role_id: &'a str,
    pub secret_id: &'a SecretString,
    /// Skip TLS certificate validation for this login.
    pub allow_unauthorized_certs: bool,
}

/// Exchanges a Role ID / Secret ID pair for a session token.
///
/// Implementations perform exactly one attempt per call; retries and
/// timeouts belong to the HTTP layer.
#[async_trait]
pub trait AppRoleLogin: Send + Sync + Debug {
    async fn login(&self, request: &AppRoleLoginRequest<'_>) -> Result<SessionToken>;
}

/// AppRole login against `POST {url}/v1/auth/{mount}/login`.
///
/// Logins for credentials that allow unauthorized certificates go through a
/// second client with certificate validation disabled. That client is built
/// from the environment on first use unless one is supplied.
#[derive(Debug, Clone)]
pub struct HttpAppRoleLogin {
    http: reqwest::Client,
    insecure: Arc<OnceCell<reqwest::Client>>,
    mount: String,
}

impl HttpAppRoleLogin {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            insecure: Arc::new(OnceCell::new()),
            mount: DEFAULT_APPROLE_MOUNT.to_string(),
        }
    }

    /// Client used when the credential allows unauthorized certificates.
    pub fn with_insecure_client(mut self, http: reqwest::Client) -> Self {
        self.insecure = Arc::new(OnceCell::new_with(Some(http)));
        self
    }

    /// Use a non-default auth mount (e.g. `ci-approle`).
    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into();
        self
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    fn login_url(&self, base_url: &Url) -> Result<Url> {
        let joined = format!(
            "{}/v1/auth/{}/login",
            base_url.as_str().trim_end_matches('/'),
            self.mount.trim_matches('/')
        );
        Url::parse(&joined).map_err(|e| Error::config("url", e.to_string()))
    }

    async fn client_for(&self, allow_unauthorized_certs: bool) -> Result<&reqwest::Client> {
        if !allow_unauthorized_certs {
            return Ok(&self.http);
        }
        self.insecure
            .get_or_try_init(|| async {
                HttpClientConfig::from_env()
                    .accept_invalid_certs(true)
                    .build()
                    .await
            })
            .await
    }
}

impl Default for HttpAppRoleLogin {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    auth: Option<LoginAuth>,
}

#[derive(Deserialize)]
struct LoginAuth {
    client_token: String,
    #[serde(default)]
    accessor: Option<String>,
    #[serde(default)]
    policies: Vec<String>,
    #[serde(default)]
    lease_duration: u64,
    #[serde(default)]
    renewable: bool,
}

#[async_trait]
impl AppRoleLogin for HttpAppRoleLogin {
    async fn login(&self, request: &AppRoleLoginRequest<'_>) -> Result<SessionToken> {
        let url = self.login_url(request.base_url)?;
        tracing::debug!(url = %url, mount = %self.mount, "Exchanging AppRole credentials");

        let body = serde_json::json!({
            "role_id": request.role_id,
            "secret_id": request.secret_id.expose_secret(),
        });

        let http = self.client_for(request.allow_unauthorized_certs).await?;
        let mut req = http.post(url).json(&body);
        if let Some(ns) = request.namespace.filter(|ns| !ns.is_empty()) {
            req = req.header(NAMESPACE_HEADER, namespace_value(ns)?);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "AppRole login rejected");
            return Err(Error::rejected(status.as_u16(), text));
        }

        let body = response.bytes().await?;
        let parsed: LoginResponse = serde_json::from_slice(&body)?;
        let auth = parsed
            .auth
            .ok_or_else(|| Error::Parse("AppRole login response has no auth block".into()))?;

        if auth.client_token.is_empty() {
            return Err(Error::Parse(
                "AppRole login response has an empty client_token".into(),
            ));
        }

        tracing::debug!(
            lease_duration = auth.lease_duration,
            renewable = auth.renewable,
            "AppRole login succeeded"
        );

        let mut token = SessionToken::new(auth.client_token, auth.lease_duration);
        token.accessor = auth.accessor;
        token.policies = auth.policies;
        token.renewable = auth.renewable;
        Ok(token)
    }
}
