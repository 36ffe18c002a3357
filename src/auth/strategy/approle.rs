//! AppRole authentication strategy.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use url::Url;

use super::AuthStrategy;
use crate::Result;
use crate::auth::{AppRoleLogin, AppRoleLoginRequest};

/// AppRole authentication strategy.
///
/// Every call to [`AuthStrategy::vault_token`] performs a fresh login; the
/// session token is never cached here.
#[derive(Clone)]
pub struct AppRoleStrategy {
    login: Arc<dyn AppRoleLogin>,
    base_url: Url,
    namespace: Option<String>,
    role_id: String,
    secret_id: SecretString,
    allow_unauthorized_certs: bool,
}

impl AppRoleStrategy {
    pub fn new(
        login: Arc<dyn AppRoleLogin>,
        base_url: Url,
        role_id: impl Into<String>,
        secret_id: SecretString,
    ) -> Self {
        Self {
            login,
            base_url,
            namespace: None,
            role_id: role_id.into(),
            secret_id,
            allow_unauthorized_certs: false,
        }
    }

    /// Send the login inside a namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into()).filter(|ns| !ns.is_empty());
        self
    }

    /// Skip TLS certificate validation during the login.
    pub fn allow_unauthorized_certs(mut self, allow: bool) -> Self {
        self.allow_unauthorized_certs = allow;
        self
    }

    pub fn role_id(&self) -> &str {
        &self.role_id
    }
}

impl fmt::Debug for AppRoleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRoleStrategy")
            .field("base_url", &self.base_url.as_str())
            .field("namespace", &self.namespace)
            .field("role_id", &self.role_id)
            .field("secret_id", &"[redacted]")
            .field("allow_unauthorized_certs", &self.allow_unauthorized_certs)
            .field("login", &self.login)
            .finish()
    }
}

#[async_trait]
impl AuthStrategy for AppRoleStrategy {
    async fn vault_token(&self) -> Result<SecretString> {
        let request = AppRoleLoginRequest {
            base_url: &self.base_url,
            namespace: self.namespace.as_deref(),
            role_id: &self.role_id,
            secret_id: &self.secret_id,
            allow_unauthorized_certs: self.allow_unauthorized_certs,
        };
        let session = self.login.login(&request).await?;
        Ok(session.into_client_token())
    }

    fn name(&self) -> &'static str {
        "app_role"
    }
}
