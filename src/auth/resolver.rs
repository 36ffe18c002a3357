//! Strategy selection and request decoration.

use std::sync::Arc;

use super::headers::namespace_value;
use super::{
    AppRoleLogin, AppRoleStrategy, AuthHeaders, AuthStrategy, CredentialConfig, Credentials,
    HttpAppRoleLogin, TokenStrategy,
};
use crate::Result;
use crate::client::ValidationRequest;

/// Turns a [`CredentialConfig`] into request decorations.
///
/// Stateless: each call selects a strategy from the configured method,
/// produces fresh headers and keeps nothing. Cheap to clone and safe to
/// share across tasks.
#[derive(Clone, Debug)]
pub struct AuthResolver {
    login: Arc<dyn AppRoleLogin>,
}

impl AuthResolver {
    /// Create with a custom AppRole exchange.
    pub fn new(login: impl AppRoleLogin + 'static) -> Self {
        Self {
            login: Arc::new(login),
        }
    }

    /// Create with the standard HTTP AppRole exchange over `http`.
    pub fn with_http(http: reqwest::Client) -> Self {
        Self::new(HttpAppRoleLogin::new(http))
    }

    /// Select the strategy for the configured method.
    ///
    /// Validates the active field group and the namespace without touching
    /// the network.
    pub fn strategy(&self, config: &CredentialConfig) -> Result<Box<dyn AuthStrategy>> {
        if let Some(ns) = config.namespace() {
            namespace_value(ns)?;
        }

        match config.credentials()? {
            Credentials::Token { token } => Ok(Box::new(TokenStrategy::new(token))),
            Credentials::AppRole { role_id, secret_id } => {
                let base_url = config.base_url()?;
                let strategy =
                    AppRoleStrategy::new(Arc::clone(&self.login), base_url, role_id, secret_id)
                        .with_namespace(config.namespace.clone())
                        .allow_unauthorized_certs(config.allow_unauthorized_certs);
                Ok(Box::new(strategy))
            }
        }
    }

    /// Produce the headers for one outbound request.
    pub async fn resolve_headers(&self, config: &CredentialConfig) -> Result<AuthHeaders> {
        let strategy = self.strategy(config)?;
        let token = strategy.vault_token().await?;
        let headers = AuthHeaders::new(&token, config.namespace())?;

        tracing::debug!(
            strategy = strategy.name(),
            namespace = config.namespace().unwrap_or(""),
            "Resolved Vault auth headers"
        );
        Ok(headers)
    }

    /// Build the identity-lookup probe for `config`.
    pub async fn build_validation_request(
        &self,
        config: &CredentialConfig,
    ) -> Result<ValidationRequest> {
        let url = config.endpoint(ValidationRequest::PATH)?;
        let headers = self.resolve_headers(config).await?;
        Ok(ValidationRequest::new(url, headers))
    }

    /// Build and send the identity-lookup probe.
    pub async fn verify(&self, http: &reqwest::Client, config: &CredentialConfig) -> Result<()> {
        self.build_validation_request(config).await?.send(http).await
    }
}

impl Default for AuthResolver {
    fn default() -> Self {
        Self::new(HttpAppRoleLogin::default())
    }
}
