//! Stored credential configuration for a Vault identity.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use super::Credentials;
use super::env::{env_opt, lookup_with_fallbacks, parse_bool};
use crate::{Error, Result};

/// Authentication method tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthMethod {
    /// Role ID + Secret ID exchanged for a session token.
    #[default]
    AppRole,
    /// Static Vault token.
    Token,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::AppRole => "appRole",
            AuthMethod::Token => "token",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            m if m.eq_ignore_ascii_case("approle") => Ok(AuthMethod::AppRole),
            m if m.eq_ignore_ascii_case("token") => Ok(AuthMethod::Token),
            other => Err(Error::config(
                "authMethod",
                format!("unsupported value '{}', expected 'appRole' or 'token'", other),
            )),
        }
    }
}

/// KV secrets engine version.
///
/// Only selects the shape of downstream secret paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KvVersion {
    V1,
    #[default]
    V2,
}

impl KvVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            KvVersion::V1 => "v1",
            KvVersion::V2 => "v2",
        }
    }

    /// API path of a secret under a KV mount, relative to the Vault address.
    pub fn secret_path(&self, mount: &str, key: &str) -> String {
        let mount = mount.trim_matches('/');
        let key = key.trim_start_matches('/');
        match self {
            KvVersion::V1 => format!("v1/{}/{}", mount, key),
            KvVersion::V2 => format!("v1/{}/data/{}", mount, key),
        }
    }
}

impl fmt::Display for KvVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KvVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "v1" | "V1" | "1" => Ok(KvVersion::V1),
            "v2" | "V2" | "2" => Ok(KvVersion::V2),
            other => Err(Error::config(
                "apiVersion",
                format!("unsupported value '{}', expected 'v1' or 'v2'", other),
            )),
        }
    }
}

/// One configured identity for a Vault server.
///
/// Mirrors the stored credential form. Fields belonging to the inactive
/// method are ignored and never validated at rest; [`CredentialConfig::credentials`]
/// checks the active group at use time.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialConfig {
    /// Vault server address (e.g. `https://vault.example.com:8200`).
    #[serde(default, alias = "baseUrl")]
    pub url: String,
    #[serde(default)]
    pub auth_method: AuthMethod,
    #[serde(default)]
    pub role_id: String,
    #[serde(default)]
    pub secret_id: Option<SecretString>,
    #[serde(default)]
    pub token: Option<SecretString>,
    /// Enterprise namespace; empty means none.
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub api_version: KvVersion,
    /// Skip TLS certificate validation for calls made with this credential.
    #[serde(default)]
    pub allow_unauthorized_certs: bool,
}

impl fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("url", &self.url)
            .field("auth_method", &self.auth_method)
            .field("role_id", &self.role_id)
            .field("has_secret_id", &self.secret_id.is_some())
            .field("has_token", &self.token.is_some())
            .field("namespace", &self.namespace)
            .field("api_version", &self.api_version)
            .field("allow_unauthorized_certs", &self.allow_unauthorized_certs)
            .finish()
    }
}

impl CredentialConfig {
    /// Token-authenticated configuration.
    pub fn token(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_method: AuthMethod::Token,
            token: Some(SecretString::from(token.into())),
            ..Default::default()
        }
    }

    /// AppRole-authenticated configuration.
    pub fn app_role(
        url: impl Into<String>,
        role_id: impl Into<String>,
        secret_id: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            auth_method: AuthMethod::AppRole,
            role_id: role_id.into(),
            secret_id: Some(SecretString::from(secret_id.into())),
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_api_version(mut self, version: KvVersion) -> Self {
        self.api_version = version;
        self
    }

    pub fn allow_unauthorized_certs(mut self, allow: bool) -> Self {
        self.allow_unauthorized_certs = allow;
        self
    }

    /// Parse the stored JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config("credential", e.to_string()))
    }

    /// Load the stored JSON form from a file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&content)
    }

    /// Create from the standard `VAULT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(env_opt)
    }

    /// Create from `VAULT_*` keys resolved through `lookup`.
    ///
    /// Without `VAULT_AUTH_METHOD` the method is `token` when `VAULT_TOKEN`
    /// is present and `appRole` otherwise.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup_with_fallbacks(&lookup, &["VAULT_ADDR", "VAULT_URL"])
            .ok_or_else(|| Error::missing("url"))?;
        let token = lookup("VAULT_TOKEN");

        let auth_method = match lookup("VAULT_AUTH_METHOD") {
            Some(method) => method.parse::<AuthMethod>()?,
            None if token.is_some() => AuthMethod::Token,
            None => AuthMethod::AppRole,
        };

        let api_version = lookup("VAULT_KV_VERSION")
            .map(|v| v.parse::<KvVersion>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            url,
            auth_method,
            role_id: lookup("VAULT_ROLE_ID").unwrap_or_default(),
            secret_id: lookup("VAULT_SECRET_ID").map(SecretString::from),
            token: token.map(SecretString::from),
            namespace: lookup("VAULT_NAMESPACE").unwrap_or_default(),
            api_version,
            allow_unauthorized_certs: lookup("VAULT_SKIP_VERIFY").is_some_and(|v| parse_bool(&v)),
        })
    }

    /// The namespace, if one is configured.
    pub fn namespace(&self) -> Option<&str> {
        Some(self.namespace.as_str()).filter(|ns| !ns.is_empty())
    }

    /// Validate and parse the configured address.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.url.trim();
        if raw.is_empty() {
            return Err(Error::missing("url"));
        }

        let url = Url::parse(raw)
            .map_err(|e| Error::config("url", format!("'{}' is not an absolute URL: {}", raw, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(
                "url",
                format!("unsupported scheme '{}', expected http or https", url.scheme()),
            ));
        }

        // API paths are appended to the address, so it must end at the path.
        if url.query().is_some() || url.fragment().is_some() {
            return Err(Error::config(
                "url",
                format!("'{}' must not carry a query string or fragment", raw),
            ));
        }

        Ok(url)
    }

    /// Append an API path to the configured address, keeping any path prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url()?;
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| Error::config("url", e.to_string()))
    }

    /// Extract the credential group for the active method.
    pub fn credentials(&self) -> Result<Credentials> {
        match self.auth_method {
            AuthMethod::AppRole => {
                if self.role_id.trim().is_empty() {
                    return Err(Error::missing("roleId"));
                }
                let secret_id =
                    non_empty_secret(&self.secret_id).ok_or_else(|| Error::missing("secretId"))?;
                Ok(Credentials::AppRole {
                    role_id: self.role_id.clone(),
                    secret_id,
                })
            }
            AuthMethod::Token => {
                let token = non_empty_secret(&self.token).ok_or_else(|| Error::missing("token"))?;
                Ok(Credentials::Token { token })
            }
        }
    }
}

fn non_empty_secret(secret: &Option<SecretString>) -> Option<SecretString> {
    secret
        .as_ref()
        .filter(|s| !s.expose_secret().trim().is_empty())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config = CredentialConfig::from_json(r#"{"url": "https://vault:8200"}"#).unwrap();
        assert_eq!(config.auth_method, AuthMethod::AppRole);
        assert_eq!(config.api_version, KvVersion::V2);
        assert!(!config.allow_unauthorized_certs);
        assert!(config.namespace().is_none());
    }

    #[test]
    fn test_parse_stored_form() {
        let json = r#"{
            "url": "https://vault.example.com:8200",
            "authMethod": "token",
            "token": "hvs.ABC",
            "namespace": "team-a",
            "apiVersion": "v1",
            "allowUnauthorizedCerts": true
        }"#;

        let config = CredentialConfig::from_json(json).unwrap();
        assert_eq!(config.auth_method, AuthMethod::Token);
        assert_eq!(config.namespace(), Some("team-a"));
        assert_eq!(config.api_version, KvVersion::V1);
        assert!(config.allow_unauthorized_certs);
    }

    #[test]
    fn test_base_url_alias() {
        let config =
            CredentialConfig::from_json(r#"{"baseUrl": "https://vault:8200"}"#).unwrap();
        assert_eq!(config.url, "https://vault:8200");
    }

    #[test]
    fn test_unsupported_auth_method() {
        let err = CredentialConfig::from_json(r#"{"url": "x", "authMethod": "kubernetes"}"#)
            .unwrap_err();
        assert!(err.is_configuration_error());

        assert!("ldap".parse::<AuthMethod>().is_err());
        assert_eq!("approle".parse::<AuthMethod>().unwrap(), AuthMethod::AppRole);
    }

    #[test]
    fn test_unsupported_api_version() {
        let err = CredentialConfig::from_json(r#"{"url": "x", "apiVersion": "v3"}"#).unwrap_err();
        assert!(err.is_configuration_error());
        assert!("v3".parse::<KvVersion>().is_err());
    }

    #[test]
    fn test_inactive_group_is_ignored() {
        let config = CredentialConfig {
            token: Some(SecretString::from("hvs.unused")),
            ..CredentialConfig::app_role("https://vault:8200", "role", "secret")
        };
        assert!(matches!(
            config.credentials().unwrap(),
            Credentials::AppRole { .. }
        ));

        let config = CredentialConfig {
            role_id: String::new(),
            ..CredentialConfig::token("https://vault:8200", "hvs.ABC")
        };
        assert!(matches!(config.credentials().unwrap(), Credentials::Token { .. }));
    }

    #[test]
    fn test_missing_approle_fields() {
        let config = CredentialConfig::app_role("https://vault:8200", "", "x");
        match config.credentials().unwrap_err() {
            Error::Configuration { field, .. } => assert_eq!(field, "roleId"),
            other => panic!("unexpected error: {other:?}"),
        }

        let config = CredentialConfig::app_role("https://vault:8200", "role", "");
        match config.credentials().unwrap_err() {
            Error::Configuration { field, .. } => assert_eq!(field, "secretId"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_token() {
        let config = CredentialConfig {
            auth_method: AuthMethod::Token,
            url: "https://vault:8200".into(),
            ..Default::default()
        };
        assert!(config.credentials().unwrap_err().is_configuration_error());
    }

    #[test]
    fn test_base_url_validation() {
        let empty = CredentialConfig::token("", "t");
        assert!(empty.base_url().unwrap_err().is_configuration_error());

        let relative = CredentialConfig::token("vault.example.com", "t");
        assert!(relative.base_url().is_err());

        let ftp = CredentialConfig::token("ftp://vault.example.com", "t");
        assert!(ftp.base_url().is_err());
    }

    #[test]
    fn test_base_url_rejects_query_and_fragment() {
        let query = CredentialConfig::token("https://vault.example.com:8200/?x=1", "t");
        assert!(query.base_url().unwrap_err().is_configuration_error());
        assert!(
            query
                .endpoint("/v1/auth/token/lookup-self")
                .unwrap_err()
                .is_configuration_error()
        );

        let fragment = CredentialConfig::token("https://vault.example.com:8200/#top", "t");
        assert!(fragment.base_url().unwrap_err().is_configuration_error());

        let prefixed = CredentialConfig::token("https://proxy.internal/vault?env=prod", "t");
        assert!(prefixed.base_url().is_err());
    }

    #[test]
    fn test_endpoint_keeps_prefix() {
        let config = CredentialConfig::token("https://proxy.internal/vault/", "t");
        let url = config.endpoint("/v1/auth/token/lookup-self").unwrap();
        assert_eq!(
            url.as_str(),
            "https://proxy.internal/vault/v1/auth/token/lookup-self"
        );
    }

    #[test]
    fn test_secret_path_shape() {
        assert_eq!(KvVersion::V1.secret_path("secret", "app/db"), "v1/secret/app/db");
        assert_eq!(
            KvVersion::V2.secret_path("/secret/", "/app/db"),
            "v1/secret/data/app/db"
        );
    }

    #[test]
    fn test_from_env_with_token() {
        let vars: HashMap<&str, &str> = [
            ("VAULT_ADDR", "https://vault:8200"),
            ("VAULT_TOKEN", "hvs.ENV"),
            ("VAULT_NAMESPACE", "ops"),
            ("VAULT_SKIP_VERIFY", "true"),
        ]
        .into_iter()
        .collect();

        let config =
            CredentialConfig::from_env_with(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.auth_method, AuthMethod::Token);
        assert_eq!(config.namespace(), Some("ops"));
        assert!(config.allow_unauthorized_certs);
        assert!(matches!(config.credentials().unwrap(), Credentials::Token { .. }));
    }

    #[test]
    fn test_from_env_with_approle() {
        let vars: HashMap<&str, &str> = [
            ("VAULT_URL", "https://vault:8200"),
            ("VAULT_ROLE_ID", "role"),
            ("VAULT_SECRET_ID", "secret"),
            ("VAULT_KV_VERSION", "1"),
        ]
        .into_iter()
        .collect();

        let config =
            CredentialConfig::from_env_with(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.auth_method, AuthMethod::AppRole);
        assert_eq!(config.api_version, KvVersion::V1);
        assert!(!config.allow_unauthorized_certs);
    }

    #[test]
    fn test_from_env_without_address() {
        let err = CredentialConfig::from_env_with(|_| None).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = CredentialConfig::app_role("https://vault:8200", "role", "s3cr3t");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("has_secret_id: true"));
    }
}
