//! HTTP client construction: timeout, TLS trust, CA bundle and proxy settings.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::CredentialConfig;
use crate::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Network configuration for the HTTP client used against Vault.
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    /// Whole-request timeout; bounds the AppRole exchange and the probe.
    pub timeout: Option<Duration>,
    /// Skip TLS certificate validation.
    pub accept_invalid_certs: bool,
    /// Custom CA certificate file path (PEM)
    pub ca_cert: Option<PathBuf>,
    /// Proxy configuration
    pub proxy: Option<ProxyConfig>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            accept_invalid_certs: false,
            ca_cert: None,
            proxy: None,
        }
    }
}

/// Proxy server configuration.
#[derive(Clone, Debug)]
pub struct ProxyConfig {
    /// HTTPS proxy URL
    pub https: Option<String>,
    /// HTTP proxy URL
    pub http: Option<String>,
    /// Hosts reached directly, bypassing both proxies
    pub no_proxy: Vec<String>,
}

impl HttpClientConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self {
            proxy: ProxyConfig::from_env(),
            ca_cert: env::var("VAULT_CACERT")
                .ok()
                .or_else(|| env::var("SSL_CERT_FILE").ok())
                .map(PathBuf::from),
            ..Default::default()
        }
    }

    /// Environment settings plus the TLS trust flag carried by `config`.
    pub fn from_credential(config: &CredentialConfig) -> Self {
        Self::from_env().accept_invalid_certs(config.allow_unauthorized_certs)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set CA certificate path.
    pub fn ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }

    /// Set proxy configuration.
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Apply configuration to reqwest ClientBuilder.
    pub async fn apply_to_builder(
        &self,
        mut builder: reqwest::ClientBuilder,
    ) -> Result<reqwest::ClientBuilder> {
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if self.accept_invalid_certs {
            tracing::debug!("TLS certificate validation disabled for Vault client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref ca_path) = self.ca_cert {
            let cert_data = tokio::fs::read(ca_path).await?;
            let cert = reqwest::Certificate::from_pem(&cert_data).map_err(|e| {
                Error::config("caCert", format!("{}: {}", ca_path.display(), e))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        if let Some(ref proxy) = self.proxy {
            builder = proxy.apply_to_builder(builder)?;
        }

        Ok(builder)
    }

    /// Build the HTTP client.
    pub async fn build(&self) -> Result<reqwest::Client> {
        let builder = self.apply_to_builder(reqwest::Client::builder()).await?;
        Ok(builder.build()?)
    }
}

impl ProxyConfig {
    /// Create from environment variables.
    pub fn from_env() -> Option<Self> {
        let https = env::var("HTTPS_PROXY")
            .ok()
            .or_else(|| env::var("https_proxy").ok());
        let http = env::var("HTTP_PROXY")
            .ok()
            .or_else(|| env::var("http_proxy").ok());

        if https.is_none() && http.is_none() {
            return None;
        }

        let no_proxy = env::var("NO_PROXY")
            .ok()
            .or_else(|| env::var("no_proxy").ok())
            .map(|s| parse_no_proxy(&s))
            .unwrap_or_default();

        Some(Self {
            https,
            http,
            no_proxy,
        })
    }

    /// Create with HTTPS proxy.
    pub fn https(url: impl Into<String>) -> Self {
        Self {
            https: Some(url.into()),
            http: None,
            no_proxy: Vec::new(),
        }
    }

    /// Add HTTP proxy.
    pub fn http(mut self, url: impl Into<String>) -> Self {
        self.http = Some(url.into());
        self
    }

    /// Add no-proxy patterns.
    pub fn no_proxy(mut self, patterns: impl IntoIterator<Item = String>) -> Self {
        self.no_proxy.extend(patterns);
        self
    }

    fn bypass(&self) -> Option<reqwest::NoProxy> {
        if self.no_proxy.is_empty() {
            return None;
        }
        reqwest::NoProxy::from_string(&self.no_proxy.join(","))
    }

    /// Apply to reqwest ClientBuilder.
    pub fn apply_to_builder(
        &self,
        mut builder: reqwest::ClientBuilder,
    ) -> Result<reqwest::ClientBuilder> {
        if let Some(ref https_url) = self.https {
            let proxy = reqwest::Proxy::https(https_url)
                .map_err(|e| Error::config("proxy", e.to_string()))?;
            builder = builder.proxy(proxy.no_proxy(self.bypass()));
        }
        if let Some(ref http_url) = self.http {
            let proxy = reqwest::Proxy::http(http_url)
                .map_err(|e| Error::config("proxy", e.to_string()))?;
            builder = builder.proxy(proxy.no_proxy(self.bypass()));
        }
        Ok(builder)
    }
}

fn parse_no_proxy(raw: &str) -> Vec<String> {
    raw.split([',', ' '])
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
