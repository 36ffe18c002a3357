//! # vault-auth
//!
//! Credential resolution for HashiCorp Vault.
//!
//! Turns a stored credential configuration into the request decorations needed
//! to talk to Vault (`X-Vault-Token`, `X-Vault-Namespace`) and builds the
//! identity-lookup probe used to confirm a configuration works.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vault_auth::{AuthResolver, CredentialConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vault_auth::Error> {
//!     let config = CredentialConfig::token("https://vault.example.com:8200", "hvs.ABC")
//!         .with_namespace("team-a");
//!
//!     let resolver = AuthResolver::default();
//!     let headers = resolver.resolve_headers(&config).await?;
//!     assert_eq!(headers.token(), Some("hvs.ABC"));
//!
//!     let probe = resolver.build_validation_request(&config).await?;
//!     println!("{} {}", probe.method, probe.url);
//!     Ok(())
//! }
//! ```
//!
//! ## AppRole
//!
//! ```rust,no_run
//! use vault_auth::{AuthResolver, CredentialConfig, HttpClientConfig};
//!
//! # async fn example() -> Result<(), vault_auth::Error> {
//! let config = CredentialConfig::app_role(
//!     "https://vault.example.com:8200",
//!     "role-id",
//!     "secret-id",
//! );
//!
//! let http = HttpClientConfig::from_credential(&config).build().await?;
//! let resolver = AuthResolver::with_http(http.clone());
//! resolver.verify(&http, &config).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod client;
pub mod prelude;

pub use auth::{
    AppRoleLogin, AppRoleLoginRequest, AppRoleStrategy, AuthHeaders, AuthMethod, AuthResolver,
    AuthStrategy, CredentialConfig, Credentials, HttpAppRoleLogin, KvVersion, SessionToken,
    TokenStrategy,
};
pub use client::{HttpClientConfig, ProxyConfig, ValidationRequest};

/// Error type for vault-auth operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A required field is missing or a value is unusable.
    #[error("Configuration error: {field}: {message}")]
    Configuration {
        field: &'static str,
        message: String,
    },

    /// Network or TLS failure talking to Vault.
    #[error("Connectivity error: {0}")]
    Connectivity(#[source] reqwest::Error),

    /// Vault answered with a non-2xx status.
    #[error("Authentication rejected (HTTP {status}): {message}")]
    AuthenticationRejected { status: u16, message: String },

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Response did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing fields, bad URLs, unsupported enum values
    Configuration,
    /// Vault rejected the presented credentials
    Authorization,
    /// Network or TLS failures that may succeed on retry
    Transient,
    /// Internal errors (IO, JSON, unexpected response shapes)
    Internal,
}

impl Error {
    pub fn config(field: &'static str, message: impl Into<String>) -> Self {
        Error::Configuration {
            field,
            message: message.into(),
        }
    }

    pub fn missing(field: &'static str) -> Self {
        Error::config(field, "required field is missing or empty")
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Error::AuthenticationRejected {
            status,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Configuration { .. } => ErrorCategory::Configuration,
            Error::AuthenticationRejected { .. } => ErrorCategory::Authorization,
            Error::Connectivity(_) => ErrorCategory::Transient,
            Error::Json(_) | Error::Parse(_) | Error::Io(_) => ErrorCategory::Internal,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn is_authorization_error(&self) -> bool {
        self.category() == ErrorCategory::Authorization
    }

    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::AuthenticationRejected { status, .. } => Some(*status),
            Error::Connectivity(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Builder errors come from values reqwest refused before sending anything;
/// everything else happened on the wire.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Error::Configuration {
                field: "request",
                message: err.to_string(),
            }
        } else {
            Error::Connectivity(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
