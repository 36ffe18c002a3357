//! Authentication module for HashiCorp Vault.
//!
//! Provides two authentication strategies:
//! - **Token**: a static Vault token sent as `X-Vault-Token`
//! - **AppRole**: a Role ID / Secret ID pair exchanged for a session token

mod config;
mod credential;
mod env;
mod headers;
mod login;
mod resolver;
mod strategy;

pub use config::{AuthMethod, CredentialConfig, KvVersion};
pub use credential::{Credentials, SessionToken};
pub use headers::{AuthHeaders, NAMESPACE_HEADER, TOKEN_HEADER};
pub use login::{AppRoleLogin, AppRoleLoginRequest, DEFAULT_APPROLE_MOUNT, HttpAppRoleLogin};
pub use resolver::AuthResolver;
pub use strategy::{AppRoleStrategy, AuthStrategy, TokenStrategy};
