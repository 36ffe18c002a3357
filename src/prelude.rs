//! Prelude module for convenient imports.
//!
//! ```rust
//! use vault_auth::prelude::*;
//! ```

pub use crate::auth::{
    AppRoleLogin, AuthHeaders, AuthMethod, AuthResolver, AuthStrategy, CredentialConfig,
    Credentials, KvVersion, SessionToken,
};
pub use crate::client::{HttpClientConfig, ValidationRequest};
pub use crate::{Error, ErrorCategory, Result};
