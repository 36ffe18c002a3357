//! Authentication strategy trait.

use std::fmt::Debug;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::Result;

/// Authentication strategy interface.
/// Produces the token presented in `X-Vault-Token`.
#[async_trait]
pub trait AuthStrategy: Send + Sync + Debug {
    /// Returns the token to present to Vault.
    async fn vault_token(&self) -> Result<SecretString>;

    /// Returns the strategy name for logging/debugging.
    fn name(&self) -> &'static str;
}
