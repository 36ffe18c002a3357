//! Static token authentication strategy.

use std::fmt;

use async_trait::async_trait;
use secrecy::SecretString;

use super::AuthStrategy;
use crate::Result;

/// Static token authentication strategy.
#[derive(Clone)]
pub struct TokenStrategy {
    token: SecretString,
}

impl TokenStrategy {
    /// Create a new token strategy.
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl fmt::Debug for TokenStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStrategy")
            .field("token", &"[redacted]")
            .finish()
    }
}

#[async_trait]
impl AuthStrategy for TokenStrategy {
    async fn vault_token(&self) -> Result<SecretString> {
        Ok(self.token.clone())
    }

    fn name(&self) -> &'static str {
        "token"
    }
}
