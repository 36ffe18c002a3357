//! Credential types.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};

/// Credential group for the active authentication method.
#[derive(Clone)]
pub enum Credentials {
    /// AppRole machine identity.
    AppRole {
        role_id: String,
        secret_id: SecretString,
    },
    /// Static Vault token.
    Token { token: SecretString },
}

impl Credentials {
    /// Get credential type name.
    pub fn credential_type(&self) -> &'static str {
        match self {
            Credentials::AppRole { .. } => "app_role",
            Credentials::Token { .. } => "token",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::AppRole { role_id, .. } => f
                .debug_struct("AppRole")
                .field("role_id", role_id)
                .field("secret_id", &"[redacted]")
                .finish(),
            Credentials::Token { .. } => f
                .debug_struct("Token")
                .field("token", &"[redacted]")
                .finish(),
        }
    }
}

/// Session token issued by an AppRole login.
#[derive(Clone)]
pub struct SessionToken {
    client_token: SecretString,
    /// Token accessor, if Vault returned one.
    pub accessor: Option<String>,
    /// Policies attached to the token.
    pub policies: Vec<String>,
    /// Lease duration in seconds. Zero means the token does not expire.
    pub lease_duration: u64,
    pub renewable: bool,
    pub issued_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(client_token: impl Into<String>, lease_duration: u64) -> Self {
        Self {
            client_token: SecretString::from(client_token.into()),
            accessor: None,
            policies: Vec::new(),
            lease_duration,
            renewable: false,
            issued_at: Utc::now(),
        }
    }

    pub fn client_token(&self) -> &SecretString {
        &self.client_token
    }

    pub fn into_client_token(self) -> SecretString {
        self.client_token
    }

    /// Expiration time, or `None` for non-expiring tokens.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.lease_duration == 0 {
            return None;
        }
        let lease = Duration::try_seconds(i64::try_from(self.lease_duration).ok()?)?;
        self.issued_at.checked_add_signed(lease)
    }

    /// Check if the lease has run out.
    pub fn is_expired(&self) -> bool {
        self.expires_at()
            .map(|exp| Utc::now() >= exp)
            .unwrap_or(false)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("client_token", &"[redacted]")
            .field("accessor", &self.accessor)
            .field("policies", &self.policies)
            .field("lease_duration", &self.lease_duration)
            .field("renewable", &self.renewable)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

impl PartialEq for SessionToken {
    fn eq(&self, other: &Self) -> bool {
        self.client_token.expose_secret() == other.client_token.expose_secret()
            && self.accessor == other.accessor
            && self.lease_duration == other.lease_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_type() {
        let token = Credentials::Token {
            token: SecretString::from("hvs.ABC"),
        };
        assert_eq!(token.credential_type(), "token");

        let app_role = Credentials::AppRole {
            role_id: "role".into(),
            secret_id: SecretString::from("secret"),
        };
        assert_eq!(app_role.credential_type(), "app_role");
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::AppRole {
            role_id: "role".into(),
            secret_id: SecretString::from("s3cr3t"),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("role"));
        assert!(!debug.contains("s3cr3t"));
    }

    #[test]
    fn test_session_token_expiry() {
        let permanent = SessionToken::new("hvs.root", 0);
        assert!(permanent.expires_at().is_none());
        assert!(!permanent.is_expired());

        let live = SessionToken::new("hvs.live", 3600);
        assert!(!live.is_expired());

        let mut stale = SessionToken::new("hvs.stale", 60);
        stale.issued_at = Utc::now() - Duration::seconds(120);
        assert!(stale.is_expired());
    }

    #[test]
    fn test_session_token_debug_redacted() {
        let token = SessionToken::new("hvs.secret-value", 60);
        assert!(!format!("{:?}", token).contains("hvs.secret-value"));
        assert_eq!(token.client_token().expose_secret(), "hvs.secret-value");
    }
}
