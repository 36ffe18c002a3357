//! Vault request decorations.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// Header carrying the Vault token.
pub const TOKEN_HEADER: &str = "X-Vault-Token";

/// Header carrying the Enterprise namespace.
pub const NAMESPACE_HEADER: &str = "X-Vault-Namespace";

/// Headers to attach to every Vault request made with one credential.
///
/// Holds `X-Vault-Token` and, only when a namespace is configured,
/// `X-Vault-Namespace`. The token value is marked sensitive so it is
/// redacted from `Debug` output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthHeaders {
    headers: HeaderMap,
}

impl AuthHeaders {
    pub fn new(token: &SecretString, namespace: Option<&str>) -> Result<Self> {
        let mut token_value = HeaderValue::from_str(token.expose_secret())
            .map_err(|_| Error::config("token", "contains characters not allowed in a header"))?;
        token_value.set_sensitive(true);

        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(HeaderName::from_static("x-vault-token"), token_value);

        if let Some(ns) = namespace.filter(|ns| !ns.is_empty()) {
            headers.insert(
                HeaderName::from_static("x-vault-namespace"),
                namespace_value(ns)?,
            );
        }

        Ok(Self { headers })
    }

    pub fn token(&self) -> Option<&str> {
        self.get(TOKEN_HEADER)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.get(NAMESPACE_HEADER)
    }

    /// Look up a header value by case-insensitive name.
    ///
    /// Values are read back as UTF-8, so a namespace such as `équipe`
    /// round-trips even though it is not visible ASCII.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.headers.iter()
    }

    pub fn as_header_map(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn into_header_map(self) -> HeaderMap {
        self.headers
    }

    /// Attach the decorations to an outbound request.
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.headers(self.headers.clone())
    }
}

/// Check a namespace can travel in `X-Vault-Namespace`.
pub(crate) fn namespace_value(namespace: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(namespace)
        .map_err(|_| Error::config("namespace", "contains characters not allowed in a header"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_only() {
        let headers = AuthHeaders::new(&SecretString::from("hvs.ABC"), None).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.token(), Some("hvs.ABC"));
        assert!(headers.namespace().is_none());
    }

    #[test]
    fn test_empty_namespace_omitted() {
        let headers = AuthHeaders::new(&SecretString::from("hvs.ABC"), Some("")).unwrap();
        assert_eq!(headers.len(), 1);
        assert!(headers.get("x-vault-namespace").is_none());
    }

    #[test]
    fn test_namespace_included() {
        let headers = AuthHeaders::new(&SecretString::from("hvs.ABC"), Some("team-a")).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.namespace(), Some("team-a"));
        assert_eq!(headers.get("x-vault-namespace"), Some("team-a"));
    }

    #[test]
    fn test_token_marked_sensitive() {
        let headers = AuthHeaders::new(&SecretString::from("hvs.hidden"), None).unwrap();
        let value = headers.as_header_map().get(TOKEN_HEADER).unwrap();
        assert!(value.is_sensitive());
        assert!(!format!("{:?}", headers).contains("hvs.hidden"));
    }

    #[test]
    fn test_non_ascii_namespace_readable() {
        let headers = AuthHeaders::new(&SecretString::from("hvs.ABC"), Some("équipe")).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.namespace(), Some("équipe"));
        assert_eq!(
            headers.as_header_map().get(NAMESPACE_HEADER).unwrap().as_bytes(),
            "équipe".as_bytes()
        );
    }

    #[test]
    fn test_invalid_header_value() {
        let err = AuthHeaders::new(&SecretString::from("bad\ntoken"), None).unwrap_err();
        assert!(err.is_configuration_error());

        let err = AuthHeaders::new(&SecretString::from("ok"), Some("bad\nns")).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
