//! Identity-lookup probe.

use reqwest::Method;
use url::Url;

use crate::auth::AuthHeaders;
use crate::{Error, Result};

/// Read-only request confirming that a credential is accepted by Vault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationRequest {
    pub method: Method,
    pub url: Url,
    pub headers: AuthHeaders,
}

impl ValidationRequest {
    /// Token self-lookup endpoint, relative to the Vault address.
    pub const PATH: &'static str = "/v1/auth/token/lookup-self";

    pub fn new(url: Url, headers: AuthHeaders) -> Self {
        Self {
            method: Method::GET,
            url,
            headers,
        }
    }

    /// Build the request on `http` without sending it.
    pub fn to_request(&self, http: &reqwest::Client) -> reqwest::RequestBuilder {
        let request = http.request(self.method.clone(), self.url.clone());
        self.headers.apply(request)
    }

    /// Send the probe. Any 2xx is success; the body is not read.
    pub async fn send(&self, http: &reqwest::Client) -> Result<()> {
        let response = self.to_request(http).send().await?;
        let status = response.status();

        if status.is_success() {
            tracing::debug!(url = %self.url, status = status.as_u16(), "Vault credential accepted");
            return Ok(());
        }

        tracing::debug!(url = %self.url, status = status.as_u16(), "Vault credential rejected");
        let text = response.text().await.unwrap_or_default();
        Err(Error::rejected(status.as_u16(), text))
    }
}
