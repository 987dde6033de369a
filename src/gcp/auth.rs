//! Bearer token resolution for Google API calls.
//!
//! The original demo leaned on the Go SDK's implicit Application Default
//! Credentials. The REST client needs an explicit token: either a static
//! one from configuration, or one minted by the GCE metadata server on
//! the instance the service runs on.

use reqwest::Client;
use serde::Deserialize;

use super::GcpError;

/// Where access tokens come from.
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// A fixed token supplied via `GCP_ACCESS_TOKEN`.
    Static(String),

    /// Fetch from the metadata server's default service account. Holds
    /// the metadata base URL so tests can point it at a local server.
    Metadata(String),
}

/// Shape of the metadata server's token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl TokenSource {
    /// Resolve a bearer token for one outgoing API call.
    ///
    /// Tokens are not cached: every request stands alone, matching the
    /// service's no-shared-state model. The metadata server is local to
    /// the instance and caches tokens itself.
    pub async fn bearer(&self, http: &Client) -> Result<String, GcpError> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Metadata(base) => {
                let url =
                    format!("{base}/computeMetadata/v1/instance/service-accounts/default/token");
                let resp = http
                    .get(&url)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .map_err(|e| GcpError::Auth(format!("GET {url} failed: {e}")))?;

                let status = resp.status();
                if !status.is_success() {
                    let body = resp.text().await.unwrap_or_default();
                    return Err(GcpError::Auth(format!(
                        "GET {url} returned HTTP {}: {body}",
                        status.as_u16()
                    )));
                }

                let token: TokenResponse = resp
                    .json()
                    .await
                    .map_err(|e| GcpError::Auth(format!("bad token response from {url}: {e}")))?;
                Ok(token.access_token)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_token_is_returned_as_is() {
        let source = TokenSource::Static("abc123".to_string());
        let token = source.bearer(&Client::new()).await.unwrap();
        assert_eq!(token, "abc123");
    }

    #[tokio::test]
    async fn metadata_token_is_fetched_with_flavor_header() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock(
                "GET",
                "/computeMetadata/v1/instance/service-accounts/default/token",
            )
            .match_header("Metadata-Flavor", "Google")
            .with_status(200)
            .with_body(r#"{"access_token":"meta-token","expires_in":3599,"token_type":"Bearer"}"#)
            .create_async()
            .await;

        let source = TokenSource::Metadata(server.url());
        let token = source.bearer(&Client::new()).await.unwrap();
        assert_eq!(token, "meta-token");
    }

    #[tokio::test]
    async fn metadata_failure_surfaces_as_auth_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock(
                "GET",
                "/computeMetadata/v1/instance/service-accounts/default/token",
            )
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let source = TokenSource::Metadata(server.url());
        let err = source.bearer(&Client::new()).await.unwrap_err();
        assert!(matches!(err, GcpError::Auth(_)));
    }
}
