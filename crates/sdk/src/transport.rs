//! Bearer-authenticated JSON transport to the BillingGate worker.
//!
//! Thin wrapper over a pooled [`reqwest::Client`]. No retries: every call is a
//! single request whose failure is surfaced to the caller unchanged.

use std::time::Duration;

use common::{BillingGateError, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// HTTP transport shared by all API-flow operations.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`BillingGateError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("billinggate-sdk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                BillingGateError::InvalidConfig(format!("failed to create HTTP client: {e}"))
            })?;
        Ok(Self { client })
    }

    /// `POST` `body` as JSON and decode the JSON response as `T`.
    ///
    /// `action` names the operation in error messages (e.g. `"payment creation"`).
    pub async fn post_json<B, T>(&self, url: &str, bearer: &str, body: &B, action: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(url = %url, "POST to worker");
        let request = self.client.post(url).bearer_auth(bearer).json(body);
        self.execute(request, action).await
    }

    /// `GET` with query parameters and decode the JSON response as `T`.
    pub async fn get_json<T>(
        &self,
        url: &str,
        bearer: &str,
        query: &[(&str, &str)],
        action: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(url = %url, "GET from worker");
        let request = self.client.get(url).bearer_auth(bearer).query(query);
        self.execute(request, action).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| BillingGateError::network(format!("{action} failed"), e))?;
        let response = ensure_success(response, action).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BillingGateError::network(format!("{action} failed reading body"), e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            BillingGateError::encoding_with(format_args!("failed to parse {action} response"), e)
        })
    }
}

/// Turn a non-2xx response into [`BillingGateError::Transport`] carrying its body.
async fn ensure_success(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), action, "worker returned non-success status");
    Err(BillingGateError::Transport {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_custom_timeout() {
        assert!(HttpTransport::new(Duration::from_secs(2)).is_ok());
    }

    #[tokio::test]
    async fn connection_failure_is_network_error() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let url = format!("http://{addr}/api/verify");
        let err = transport
            .get_json::<serde_json::Value>(&url, "k", &[], "verification")
            .await
            .unwrap_err();
        assert!(matches!(err, BillingGateError::Network { .. }));
        assert!(err.to_string().starts_with("verification failed"));
    }
}
