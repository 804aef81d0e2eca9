//! [`BillingGateClient`]: the public entry point for both integration methods.
//!
//! 1. **Redirect flow** — [`BillingGateClient::generate_redirect_url`] seals the
//!    payload into a token and appends it to the worker URL.
//! 2. **API flow** — [`BillingGateClient::create_payment_api`] and
//!    [`BillingGateClient::verify_transaction`] call the worker directly with a
//!    bearer token.
//!
//! Every operation checks its configuration requirements before doing any
//! cryptography or I/O.

use std::sync::{Arc, OnceLock};

use common::{BillingGateError, Flow, PaymentPayload, PaymentResponse, Result, VerifyOutcome};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::crypto::PayloadCodec;
use crate::transport::HttpTransport;

/// Path of the create-payment endpoint, relative to the worker URL.
pub const PAYMENT_PATH: &str = "/api/payment";

/// Path of the verify endpoint, relative to the worker URL.
pub const VERIFY_PATH: &str = "/api/verify";

/// Client for a BillingGate worker.
///
/// Cheap to clone; clones share the HTTP connection pool and the derived
/// redirect key. Holds no mutable state besides that one-time key cache, so
/// concurrent calls are independent.
#[derive(Debug, Clone)]
pub struct BillingGateClient {
    config: Arc<ClientConfig>,
    transport: HttpTransport,
    codec: Arc<OnceLock<PayloadCodec>>,
}

impl BillingGateClient {
    /// Create a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BillingGateError::InvalidConfig`] if the configuration is out
    /// of range or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self {
            config: Arc::new(config),
            transport,
            codec: Arc::new(OnceLock::new()),
        })
    }

    /// Create a client from `BILLINGGATE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Redirect flow: build `{worker_url}/{token}` for the customer's browser.
    ///
    /// # Errors
    ///
    /// - [`BillingGateError::Configuration`] if `encryption_key` or `worker_url` is unset.
    /// - [`BillingGateError::InvalidPayload`] if the payload fails validation.
    /// - [`BillingGateError::Encoding`] if sealing fails.
    pub fn generate_redirect_url(&self, payload: &PaymentPayload) -> Result<String> {
        let (worker_url, _) = self.config.redirect_credentials()?;
        payload.validate()?;

        let token = self.codec()?.encrypt_payload(payload)?;
        debug!(token_len = token.len(), "sealed redirect payload");
        Ok(format!("{worker_url}/{token}"))
    }

    /// API flow: create a payment and return the hosted page for it.
    ///
    /// # Errors
    ///
    /// - [`BillingGateError::Configuration`] if `api_key` or `worker_url` is unset.
    /// - [`BillingGateError::InvalidPayload`] if the payload fails validation.
    /// - [`BillingGateError::Transport`] on a non-2xx response.
    /// - [`BillingGateError::Network`] / [`BillingGateError::Encoding`] on any other failure.
    pub async fn create_payment_api(&self, payload: &PaymentPayload) -> Result<PaymentResponse> {
        let (worker_url, api_key) = self.config.api_credentials(Flow::Payment)?;
        payload.validate()?;

        let url = format!("{worker_url}{PAYMENT_PATH}");
        let response: PaymentResponse = self
            .transport
            .post_json(&url, api_key.expose(), payload, "payment creation")
            .await?;
        info!(transaction_id = %response.id, "payment created");
        Ok(response)
    }

    /// Check whether a transaction is paid and valid.
    ///
    /// A non-2xx response is an error, never a silent `false`.
    ///
    /// # Errors
    ///
    /// - [`BillingGateError::Configuration`] if `api_key` or `worker_url` is unset.
    /// - [`BillingGateError::InvalidPayload`] if `transaction_id` is blank.
    /// - [`BillingGateError::Transport`] on a non-2xx response.
    /// - [`BillingGateError::Encoding`] if the body is not a recognised verify shape.
    pub async fn verify_transaction(&self, transaction_id: &str) -> Result<bool> {
        let (worker_url, api_key) = self.config.api_credentials(Flow::Verification)?;
        if transaction_id.trim().is_empty() {
            return Err(BillingGateError::InvalidPayload(
                "transaction id must not be empty".into(),
            ));
        }

        let url = format!("{worker_url}{VERIFY_PATH}");
        let body: Value = self
            .transport
            .get_json(&url, api_key.expose(), &[("transaction", transaction_id)], "verification")
            .await?;
        let outcome = VerifyOutcome::from_json(&body)?;
        debug!(transaction_id, valid = outcome.valid, "transaction verified");
        Ok(outcome.valid)
    }

    /// Open a redirect token (or a full redirect URL) with this client's key.
    ///
    /// This is the worker-side decoding, exposed for interop checks and tooling.
    /// Only `encryption_key` is needed; `worker_url` may be unset. For a URL,
    /// the token is the last non-empty path segment, ignoring any query string
    /// or fragment.
    ///
    /// # Errors
    ///
    /// - [`BillingGateError::Configuration`] if `encryption_key` is unset.
    /// - [`BillingGateError::Encoding`] if the token is malformed or fails authentication.
    pub fn decode_redirect_token(&self, token_or_url: &str) -> Result<PaymentPayload> {
        let codec = self.codec()?;
        Ok(codec.decrypt_payload(token_segment(token_or_url))?)
    }

    /// The codec for the configured key, derived on first use.
    fn codec(&self) -> Result<&PayloadCodec> {
        if let Some(codec) = self.codec.get() {
            return Ok(codec);
        }
        let key = self.config.encryption_key()?;
        Ok(self
            .codec
            .get_or_init(|| PayloadCodec::new(key.expose(), self.config.salt())))
    }
}

/// Last non-empty path segment of `token_or_url`, before any `?` or `#`.
///
/// Base64url tokens never contain `/`, `?` or `#`, so a bare token comes back unchanged.
fn token_segment(token_or_url: &str) -> &str {
    token_or_url
        .trim()
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}
