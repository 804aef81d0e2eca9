//! Client SDK for the BillingGate hosted payment gateway.
//!
//! Two integration methods are offered:
//!
//! - **Redirect flow:** seal a [`PaymentPayload`] into an AES-256-GCM token
//!   and send the customer's browser to `{worker_url}/{token}`.
//! - **API flow:** create payments and verify transactions over HTTPS with a
//!   bearer token.
//!
//! ```no_run
//! use billinggate_sdk::{BillingGateClient, ClientConfig, PaymentPayload};
//!
//! # async fn run() -> billinggate_sdk::Result<()> {
//! let client = BillingGateClient::new(ClientConfig::from_env()?)?;
//! let payload = PaymentPayload::new("SDK Test Product", 600, "RustSDK_Example")
//!     .with_callback_url("https://example.com/callback");
//!
//! let url = client.generate_redirect_url(&payload)?;
//! let created = client.create_payment_api(&payload).await?;
//! let paid = client.verify_transaction(&created.id).await?;
//! # let _ = (url, paid);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod crypto;
pub mod transport;

pub use client::BillingGateClient;
pub use config::{ClientConfig, SecretString};
pub use common::{BillingGateError, Flow, PaymentPayload, PaymentResponse, Result, VerifyOutcome};
