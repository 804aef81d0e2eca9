//! CLI argument definitions using clap.

use billinggate_sdk::{ClientConfig, PaymentPayload};
use clap::{Args, Parser, Subcommand};

/// BillingGate command-line client.
#[derive(Parser, Debug)]
#[command(name = "billinggate")]
#[command(version)]
#[command(about = "Generate BillingGate redirect URLs, create and verify payments")]
#[command(
    long_about = "Generate BillingGate redirect URLs, create and verify payments.\n\nSettings fall back to BILLINGGATE_WORKER_URL, BILLINGGATE_ENCRYPTION_KEY, BILLINGGATE_API_KEY and BILLINGGATE_SALT."
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Worker base URL (overrides BILLINGGATE_WORKER_URL).
    #[arg(long, global = true)]
    pub worker_url: Option<String>,

    /// Redirect-flow secret (overrides BILLINGGATE_ENCRYPTION_KEY).
    #[arg(long, global = true)]
    pub encryption_key: Option<String>,

    /// API-flow bearer token (overrides BILLINGGATE_API_KEY).
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Key-derivation salt shared with the worker (overrides BILLINGGATE_SALT).
    #[arg(long, global = true)]
    pub salt: Option<String>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,
}

impl Cli {
    /// Layer command-line overrides on top of `base`.
    pub fn apply_overrides(&self, base: ClientConfig) -> ClientConfig {
        let mut cfg = base;
        if let Some(url) = &self.worker_url {
            cfg = cfg.with_worker_url(url);
        }
        if let Some(key) = &self.encryption_key {
            cfg = cfg.with_encryption_key(key);
        }
        if let Some(key) = &self.api_key {
            cfg = cfg.with_api_key(key);
        }
        if let Some(salt) = self.salt.as_deref().filter(|s| !s.is_empty()) {
            cfg = cfg.with_salt(salt.as_bytes());
        }
        cfg
    }
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print an encrypted redirect URL for the payload.
    Redirect(PayloadArgs),

    /// Create a payment through the worker API and print the response.
    Create(PayloadArgs),

    /// Check whether a transaction is paid; prints `true` or `false`.
    Verify {
        /// Transaction identifier returned by `create`.
        transaction: String,
    },

    /// Decrypt a redirect token (or full redirect URL) and print its payload.
    Decode {
        /// Token or `{worker_url}/{token}` URL.
        token: String,
    },
}

/// Payment payload fields.
#[derive(Args, Debug)]
pub struct PayloadArgs {
    /// Product name shown on the payment page.
    #[arg(long)]
    pub product_name: String,

    /// Amount in the unit agreed with the gateway.
    #[arg(long, allow_negative_numbers = true)]
    pub amount: i64,

    /// Caller identifier.
    #[arg(long)]
    pub source: String,

    /// URL notified when the payment completes.
    #[arg(long)]
    pub callback_url: Option<String>,

    /// Product image URL.
    #[arg(long)]
    pub photo_url: Option<String>,

    /// Path echoed back after payment.
    #[arg(long)]
    pub query_path: Option<String>,
}

impl From<PayloadArgs> for PaymentPayload {
    fn from(args: PayloadArgs) -> Self {
        let mut payload = PaymentPayload::new(args.product_name, args.amount, args.source);
        if let Some(url) = args.callback_url {
            payload = payload.with_callback_url(url);
        }
        if let Some(url) = args.photo_url {
            payload = payload.with_photo_url(url);
        }
        if let Some(path) = args.query_path {
            payload = payload.with_query_path(path);
        }
        payload
    }
}
