//! `billinggate` — CLI entry point.
//!
//! Startup sequence:
//! 1. Parse arguments.
//! 2. Initialise structured logging.
//! 3. Load [`ClientConfig`] from `BILLINGGATE_*` variables and apply CLI overrides.
//! 4. Build the client and run the requested command.

mod cli;
mod commands;
mod telemetry;

use anyhow::{Context, Result};
use billinggate_sdk::{BillingGateClient, ClientConfig};
use clap::Parser;
use tracing::debug;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 1. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cli.log_level, cli.json_logs)?;

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let base = ClientConfig::from_env().context("configuration invalid")?;
    let cfg = cli.apply_overrides(base);
    debug!(
        version = env!("CARGO_PKG_VERSION"),
        worker_url = cfg.worker_url().unwrap_or("<unset>"),
        redirect_ready = cfg.has_encryption_key(),
        api_ready = cfg.has_api_key(),
        "billinggate configured"
    );

    // -----------------------------------------------------------------------
    // 3. Command
    // -----------------------------------------------------------------------
    let client = BillingGateClient::new(cfg).context("failed to build BillingGate client")?;
    commands::run(&client, cli.command).await
}
