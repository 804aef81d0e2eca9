//! Command execution. Results go to stdout; diagnostics go through `tracing`.

use anyhow::{Context, Result};
use billinggate_sdk::{BillingGateClient, PaymentPayload};
use tracing::debug;

use crate::cli::Commands;

/// Run one command against `client`.
///
/// # Errors
///
/// Returns the SDK error for the command, with context naming what failed.
pub async fn run(client: &BillingGateClient, command: Commands) -> Result<()> {
    match command {
        Commands::Redirect(args) => {
            let payload = PaymentPayload::from(args);
            let url = client
                .generate_redirect_url(&payload)
                .context("failed to generate redirect URL")?;
            println!("{url}");
        }
        Commands::Create(args) => {
            let payload = PaymentPayload::from(args);
            let created = client
                .create_payment_api(&payload)
                .await
                .context("payment creation failed")?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        Commands::Verify { transaction } => {
            let paid = client
                .verify_transaction(&transaction)
                .await
                .context("verification failed")?;
            debug!(%transaction, paid, "verification complete");
            println!("{paid}");
        }
        Commands::Decode { token } => {
            let payload = client
                .decode_redirect_token(&token)
                .context("failed to decode redirect token")?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }
    Ok(())
}
