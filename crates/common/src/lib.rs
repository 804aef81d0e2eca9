//! Wire types and errors shared across the BillingGate SDK crates.

pub mod error;
pub mod protocol;

pub use error::{BillingGateError, Flow, Result};
pub use protocol::{PaymentPayload, PaymentResponse, VerifyOutcome};
