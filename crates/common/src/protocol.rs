//! Request and response types exchanged with a BillingGate worker.
//!
//! [`PaymentPayload`] is both the plaintext sealed into redirect tokens and the
//! JSON body of `POST /api/payment`, so its serialised shape is part of the
//! wire contract: every field is always emitted, in declaration order, and
//! unset optionals are written as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{BillingGateError, Result};

// ---------------------------------------------------------------------------
// Payment payload
// ---------------------------------------------------------------------------

/// A payment request, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPayload {
    product_name: String,
    /// Amount in the unit agreed with the gateway (TWD for the hosted worker).
    amount: i64,
    source: String,
    callback_url: Option<String>,
    photo_url: Option<String>,
    query_path: Option<String>,
}

impl PaymentPayload {
    /// Build a payload from its required fields.
    pub fn new(product_name: impl Into<String>, amount: i64, source: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            amount,
            source: source.into(),
            callback_url: None,
            photo_url: None,
            query_path: None,
        }
    }

    /// URL the worker notifies once the payment completes.
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    /// Product image shown on the hosted payment page.
    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// Opaque path echoed back to the caller after payment.
    pub fn with_query_path(mut self, path: impl Into<String>) -> Self {
        self.query_path = Some(path.into());
        self
    }

    /// Name shown on the hosted payment page.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Amount to charge.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Identifier of the integrating system.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    pub fn query_path(&self) -> Option<&str> {
        self.query_path.as_deref()
    }

    /// Check field presence and URL shape before the payload is sealed or sent.
    ///
    /// No business rules are applied to `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`BillingGateError::InvalidPayload`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        ensure_present(&self.product_name, "product_name")?;
        ensure_present(&self.source, "source")?;
        if let Some(u) = &self.callback_url {
            ensure_http_url(u, "callback_url")?;
        }
        if let Some(u) = &self.photo_url {
            ensure_http_url(u, "photo_url")?;
        }
        Ok(())
    }

    /// Canonical JSON bytes of this payload.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

fn ensure_present(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BillingGateError::InvalidPayload(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

fn ensure_http_url(value: &str, field: &str) -> Result<()> {
    let parsed = Url::parse(value).map_err(|e| {
        BillingGateError::InvalidPayload(format!("{field} is not a valid URL: {e}"))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(BillingGateError::InvalidPayload(format!(
            "{field} must use http or https, got {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Create-payment response
// ---------------------------------------------------------------------------

/// Successful response body for `POST /api/payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// Server-assigned transaction identifier.
    pub id: String,
    /// Hosted payment page the customer should be sent to.
    pub url: String,
}

// ---------------------------------------------------------------------------
// Verify response
// ---------------------------------------------------------------------------

/// Parsed result of `GET /api/verify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    /// Whether the transaction is paid and valid.
    pub valid: bool,
}

impl VerifyOutcome {
    /// Interpret a verify response body.
    ///
    /// Accepted shapes are a bare boolean, `{"valid": <bool>}`, and the
    /// strings `"true"` / `"false"`.
    ///
    /// # Errors
    ///
    /// Returns [`BillingGateError::Encoding`] for any other body.
    pub fn from_json(value: &Value) -> Result<Self> {
        let valid = match value {
            Value::Bool(b) => Some(*b),
            Value::Object(map) => map.get("valid").and_then(Value::as_bool),
            Value::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        };
        valid.map(|valid| Self { valid }).ok_or_else(|| {
            BillingGateError::encoding(format!("unexpected verify response: {value}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialises_every_field_in_declared_order() {
        let p = PaymentPayload::new("Test", 600, "unit-test");
        let s = String::from_utf8(p.to_json_bytes().unwrap()).unwrap();
        assert_eq!(
            s,
            r#"{"product_name":"Test","amount":600,"source":"unit-test","callback_url":null,"photo_url":null,"query_path":null}"#
        );
    }

    #[test]
    fn builder_sets_optionals() {
        let p = PaymentPayload::new("Mug", 250, "shop")
            .with_callback_url("https://shop.example.com/cb")
            .with_query_path("order=42");
        assert_eq!(p.callback_url(), Some("https://shop.example.com/cb"));
        assert_eq!(p.photo_url(), None);
        assert_eq!(p.query_path(), Some("order=42"));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn deserialise_tolerates_missing_optionals() {
        let p: PaymentPayload =
            serde_json::from_value(json!({"product_name": "A", "amount": 1, "source": "s"}))
                .unwrap();
        assert_eq!(p, PaymentPayload::new("A", 1, "s"));
    }

    #[test]
    fn validate_rejects_blank_required_fields() {
        let err = PaymentPayload::new("  ", 1, "s").validate().unwrap_err();
        assert!(err.to_string().contains("product_name"));
        let err = PaymentPayload::new("A", 1, "").validate().unwrap_err();
        assert!(err.to_string().contains("source"));
    }

    #[test]
    fn validate_rejects_non_http_urls() {
        let p = PaymentPayload::new("A", 1, "s").with_photo_url("ftp://files.example.com/a.png");
        assert!(matches!(p.validate(), Err(BillingGateError::InvalidPayload(_))));
        let p = PaymentPayload::new("A", 1, "s").with_callback_url("not a url");
        assert!(p.validate().is_err());
    }

    #[test]
    fn negative_amount_is_not_rejected() {
        assert!(PaymentPayload::new("Refund", -10, "s").validate().is_ok());
    }

    #[test]
    fn payment_response_ignores_extra_fields() {
        let r: PaymentResponse = serde_json::from_value(
            json!({"id": "tx_1", "url": "https://pay.example.com/p/tx_1", "status": "pending"}),
        )
        .unwrap();
        assert_eq!(r.id, "tx_1");
    }

    #[test]
    fn verify_outcome_accepts_known_shapes() {
        assert!(VerifyOutcome::from_json(&json!(true)).unwrap().valid);
        assert!(!VerifyOutcome::from_json(&json!(false)).unwrap().valid);
        assert!(VerifyOutcome::from_json(&json!({"valid": true})).unwrap().valid);
        assert!(!VerifyOutcome::from_json(&json!("false")).unwrap().valid);
    }

    #[test]
    fn verify_outcome_rejects_truthy_guesses() {
        for body in [json!(1), json!("yes"), json!(null), json!({"paid": true}), json!([])] {
            assert!(matches!(
                VerifyOutcome::from_json(&body),
                Err(BillingGateError::Encoding { .. })
            ));
        }
    }
}
