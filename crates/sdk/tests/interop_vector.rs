//! A redirect token sealed by the BillingGate Python SDK under the shared test
//! secret and the default salt, with the nonce fixed to `00 01 .. 0b`.
//!
//! The plaintext is Python's `json.dumps` output, so it uses `", "` and `": "`
//! separators rather than the SDK's compact form.

mod support;

use billinggate_sdk::crypto::{decrypt_payload, SealedToken, DEFAULT_SALT, NONCE_LEN};
use billinggate_sdk::{BillingGateClient, ClientConfig, PaymentPayload};
use serde_json::{json, Value};

use support::SECRET;

const PYTHON_SDK_TOKEN: &str = "AAECAwQFBgcICQoLqeHvXxNeAk_LhtkV9FGwFJjKjrMXg45RbcOun9kPi_EImnRibDirPWE-eBHIbPsKHIlXUY-0uLpSF9DNEm1kB5hZFZegg_sR73u0s1Ln1CB3SuEfuJ59b4Ro4ceKURgLGJJ49oJLhknbUT_64IEivCiJRY93THp1GdxOqBC6f8EowYjsNOlNACgyYw";

#[test]
fn python_sdk_token_opens_to_scenario_payload() {
    let opened: Value = decrypt_payload(PYTHON_SDK_TOKEN, SECRET, b"billinggate_salt").unwrap();
    assert_eq!(
        opened,
        json!({
            "product_name": "Test",
            "amount": 600,
            "source": "unit-test",
            "callback_url": null,
            "photo_url": null,
            "query_path": null,
        })
    );
}

#[test]
fn python_sdk_token_layout_is_nonce_then_ciphertext() {
    let sealed = SealedToken::decode(PYTHON_SDK_TOKEN).unwrap();
    let expected_nonce: Vec<u8> = (0..NONCE_LEN as u8).collect();
    assert_eq!(sealed.nonce.to_vec(), expected_nonce);
    assert_eq!(sealed.encode(), PYTHON_SDK_TOKEN);
}

#[test]
fn padded_python_sdk_token_is_accepted() {
    let padded = format!("{PYTHON_SDK_TOKEN}==");
    let opened: PaymentPayload = decrypt_payload(&padded, SECRET, DEFAULT_SALT).unwrap();
    assert_eq!(opened, PaymentPayload::new("Test", 600, "unit-test"));
}

#[test]
fn client_decodes_python_sdk_redirect_url() {
    let client = BillingGateClient::new(ClientConfig::new().with_encryption_key(SECRET)).unwrap();
    let url = format!("https://pay.example.com/{PYTHON_SDK_TOKEN}");
    assert_eq!(
        client.decode_redirect_token(&url).unwrap(),
        PaymentPayload::new("Test", 600, "unit-test")
    );
}

#[test]
fn python_sdk_token_rejected_under_other_salt() {
    let err = decrypt_payload::<Value>(PYTHON_SDK_TOKEN, SECRET, b"other_salt").unwrap_err();
    assert!(err.to_string().contains("authentication failed"));
}
