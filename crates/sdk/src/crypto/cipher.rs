//! PBKDF2 key derivation and AES-256-GCM sealing of redirect payloads.
//!
//! **Nonce rule:** every [`PayloadCodec::seal`] call draws a fresh 96-bit nonce
//! from the OS CSPRNG. GCM nonce reuse under one key breaks both
//! confidentiality and authentication, so there is no public API that accepts
//! a caller-chosen nonce.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{de::DeserializeOwned, Serialize};
use sha2::Sha256;
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

/// Byte length of the derived AES-256 key.
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce.
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// PBKDF2-HMAC-SHA256 iteration count shared with the worker.
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Salt the hosted worker uses unless configured otherwise.
pub const DEFAULT_SALT: &[u8] = b"billinggate_salt";

/// Errors produced by the codec layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// AES-GCM encryption failed.
    #[error("aead operation failed")]
    AeadFailure,

    /// The authentication tag did not verify: wrong key, wrong salt, or tampered token.
    #[error("authentication failed: token was tampered with or sealed under a different key")]
    AuthenticationFailed,

    /// The token is not valid base64url or is too short to hold a nonce and tag.
    #[error("invalid token format: {0}")]
    InvalidFormat(&'static str),

    /// The payload could not be converted to or from JSON.
    #[error("payload serialisation failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<CipherError> for common::BillingGateError {
    fn from(e: CipherError) -> Self {
        common::BillingGateError::Encoding {
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

/// A derived AES-256 key. Zeroed on drop.
pub struct DerivedKey(Box<[u8; KEY_LEN]>);

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Box::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive the payload key from a shared secret with PBKDF2-HMAC-SHA256.
///
/// Deterministic: the same `(secret, salt)` always yields the same key.
pub fn derive_key(secret: &str, salt: &[u8]) -> DerivedKey {
    derive_key_with_rounds(secret.as_bytes(), salt, PBKDF2_ROUNDS)
}

fn derive_key_with_rounds(secret: &[u8], salt: &[u8], rounds: u32) -> DerivedKey {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(secret, salt, rounds, &mut key[..]);
    DerivedKey::from_bytes(*key)
}

// ---------------------------------------------------------------------------
// Token framing
// ---------------------------------------------------------------------------

/// A sealed payload: `nonce || ciphertext || tag`, base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedToken {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw ciphertext followed by the 16-byte authentication tag.
    pub ciphertext: Vec<u8>,
}

impl SealedToken {
    /// Encode to the URL path segment form.
    pub fn encode(&self) -> String {
        let mut combined = Vec::with_capacity(NONCE_LEN + self.ciphertext.len());
        combined.extend_from_slice(&self.nonce);
        combined.extend_from_slice(&self.ciphertext);
        URL_SAFE_NO_PAD.encode(combined)
    }

    /// Parse a token produced by [`SealedToken::encode`].
    ///
    /// Trailing `=` padding is tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidFormat`] if the text is not base64url or
    /// decodes to fewer than `NONCE_LEN + TAG_LEN` bytes.
    pub fn decode(token: &str) -> Result<Self, CipherError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim_end_matches('='))
            .map_err(|_| CipherError::InvalidFormat("not base64url"))?;
        if bytes.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::InvalidFormat("shorter than nonce and tag"));
        }
        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);
        Ok(Self {
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// AES-256-GCM codec bound to one derived key.
///
/// Deriving the key is the expensive step (100 000 HMAC rounds), so callers
/// that seal many payloads should build one codec and reuse it.
#[derive(Clone)]
pub struct PayloadCodec {
    cipher: Aes256Gcm,
}

impl PayloadCodec {
    /// Derive the key for `(secret, salt)` and build a codec around it.
    pub fn new(secret: &str, salt: &[u8]) -> Self {
        Self::from_key(&derive_key(secret, salt))
    }

    /// Build a codec from an already-derived key.
    pub fn from_key(key: &DerivedKey) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key.as_bytes());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypt `plaintext` under a fresh random nonce.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::AeadFailure`] on an internal AEAD error.
    pub fn seal(&self, plaintext: &[u8]) -> Result<SealedToken, CipherError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        self.seal_with_nonce(nonce, plaintext)
    }

    fn seal_with_nonce(
        &self,
        nonce: [u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<SealedToken, CipherError> {
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CipherError::AeadFailure)?;
        Ok(SealedToken { nonce, ciphertext })
    }

    /// Decrypt and authenticate a sealed token.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::AuthenticationFailed`] if the tag does not verify.
    pub fn open(&self, token: &SealedToken) -> Result<Vec<u8>, CipherError> {
        self.cipher
            .decrypt(Nonce::from_slice(&token.nonce), token.ciphertext.as_ref())
            .map_err(|_| CipherError::AuthenticationFailed)
    }

    /// Serialise `payload` to JSON, seal it, and encode the result.
    pub fn encrypt_payload<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String, CipherError> {
        let json = serde_json::to_vec(payload)?;
        Ok(self.seal(&json)?.encode())
    }

    /// Decode, authenticate, and deserialise a token back into a payload.
    pub fn decrypt_payload<T: DeserializeOwned>(&self, token: &str) -> Result<T, CipherError> {
        let sealed = SealedToken::decode(token)?;
        let json = self.open(&sealed)?;
        Ok(serde_json::from_slice(&json)?)
    }
}

impl std::fmt::Debug for PayloadCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PayloadCodec([REDACTED])")
    }
}

/// One-shot form of [`PayloadCodec::encrypt_payload`].
pub fn encrypt_payload<T: Serialize + ?Sized>(
    payload: &T,
    secret: &str,
    salt: &[u8],
) -> Result<String, CipherError> {
    PayloadCodec::new(secret, salt).encrypt_payload(payload)
}

/// One-shot form of [`PayloadCodec::decrypt_payload`].
pub fn decrypt_payload<T: DeserializeOwned>(
    token: &str,
    secret: &str,
    salt: &[u8],
) -> Result<T, CipherError> {
    PayloadCodec::new(secret, salt).decrypt_payload(token)
}
