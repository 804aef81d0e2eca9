//! Payload codec for the redirect flow.
//!
//! This module is free of HTTP and configuration concerns; it must stay
//! byte-compatible with the worker's decoder.
//!
//! # Token format
//!
//! ```text
//! base64url-no-pad( nonce[12] || aes-256-gcm(key, nonce, json) || tag[16] )
//! key = pbkdf2-hmac-sha256(secret, salt, 100_000 rounds, 32 bytes)
//! ```

pub mod cipher;

pub use cipher::{
    decrypt_payload, derive_key, encrypt_payload, CipherError, DerivedKey, PayloadCodec,
    SealedToken, DEFAULT_SALT, KEY_LEN, NONCE_LEN, PBKDF2_ROUNDS, TAG_LEN,
};
