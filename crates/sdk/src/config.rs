//! Client configuration: explicit values with an environment fallback.
//!
//! Environment variables are read once, by [`ClientConfig::from_env`]. The
//! resulting value is immutable and handed to [`crate::BillingGateClient`];
//! nothing else in the SDK touches the process environment.

use std::fmt;
use std::time::Duration;

use common::{BillingGateError, Flow, Result};
use serde::Deserialize;

use crate::crypto::DEFAULT_SALT;

/// Prefix shared by every environment variable the SDK reads.
pub const ENV_PREFIX: &str = "BILLINGGATE";

/// Default total timeout applied to each API request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A secret string that never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Borrow the secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Raw shape of the `BILLINGGATE_*` variables.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvSettings {
    worker_url: Option<String>,
    encryption_key: Option<String>,
    api_key: Option<String>,
    salt: Option<String>,
    timeout_secs: Option<u64>,
}

/// Validated BillingGate client configuration.
///
/// The redirect flow needs `worker_url` + `encryption_key`; the API flow needs
/// `worker_url` + `api_key`. Those requirements are checked per operation, so
/// a configuration may carry only what its caller uses.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    worker_url: Option<String>,
    encryption_key: Option<SecretString>,
    api_key: Option<SecretString>,
    salt: Vec<u8>,
    timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            worker_url: None,
            encryption_key: None,
            api_key: None,
            salt: DEFAULT_SALT.to_vec(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// An empty configuration with the default salt and timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `BILLINGGATE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`BillingGateError::InvalidConfig`] if a variable cannot be
    /// parsed or a value is out of range.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration from an explicit variable map, e.g.
    /// `{"BILLINGGATE_WORKER_URL": "https://pay.example.com"}`.
    ///
    /// Behaves like [`ClientConfig::from_env`] without reading the process
    /// environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::load(config::Environment::with_prefix(ENV_PREFIX).source(Some(map)))
    }

    fn load(source: config::Environment) -> Result<Self> {
        let settings: EnvSettings = config::Config::builder()
            .add_source(source)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| BillingGateError::InvalidConfig(e.to_string()))?;

        let mut cfg = Self::new();
        if let Some(url) = settings.worker_url {
            cfg = cfg.with_worker_url(url);
        }
        if let Some(key) = settings.encryption_key {
            cfg = cfg.with_encryption_key(key);
        }
        if let Some(key) = settings.api_key {
            cfg = cfg.with_api_key(key);
        }
        if let Some(salt) = settings.salt.filter(|s| !s.is_empty()) {
            cfg = cfg.with_salt(salt.into_bytes());
        }
        if let Some(secs) = settings.timeout_secs {
            cfg = cfg.with_timeout(Duration::from_secs(secs));
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Set the worker base URL. Trailing slashes are stripped.
    ///
    /// Blank values are ignored so an unset argument keeps the environment value.
    pub fn with_worker_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if let Some(url) = non_blank(url.trim_end_matches('/').to_owned()) {
            self.worker_url = Some(url);
        }
        self
    }

    /// Set the redirect-flow secret. Blank values are ignored.
    pub fn with_encryption_key(mut self, key: impl Into<String>) -> Self {
        if let Some(key) = non_blank(key.into()) {
            self.encryption_key = Some(SecretString(key));
        }
        self
    }

    /// Set the API-flow bearer token. Blank values are ignored.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        if let Some(key) = non_blank(key.into()) {
            self.api_key = Some(SecretString(key));
        }
        self
    }

    /// Set the key-derivation salt. Must equal the worker's salt.
    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Set the total per-request timeout for API calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check value ranges that do not depend on the flow.
    ///
    /// # Errors
    ///
    /// Returns [`BillingGateError::InvalidConfig`] for an empty salt or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        if self.salt.is_empty() {
            return Err(BillingGateError::InvalidConfig(
                "salt must not be empty".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(BillingGateError::InvalidConfig(format!(
                "{ENV_PREFIX}_TIMEOUT_SECS must be > 0"
            )));
        }
        Ok(())
    }

    /// Worker base URL without trailing slashes, if set.
    pub fn worker_url(&self) -> Option<&str> {
        self.worker_url.as_deref()
    }

    /// Key-derivation salt.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Total per-request timeout for API calls.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn has_encryption_key(&self) -> bool {
        self.encryption_key.is_some()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The redirect-flow secret, on its own.
    ///
    /// Enough to open tokens; sealing a redirect URL also needs the worker URL
    /// (see [`ClientConfig::redirect_credentials`]).
    ///
    /// # Errors
    ///
    /// Returns [`BillingGateError::Configuration`] for `encryption_key`.
    pub fn encryption_key(&self) -> Result<&SecretString> {
        self.encryption_key
            .as_ref()
            .ok_or_else(|| BillingGateError::missing("encryption_key", Flow::Redirect))
    }

    /// Worker URL and encryption key for the redirect flow.
    ///
    /// The key is checked first, then the URL.
    ///
    /// # Errors
    ///
    /// Returns [`BillingGateError::Configuration`] naming the missing field.
    pub fn redirect_credentials(&self) -> Result<(&str, &SecretString)> {
        let key = self.encryption_key()?;
        let url = self
            .worker_url()
            .ok_or_else(|| BillingGateError::missing("worker_url", Flow::Redirect))?;
        Ok((url, key))
    }

    /// Worker URL and API key for an API-flow operation.
    ///
    /// The key is checked first, then the URL.
    ///
    /// # Errors
    ///
    /// Returns [`BillingGateError::Configuration`] naming the missing field.
    pub fn api_credentials(&self, flow: Flow) -> Result<(&str, &SecretString)> {
        let key = self
            .api_key
            .as_ref()
            .ok_or_else(|| BillingGateError::missing("api_key", flow))?;
        let url = self
            .worker_url()
            .ok_or_else(|| BillingGateError::missing("worker_url", flow))?;
        Ok((url, key))
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
