//! Error taxonomy shared by every BillingGate crate.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the SDK.
pub type Result<T> = std::result::Result<T, BillingGateError>;

/// The operation whose configuration requirements were not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Encrypted redirect URL generation.
    Redirect,
    /// `POST /api/payment`.
    Payment,
    /// `GET /api/verify`.
    Verification,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Flow::Redirect => "redirect flow",
            Flow::Payment => "API flow",
            Flow::Verification => "verification",
        })
    }
}

/// Top-level SDK error type.
///
/// The set is closed so callers can branch on the kind of failure:
/// - [`BillingGateError::Configuration`] is raised before any I/O or crypto.
/// - [`BillingGateError::Transport`] carries the status and raw body of a non-2xx response.
/// - [`BillingGateError::Network`] wraps any other transport failure with its cause.
#[derive(Debug, Error)]
pub enum BillingGateError {
    /// A secret or URL required by the requested flow is missing.
    #[error("{field} is required for {flow}")]
    Configuration {
        /// Name of the missing setting (e.g. `"api_key"`).
        field: &'static str,
        /// Operation that needed it.
        flow: Flow,
    },

    /// Client settings could not be loaded or are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The payment payload failed model validation.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The worker answered with a non-success HTTP status.
    #[error("worker returned {status}: {body}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// Serialisation, token encoding, or response-shape failure.
    #[error("encoding error: {message}")]
    Encoding {
        /// Description of what could not be encoded or decoded.
        message: String,
        /// Underlying cause, when there is one.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    /// Any other failure talking to the worker (connect, timeout, body read).
    #[error("{context}: {source}")]
    Network {
        /// What the client was doing when the failure happened.
        context: String,
        /// Underlying cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl BillingGateError {
    /// Shorthand for a [`BillingGateError::Configuration`] error.
    pub fn missing(field: &'static str, flow: Flow) -> Self {
        Self::Configuration { field, flow }
    }

    /// Wrap an arbitrary error as a [`BillingGateError::Network`] failure.
    pub fn network<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// An [`BillingGateError::Encoding`] failure with no underlying error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
            source: None,
        }
    }

    /// An [`BillingGateError::Encoding`] failure caused by `source`.
    ///
    /// The message is `"{context}: {source}"`; the cause stays reachable via
    /// [`std::error::Error::source`].
    pub fn encoding_with<E>(context: impl std::fmt::Display, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Encoding {
            message: format!("{context}: {source}"),
            source: Some(Box::new(source)),
        }
    }

    /// Returns `true` for configuration errors, missing or malformed.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::InvalidConfig(_))
    }

    /// HTTP status of a [`BillingGateError::Transport`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BillingGateError {
    fn from(e: serde_json::Error) -> Self {
        Self::encoding_with("json", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn configuration_message_names_field_and_flow() {
        let e = BillingGateError::missing("encryption_key", Flow::Redirect);
        assert!(e.is_configuration());
        assert_eq!(e.to_string(), "encryption_key is required for redirect flow");
    }

    #[test]
    fn transport_exposes_status_and_body() {
        let e = BillingGateError::Transport {
            status: 404,
            body: "transaction not found".into(),
        };
        assert_eq!(e.status(), Some(404));
        assert!(e.to_string().contains("transaction not found"));
        assert!(!e.is_configuration());
    }

    #[test]
    fn network_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let e = BillingGateError::network("payment creation failed", io);
        assert!(e.to_string().starts_with("payment creation failed"));
        assert!(e.source().is_some());
        assert_eq!(e.status(), None);
    }

    #[test]
    fn json_failure_keeps_cause_as_source() {
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = BillingGateError::from(json);
        assert!(matches!(e, BillingGateError::Encoding { .. }));
        assert!(e.to_string().starts_with("encoding error: json: "));
        let source = e.source().unwrap();
        assert!(source.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn shape_failure_has_no_source() {
        let e = BillingGateError::encoding("unexpected verify response: 42");
        assert_eq!(e.to_string(), "encoding error: unexpected verify response: 42");
        assert!(e.source().is_none());
    }
}
