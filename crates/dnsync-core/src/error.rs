//! Error types for the reconciler
//!
//! This module defines all error types used throughout the crate.
//! Every failure surfaces as the terminal result of one run; nothing
//! is retried internally.

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the reconciler
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid caller-supplied input; aborts before any
    /// network call is made
    #[error("Configuration error: {0}")]
    Config(String),

    /// Public-IP lookup failed (transport error or non-200 status)
    #[error("IP lookup error: {0}")]
    IpLookup(String),

    /// A provider operation failed at the transport or API level
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// The provider's HTTP call succeeded but the response indicates
    /// logical failure (e.g. an empty record id in an add/update reply)
    #[error("Provider rejected operation ({provider}): code {code}")]
    Rejected {
        /// Provider name
        provider: String,
        /// Error code reported in the response envelope
        code: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an IP lookup error
    pub fn ip_lookup(msg: impl Into<String>) -> Self {
        Self::IpLookup(msg.into())
    }

    /// Create a provider-level error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a logical-rejection error
    pub fn rejected(provider: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Rejected {
            provider: provider.into(),
            code: code.into(),
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
