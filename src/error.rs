//! Error types and handling for Enode Bridge
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting. API-reported validation
//! failures are kept apart from transport failures so callers can surface the
//! vendor's human-readable message.

use thiserror::Error;

/// Result type alias for Enode Bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Main error type for Enode Bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Transport-level failures (connect, TLS, body read)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Non-success HTTP status other than a structured 400
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Structured 400 response reported by the Enode API
    #[error("API error: {title} - {detail}")]
    Api {
        kind: String,
        title: String,
        detail: String,
    },

    /// Authentication/authorization errors
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// Webhook authenticity failures
    #[error("Signature error: {message}")]
    Signature { message: String },

    /// Malformed webhook payloads
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Timeout errors
    #[error("Timeout error: {message}")]
    Timeout { message: String },

    /// The remote service refused to deliver a test event
    #[error("Webhook test failed: {message}")]
    WebhookTestFailed { message: String },

    /// A pending wait was superseded or dropped
    #[error("Cancelled: {message}")]
    Cancelled { message: String },

    /// Unknown entry, vehicle or flow
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl BridgeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        BridgeError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        BridgeError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        BridgeError::Io {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        BridgeError::Network {
            message: message.into(),
        }
    }

    /// Create a new HTTP status error
    pub fn http<S: Into<String>>(status: u16, message: S) -> Self {
        BridgeError::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a new structured API error
    pub fn api<K, T, D>(kind: K, title: T, detail: D) -> Self
    where
        K: Into<String>,
        T: Into<String>,
        D: Into<String>,
    {
        BridgeError::Api {
            kind: kind.into(),
            title: title.into(),
            detail: detail.into(),
        }
    }

    /// Create a new auth error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        BridgeError::Auth {
            message: message.into(),
        }
    }

    /// Create a new signature error
    pub fn signature<S: Into<String>>(message: S) -> Self {
        BridgeError::Signature {
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        BridgeError::Decode {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        BridgeError::Timeout {
            message: message.into(),
        }
    }

    /// Create a new webhook test failure
    pub fn webhook_test_failed<S: Into<String>>(message: S) -> Self {
        BridgeError::WebhookTestFailed {
            message: message.into(),
        }
    }

    /// Create a new cancellation error
    pub fn cancelled<S: Into<String>>(message: S) -> Self {
        BridgeError::Cancelled {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        BridgeError::NotFound {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        BridgeError::Generic {
            message: message.into(),
        }
    }

    /// Whether this error carries a vendor-provided title/detail pair
    pub fn is_api(&self) -> bool {
        matches!(self, BridgeError::Api { .. })
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for BridgeError {
    fn from(err: serde_yaml::Error) -> Self {
        BridgeError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return BridgeError::timeout(err.to_string());
        }
        match err.status() {
            Some(status) => BridgeError::http(status.as_u16(), err.to_string()),
            None => BridgeError::network(err.to_string()),
        }
    }
}

impl From<chrono::ParseError> for BridgeError {
    fn from(err: chrono::ParseError) -> Self {
        BridgeError::validation("datetime", err.to_string())
    }
}
