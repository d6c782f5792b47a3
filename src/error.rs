//! Error types for Connectiva
//!
//! Defines a comprehensive error enum covering all failure modes across the system.
//! Uses thiserror for ergonomic error handling.
//!
//! Only setup-time failures (construction, `connect`) surface as `Err` to callers.
//! Per-call `send`/`receive` failures are captured at the transport boundary and
//! reported through [`SendOutcome`](crate::SendOutcome) or an error-shaped
//! [`Message`](crate::Message) instead.

use thiserror::Error;

/// Result type alias for Connectiva operations
pub type Result<T> = std::result::Result<T, ConnectivaError>;

/// Comprehensive error type for Connectiva operations
#[derive(Error, Debug)]
pub enum ConnectivaError {
    /// Configuration errors (bad or missing settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A protocol tag with no registered transport constructor
    #[error("Unsupported communication protocol: {0}")]
    UnsupportedProtocol(String),

    /// Setup-time connection failures (unreachable or misconfigured targets)
    #[error("Connection error: {0}")]
    Connection(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket errors
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<tungstenite::Error>),
}

impl From<tungstenite::Error> for ConnectivaError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}
