//! Transport abstraction
//!
//! Defines the trait every protocol implementation satisfies, and the result
//! value returned by `send`.
//!
//! # Contract
//!
//! - `connect` establishes whatever setup the transport needs and is the only
//!   operation allowed to fail with an `Err`.
//! - `send` and `receive` never return `Err` and never panic for ordinary
//!   transport failures: `send` reports failure inside [`SendOutcome`], and
//!   `receive` reports it as a [`Message`] with `action == "error"` and the
//!   cause under `metadata["error"]`.
//! - `disconnect` is infallible and safe to call at any time, including before
//!   a successful `connect` and repeatedly.

use crate::{Message, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Trait for protocol implementations
///
/// Calls are synchronous and run to completion on the caller's thread; a
/// transport may block for the duration of lock waits or I/O.
pub trait Transport: Send + std::fmt::Debug {
    /// Establish the transport's setup; fails on unreachable or misconfigured targets
    fn connect(&mut self) -> Result<()>;

    /// Transmit a message, reporting failure in the returned outcome
    fn send(&mut self, message: &Message) -> SendOutcome;

    /// Yield the next available message, or an error-shaped message when none is available
    fn receive(&mut self) -> Message;

    /// Release transport resources
    fn disconnect(&mut self);
}

/// Result of a `send` call
///
/// Serializes to the wire shapes `{"status": ..., ...}` on success and
/// `{"error": ...}` on failure, so at least one of the two keys is always
/// present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SendOutcome {
    /// The transport accepted the message
    Delivered {
        /// Success tag, e.g. `"sent"` or `"file_written"`
        status: String,

        /// Path of the written mailbox file, for filesystem delivery
        #[serde(skip_serializing_if = "Option::is_none")]
        file_path: Option<PathBuf>,

        /// Response body returned by the remote end, where one exists
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<serde_json::Value>,
    },

    /// The transport could not deliver the message
    Failed {
        /// Human-readable failure description
        error: String,
    },
}

impl SendOutcome {
    /// Plain success with status `"sent"`
    pub fn sent() -> Self {
        Self::Delivered {
            status: "sent".to_string(),
            file_path: None,
            body: None,
        }
    }

    /// Success with status `"sent"` and a response body from the remote end
    pub fn sent_with_body(body: serde_json::Value) -> Self {
        Self::Delivered {
            status: "sent".to_string(),
            file_path: None,
            body: Some(body),
        }
    }

    /// Success with status `"file_written"` and the path of the mailbox file
    pub fn file_written(path: impl Into<PathBuf>) -> Self {
        Self::Delivered {
            status: "file_written".to_string(),
            file_path: Some(path.into()),
            body: None,
        }
    }

    /// Failure with a human-readable cause
    pub fn failed(error: impl ToString) -> Self {
        Self::Failed {
            error: error.to_string(),
        }
    }

    /// Whether the send succeeded
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// The success tag, when delivered
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Delivered { status, .. } => Some(status),
            Self::Failed { .. } => None,
        }
    }

    /// The failure description, when failed
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Delivered { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }

    /// The written file path, for filesystem delivery
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::Delivered { file_path, .. } => file_path.as_deref(),
            Self::Failed { .. } => None,
        }
    }
}
