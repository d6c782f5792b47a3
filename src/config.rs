//! Transport configuration
//!
//! One explicit configuration struct is forwarded to whichever transport the
//! factory selects. Each transport reads only the keys it understands; unknown
//! keys are collected into [`Config::extra`] and ignored, never an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Configuration consumed by the factory, detector, and transports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint URL or identifier; drives protocol detection
    pub endpoint: String,

    /// Explicit protocol tag (e.g. `"File"`, `"REST"`); overrides detection when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Mailbox directory; defaults to the endpoint path, then the current directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Filename prefix for pending mailbox files (default `"msg_"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Filename prefix marking claimed mailbox files (default `"processed_"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_prefix: Option<String>,

    /// Keys not recognized by any transport; preserved but unused
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Config {
    /// Create a configuration for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Force a specific protocol tag, bypassing endpoint detection
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Set the mailbox directory
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Set the pending-file prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the claimed-file prefix
    pub fn with_processed_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.processed_prefix = Some(prefix.into());
        self
    }
}
