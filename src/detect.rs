//! Protocol detection
//!
//! Classifies an endpoint string into a protocol tag. Matching is deliberately
//! cheap: case-sensitive scheme prefixes checked in table order, then a
//! filesystem probe, then an environment override, then the default. No full
//! URL parsing happens here; an endpoint must literally start with a scheme
//! string to match it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Environment variable consulted when neither a scheme nor a path matches
pub const PREFERRED_PROTOCOL_VAR: &str = "PREFERRED_PROTOCOL";

/// Scheme-prefix table; first match wins
const SCHEME_TABLE: &[(&str, Protocol)] = &[
    ("http://", Protocol::Rest),
    ("https://", Protocol::Rest),
    ("grpc://", Protocol::Grpc),
    ("amqp://", Protocol::Broker),
    ("mqtt://", Protocol::Broker),
    ("kafka://", Protocol::Kafka),
    ("ws://", Protocol::WebSocket),
    ("wss://", Protocol::WebSocket),
    ("graphql://", Protocol::GraphQl),
];

/// Protocol tags the detector can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// HTTP request/response endpoints
    Rest,
    /// gRPC services
    Grpc,
    /// Message brokers speaking AMQP or MQTT
    Broker,
    /// Kafka clusters
    Kafka,
    /// The filesystem-backed mailbox
    File,
    /// WebSocket endpoints
    WebSocket,
    /// GraphQL endpoints
    GraphQl,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Rest => "REST",
            Self::Grpc => "GRPC",
            Self::Broker => "Broker",
            Self::Kafka => "Kafka",
            Self::File => "File",
            Self::WebSocket => "WebSocket",
            Self::GraphQl => "GraphQL",
        };
        f.write_str(tag)
    }
}

impl FromStr for Protocol {
    type Err = UnknownProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rest" => Ok(Self::Rest),
            "grpc" => Ok(Self::Grpc),
            "broker" => Ok(Self::Broker),
            "kafka" => Ok(Self::Kafka),
            "file" => Ok(Self::File),
            "websocket" => Ok(Self::WebSocket),
            "graphql" => Ok(Self::GraphQl),
            _ => Err(UnknownProtocol(s.to_string())),
        }
    }
}

/// A protocol tag string that names no known protocol
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown protocol tag: {0}")]
pub struct UnknownProtocol(pub String);

/// Detect the communication protocol for an endpoint
///
/// Policy, first match wins:
/// 1. scheme-prefix table (`http://`, `grpc://`, `amqp://`/`mqtt://`,
///    `kafka://`, `ws://`/`wss://`, `graphql://`);
/// 2. the endpoint names an existing filesystem path → [`Protocol::File`];
/// 3. the `PREFERRED_PROTOCOL` environment variable, when it parses to a known
///    tag (unrecognized values are ignored);
/// 4. [`Protocol::Rest`] as the default.
pub fn detect(endpoint: &str) -> Protocol {
    for (scheme, protocol) in SCHEME_TABLE {
        if endpoint.starts_with(scheme) {
            return *protocol;
        }
    }

    if Path::new(endpoint).exists() {
        return Protocol::File;
    }

    if let Ok(preferred) = std::env::var(PREFERRED_PROTOCOL_VAR) {
        match preferred.parse::<Protocol>() {
            Ok(protocol) => return protocol,
            Err(_) => {
                debug!(value = %preferred, "ignoring unrecognized {}", PREFERRED_PROTOCOL_VAR);
            }
        }
    }

    Protocol::Rest
}
