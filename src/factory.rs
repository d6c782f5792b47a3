//! Transport factory
//!
//! Maps a protocol tag to a constructor and instantiates the selected transport.
//! The full configuration is forwarded as-is; each transport extracts only the
//! keys it needs and ignores the rest.

use crate::detect::{detect, Protocol};
use crate::protocols::{GraphQlTransport, MailboxTransport, RestTransport, WebSocketTransport};
use crate::{Config, ConnectivaError, Result, Transport};
use tracing::{debug, info};

/// Build the transport selected by the configuration
///
/// An explicit `protocol` config key overrides endpoint detection; otherwise
/// the tag comes from [`detect`]. Tags with no registered constructor (Broker,
/// Kafka, gRPC) fail with
/// [`ConnectivaError::UnsupportedProtocol`].
pub fn build(config: &Config) -> Result<Box<dyn Transport>> {
    let protocol = match &config.protocol {
        Some(tag) => tag
            .parse::<Protocol>()
            .map_err(|e| ConnectivaError::Config(e.to_string()))?,
        None => detect(&config.endpoint),
    };
    info!(%protocol, endpoint = %config.endpoint, "detected protocol");

    construct(protocol, config)
}

/// The constructor table, one arm per protocol tag
fn construct(protocol: Protocol, config: &Config) -> Result<Box<dyn Transport>> {
    debug!(%protocol, "constructing transport");
    match protocol {
        Protocol::Rest => Ok(Box::new(RestTransport::new(config))),
        Protocol::File => Ok(Box::new(MailboxTransport::new(config))),
        Protocol::WebSocket => Ok(Box::new(WebSocketTransport::new(config))),
        Protocol::GraphQl => Ok(Box::new(GraphQlTransport::new(config))),
        Protocol::Grpc | Protocol::Broker | Protocol::Kafka => {
            Err(ConnectivaError::UnsupportedProtocol(protocol.to_string()))
        }
    }
}
