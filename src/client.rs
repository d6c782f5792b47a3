//! Connectiva facade
//!
//! The top-level handle callers hold: construction runs detection and the
//! factory once, and the four transport operations forward to whichever
//! implementation was selected.

use crate::{factory, Config, Message, Result, SendOutcome, Transport};
use tracing::debug;

/// Uniform messaging client over a detected transport
///
/// # Example
///
/// ```no_run
/// use connectiva::{Config, Connectiva, Message};
/// use serde_json::json;
///
/// let config = Config::new("./mbox").with_prefix("msg_");
/// let mut client = Connectiva::new(config).unwrap();
/// client.connect().unwrap();
///
/// client.send(&Message::new("send", json!({"k": "v"})));
/// let received = client.receive();
/// assert_eq!(received.data, json!({"k": "v"}));
/// client.disconnect();
/// ```
#[derive(Debug)]
pub struct Connectiva {
    config: Config,
    transport: Box<dyn Transport>,
}

impl Connectiva {
    /// Detect the protocol for `config.endpoint` and build its transport
    ///
    /// Fails with a configuration error for unknown explicit tags and an
    /// unsupported-protocol error for tags without a constructor.
    pub fn new(config: Config) -> Result<Self> {
        let transport = factory::build(&config)?;
        Ok(Self { config, transport })
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Establish the selected transport's setup
    pub fn connect(&mut self) -> Result<()> {
        debug!(endpoint = %self.config.endpoint, "connecting");
        self.transport.connect()
    }

    /// Transmit a message; failures are reported in the outcome, never thrown
    pub fn send(&mut self, message: &Message) -> SendOutcome {
        debug!(action = %message.action, "sending message");
        self.transport.send(message)
    }

    /// Yield the next available message, or an error-shaped message
    pub fn receive(&mut self) -> Message {
        debug!(endpoint = %self.config.endpoint, "receiving message");
        self.transport.receive()
    }

    /// Release transport resources; safe to call at any time
    pub fn disconnect(&mut self) {
        debug!(endpoint = %self.config.endpoint, "disconnecting");
        self.transport.disconnect();
    }
}
