//! GraphQL transport
//!
//! Query-based adapter: `send` POSTs the message envelope (query in `data`) to
//! the endpoint. Unsolicited `receive` does not apply to GraphQL, so it returns
//! an empty `"receive"` message rather than an error.

use crate::{Config, Message, Result, SendOutcome, Transport};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// GraphQL transport over a blocking HTTP client
#[derive(Debug)]
pub struct GraphQlTransport {
    url: String,
    client: reqwest::blocking::Client,
}

impl GraphQlTransport {
    /// Create a GraphQL transport from configuration; reads only `endpoint`
    pub fn new(config: &Config) -> Self {
        Self {
            url: config.endpoint.clone(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn post_query(&self, message: &Message) -> Result<Value> {
        let response = self
            .client
            .post(&self.url)
            .json(message)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }
}

impl Transport for GraphQlTransport {
    fn connect(&mut self) -> Result<()> {
        info!(url = %self.url, "using GraphQL endpoint");
        Ok(())
    }

    fn send(&mut self, message: &Message) -> SendOutcome {
        debug!(url = %self.url, "sending GraphQL query");
        match self.post_query(message) {
            Ok(body) => SendOutcome::sent_with_body(body),
            Err(e) => {
                warn!(url = %self.url, error = %e, "failed to send query");
                SendOutcome::failed(e)
            }
        }
    }

    /// GraphQL is pull-by-query; there is no message stream to drain
    fn receive(&mut self) -> Message {
        debug!(url = %self.url, "receive is not applicable to GraphQL");
        Message::new("receive", json!({}))
    }

    fn disconnect(&mut self) {
        debug!(url = %self.url, "leaving GraphQL endpoint");
    }
}
