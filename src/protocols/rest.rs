//! REST transport
//!
//! Thin adapter over a blocking HTTP client: `send` POSTs the message envelope
//! to `<endpoint>/endpoint`, `receive` GETs the same URL and wraps the response
//! body. Transport failures are reported through the returned values, matching
//! the crate-wide contract.

use crate::{Config, Message, Result, SendOutcome, Transport};
use serde_json::Value;
use tracing::{debug, info, warn};

/// REST transport over a blocking HTTP client
#[derive(Debug)]
pub struct RestTransport {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RestTransport {
    /// Create a REST transport from configuration; reads only `endpoint`
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.endpoint.clone(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn message_url(&self) -> String {
        format!("{}/endpoint", self.base_url)
    }

    fn post_message(&self, message: &Message) -> Result<Value> {
        let response = self
            .client
            .post(self.message_url())
            .json(message)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    fn get_message(&self) -> Result<Value> {
        let response = self.client.get(self.message_url()).send()?.error_for_status()?;
        Ok(response.json()?)
    }
}

impl Transport for RestTransport {
    fn connect(&mut self) -> Result<()> {
        info!(url = %self.base_url, "using REST endpoint");
        Ok(())
    }

    fn send(&mut self, message: &Message) -> SendOutcome {
        debug!(url = %self.message_url(), "posting message");
        match self.post_message(message) {
            Ok(body) => SendOutcome::sent_with_body(body),
            Err(e) => {
                warn!(url = %self.base_url, error = %e, "failed to send message");
                SendOutcome::failed(e)
            }
        }
    }

    fn receive(&mut self) -> Message {
        debug!(url = %self.message_url(), "requesting message");
        match self.get_message() {
            Ok(body) => Message::new("receive", body),
            Err(e) => {
                warn!(url = %self.base_url, error = %e, "failed to receive message");
                Message::error(e.to_string())
            }
        }
    }

    fn disconnect(&mut self) {
        debug!(url = %self.base_url, "leaving REST endpoint");
    }
}
