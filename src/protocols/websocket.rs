//! WebSocket client transport
//!
//! Dials the endpoint on `connect` and exchanges the message envelope as text
//! frames. `send` and `receive` on a transport that never connected report the
//! failure through their return values, like every other transport here.

use crate::{Config, ConnectivaError, Message, Result, SendOutcome, Transport};
use std::net::TcpStream;
use tracing::{debug, info, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::WebSocket;

/// WebSocket client transport
#[derive(Debug)]
pub struct WebSocketTransport {
    endpoint: String,
    socket: Option<WebSocket<MaybeTlsStream<TcpStream>>>,
}

impl WebSocketTransport {
    /// Create a WebSocket transport from configuration; reads only `endpoint`
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            socket: None,
        }
    }

    fn send_frame(&mut self, message: &Message) -> Result<()> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| ConnectivaError::Connection("not connected".to_string()))?;
        let frame = serde_json::to_string(message)?;
        socket.send(tungstenite::Message::Text(frame))?;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Message> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| ConnectivaError::Connection("not connected".to_string()))?;

        // Skip control frames; only data frames carry a payload
        loop {
            let frame = socket.read()?;
            let payload = match frame {
                tungstenite::Message::Text(text) => serde_json::from_str(&text)?,
                tungstenite::Message::Binary(bytes) => serde_json::from_slice(&bytes)?,
                _ => continue,
            };
            return Ok(Message::new("receive", payload));
        }
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self) -> Result<()> {
        info!(endpoint = %self.endpoint, "connecting to WebSocket");
        let (socket, response) = tungstenite::connect(self.endpoint.as_str()).map_err(|e| {
            ConnectivaError::Connection(format!(
                "failed to connect to {}: {}",
                self.endpoint, e
            ))
        })?;
        debug!(status = %response.status(), "WebSocket handshake complete");
        self.socket = Some(socket);
        Ok(())
    }

    fn send(&mut self, message: &Message) -> SendOutcome {
        debug!(endpoint = %self.endpoint, "sending WebSocket frame");
        match self.send_frame(message) {
            Ok(()) => SendOutcome::sent(),
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "failed to send frame");
                SendOutcome::failed(e)
            }
        }
    }

    fn receive(&mut self) -> Message {
        debug!(endpoint = %self.endpoint, "waiting for WebSocket frame");
        match self.read_frame() {
            Ok(message) => message,
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "failed to receive frame");
                Message::error(e.to_string())
            }
        }
    }

    fn disconnect(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            debug!(endpoint = %self.endpoint, "closing WebSocket");
            let _ = socket.close(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operations_without_connect_report_failure_values() {
        let mut transport = WebSocketTransport::new(&Config::new("ws://localhost:8765"));

        let outcome = transport.send(&Message::new("send", json!({})));
        assert_eq!(outcome.error(), Some("Connection error: not connected"));

        let received = transport.receive();
        assert!(received.is_error());

        // Disconnect before any connect must not panic, repeatedly
        transport.disconnect();
        transport.disconnect();
    }

    #[test]
    fn test_connect_failure_is_a_connection_error() {
        let mut transport = WebSocketTransport::new(&Config::new("ws://127.0.0.1:1"));
        let err = transport.connect().unwrap_err();
        assert!(matches!(err, ConnectivaError::Connection(_)));
    }
}
