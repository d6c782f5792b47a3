//! Message envelope shared by every transport
//!
//! A [`Message`] is the one payload shape that crosses the transport boundary in
//! both directions. On the wire it is a JSON object with exactly the keys
//! `action`, `data`, and `metadata`.
//!
//! # Conventions
//!
//! - `action` is a short intent tag: `"send"`, `"receive"`, `"error"`, or any
//!   caller-defined value.
//! - `data` carries an arbitrary JSON payload.
//! - `metadata` carries out-of-band information; transports that fail to produce
//!   a message return `action == "error"` with the cause under `metadata["error"]`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which error descriptions are reported in [`Message::metadata`]
pub const ERROR_KEY: &str = "error";

/// Metadata value returned by `receive` when a queue has nothing pending
pub const NO_MESSAGE_FOUND: &str = "No message found";

/// The payload envelope exchanged by all transports
///
/// Equality is structural: two messages are equal when all three fields are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Intent tag describing what the message is for
    pub action: String,

    /// Arbitrary JSON payload
    pub data: Value,

    /// Out-of-band key/value information; never null, only possibly empty
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Message {
    /// Create a message with empty metadata
    pub fn new(action: impl Into<String>, data: Value) -> Self {
        Self {
            action: action.into(),
            data,
            metadata: Map::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Create the error-shaped message transports return instead of failing
    ///
    /// Shape: `{action: "error", data: {}, metadata: {error: <reason>}}`.
    pub fn error(reason: impl Into<String>) -> Self {
        Self::new("error", Value::Object(Map::new()))
            .with_metadata(ERROR_KEY, Value::String(reason.into()))
    }

    /// The error-shaped message signalling an empty queue
    pub fn no_message_found() -> Self {
        Self::error(NO_MESSAGE_FOUND)
    }

    /// Whether this message reports a transport failure
    pub fn is_error(&self) -> bool {
        self.action == "error"
    }

    /// The human-readable failure cause, if this is an error message
    pub fn error_reason(&self) -> Option<&str> {
        self.metadata.get(ERROR_KEY).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let msg = Message::new("send", json!({"k": "v"}));
        let wire = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            wire,
            json!({"action": "send", "data": {"k": "v"}, "metadata": {}})
        );
    }

    #[test]
    fn test_metadata_defaults_to_empty() {
        // A body without the metadata key must still deserialize
        let msg: Message = serde_json::from_str(r#"{"action":"send","data":[1,2]}"#).unwrap();
        assert_eq!(msg.action, "send");
        assert!(msg.metadata.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let msg = Message::new("custom", json!({"nested": {"n": 1}}))
            .with_metadata("trace", json!("abc123"));
        let body = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&body).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_error_helper() {
        let msg = Message::error("No message found");
        assert!(msg.is_error());
        assert_eq!(msg.error_reason(), Some("No message found"));
        assert_eq!(msg.data, json!({}));
    }

    #[test]
    fn test_structural_equality() {
        let a = Message::new("send", json!(1));
        let b = Message::new("send", json!(1));
        let c = Message::new("send", json!(2));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
