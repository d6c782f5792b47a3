//! Protocol implementations
//!
//! Each submodule adapts one wire protocol to the [`Transport`](crate::Transport)
//! contract. The mailbox is the engineered core; the network adapters are thin
//! wrappers around their client libraries.
//!
//! Broker (AMQP/MQTT), Kafka, and gRPC tags are detected but have no transport
//! here; the factory reports them as unsupported.

mod graphql;
mod mailbox;
mod rest;
mod websocket;

pub use graphql::GraphQlTransport;
pub use mailbox::MailboxTransport;
pub use rest::RestTransport;
pub use websocket::WebSocketTransport;
