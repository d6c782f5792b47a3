//! Connectiva - Uniform messaging facade with a filesystem-backed mailbox
//!
//! Connectiva presents one communication contract (`connect`, `send`,
//! `receive`, `disconnect`) over several wire protocols, selecting an
//! implementation by inspecting an endpoint string. Its engineered core is the
//! directory mailbox: a plain directory turned into a durable
//! multi-producer/multi-consumer message queue using file creation, exclusive
//! locks, and atomic renames, with no external broker.
//!
//! # Architecture
//!
//! - **message**: the [`Message`] envelope every transport exchanges
//! - **transport**: the [`Transport`] trait and [`SendOutcome`] result value
//! - **detect**: endpoint classification into a [`Protocol`] tag
//! - **factory**: tag-to-constructor dispatch
//! - **protocols**: the mailbox engine plus REST, GraphQL, and WebSocket adapters
//! - **client**: the [`Connectiva`] facade forwarding the four operations
//! - **error** / **logging**: thiserror taxonomy and tracing setup helpers
//!
//! # Example
//!
//! ```no_run
//! use connectiva::{Config, Connectiva, Message};
//! use serde_json::json;
//!
//! let mut client = Connectiva::new(Config::new("./mbox")).unwrap();
//! client.connect().unwrap();
//! let outcome = client.send(&Message::new("send", json!({"k": "v"})));
//! assert_eq!(outcome.status(), Some("file_written"));
//! ```

pub mod client;
pub mod config;
pub mod detect;
pub mod error;
pub mod factory;
pub mod logging;
pub mod message;
pub mod protocols;
pub mod transport;

// Re-exports
pub use client::Connectiva;
pub use config::Config;
pub use detect::{detect, Protocol};
pub use error::{ConnectivaError, Result};
pub use message::Message;
pub use transport::{SendOutcome, Transport};
