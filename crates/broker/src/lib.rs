//! Broker-side glue for the video mapper.
//!
//! Defines the message model and the producer/consumer seams the core calls
//! into, plus the asynchronous delivery adapter and the listen loop. The
//! concrete broker collaborator is an HTTP proxy in front of Kafka; see
//! [`proxy`].

pub mod channel;
pub mod handler;
pub mod listener;
pub mod proxy;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// Re-export commonly used types
pub use channel::{ChannelProducer, ProducedRecord};
pub use handler::MessageHandler;
pub use listener::Shutdown;
pub use proxy::{ProxyConfig, ProxyConsumer, ProxyHealth, ProxyProducer};

/// Header identifying which upstream system produced a message.
pub const ORIGIN_SYSTEM_ID_HEADER: &str = "Origin-System-Id";

/// Header carrying the correlation id of a publish request.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Header carrying the last-modified timestamp of a publish request.
pub const MESSAGE_TIMESTAMP_HEADER: &str = "Message-Timestamp";

/// A broker message: string headers plus an opaque body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Message headers (origin marker, request id, timestamp, ...)
    pub headers: HashMap<String, String>,
    /// Raw message body
    pub body: String,
}

impl Message {
    /// Look up a header, treating empty values as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Errors that can occur while producing a message
#[derive(Debug, Error)]
pub enum ProducerError {
    /// The proxy could not be reached
    #[error("failed to reach the queue proxy: {0}")]
    Transport(String),
    /// The proxy rejected the request
    #[error("queue proxy returned status {status}")]
    Status { status: u16 },
    /// The receiving end of a channel producer is gone
    #[error("outbound channel closed")]
    ChannelClosed,
}

/// Errors that can occur while consuming messages
#[derive(Debug, Error)]
pub enum ConsumerError {
    /// The proxy could not be reached
    #[error("failed to reach the queue proxy: {0}")]
    Transport(String),
    /// The proxy rejected the request
    #[error("queue proxy returned status {status}")]
    Status { status: u16 },
    /// An inbound record could not be decoded
    #[error("failed to decode inbound records: {0}")]
    Decode(String),
}

/// Sends messages to the outbound topic, keyed by asset uuid.
pub trait MessageProducer: Send + Sync {
    /// Deliver one message. No retry is attempted here; retry policy belongs
    /// to the broker client behind the proxy.
    fn send(&self, key: &str, message: Message) -> Result<(), ProducerError>;
}

/// Pulls batches of messages from the inbound topic.
pub trait MessageConsumer: Send {
    /// Fetch the next batch, possibly empty.
    fn poll(&mut self) -> Result<Vec<Message>, ConsumerError>;
}

/// Reachability probe for the broker collaborator, backing the health
/// endpoints.
pub trait ConnectivityCheck: Send + Sync {
    /// Human-readable name of the checked collaborator.
    fn name(&self) -> &str;

    /// Ok when the collaborator is reachable, otherwise a description of
    /// what failed.
    fn check(&self) -> Result<(), String>;
}
