//! Channel-backed producer for tests and local wiring.

use crate::{Message, MessageProducer, ProducerError};
use tokio::sync::mpsc;

/// A record captured by a [`ChannelProducer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducedRecord {
    /// Outbound message key (the asset uuid)
    pub key: String,
    /// The produced message
    pub message: Message,
}

/// Producer that forwards records to an in-process channel instead of the
/// queue proxy. Lets tests observe exactly what would have been produced.
#[derive(Debug, Clone)]
pub struct ChannelProducer {
    sender: mpsc::UnboundedSender<ProducedRecord>,
}

impl ChannelProducer {
    /// Create a producer and the receiver observing its output.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProducedRecord>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl MessageProducer for ChannelProducer {
    fn send(&self, key: &str, message: Message) -> Result<(), ProducerError> {
        self.sender
            .send(ProducedRecord {
                key: key.to_string(),
                message,
            })
            .map_err(|_| ProducerError::ChannelClosed)
    }
}
