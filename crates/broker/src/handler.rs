//! Asynchronous delivery adapter: one inbound broker message in, at most one
//! outbound publication event out.
//!
//! Processing is fail-fast and local to each message. Rejections never abort
//! the consumer loop, and nothing is retried here.

use crate::{
    Message, MessageProducer, MESSAGE_TIMESTAMP_HEADER, ORIGIN_SYSTEM_ID_HEADER, REQUEST_ID_HEADER,
};
use video_mapper::{MapError, MappedEvent, RequestContext, VideoMapper};

/// Handles inbound broker messages: filters by origin, maps, and forwards
/// the result to the outbound topic with the inbound headers carried over
/// verbatim.
pub struct MessageHandler<P: MessageProducer> {
    mapper: VideoMapper,
    producer: P,
    expected_origin: String,
}

impl<P: MessageProducer> MessageHandler<P> {
    /// Create a handler forwarding mapped events through the given producer.
    pub fn new(mapper: VideoMapper, producer: P, expected_origin: impl Into<String>) -> Self {
        Self {
            mapper,
            producer,
            expected_origin: expected_origin.into(),
        }
    }

    /// Process one inbound message.
    ///
    /// Messages not tagged with the expected origin are dropped silently.
    /// Mapping failures are logged and dropped; delivery failures are logged.
    /// In every case the caller's loop carries on.
    pub fn handle(&self, message: &Message) {
        if message.header(ORIGIN_SYSTEM_ID_HEADER) != Some(self.expected_origin.as_str()) {
            tracing::debug!("ignoring message from unexpected origin");
            return;
        }

        let mapped = match self.map_message(message) {
            Ok(mapped) => mapped,
            Err(error) => {
                tracing::warn!(%error, "mapping error, skipping message");
                return;
            }
        };

        tracing::info!(uuid = %mapped.uuid, "sending mapped video event");
        let outbound = Message {
            headers: message.headers.clone(),
            body: mapped.body,
        };
        if let Err(error) = self.producer.send(&mapped.uuid, outbound) {
            tracing::error!(uuid = %mapped.uuid, %error, "failed to forward mapped event");
        }
    }

    /// Validate the metadata headers and map the message body.
    fn map_message(&self, message: &Message) -> Result<MappedEvent, MapError> {
        let publish_reference = message
            .header(REQUEST_ID_HEADER)
            .ok_or_else(|| MapError::missing_header(REQUEST_ID_HEADER))?;
        let last_modified = message
            .header(MESSAGE_TIMESTAMP_HEADER)
            .ok_or_else(|| MapError::missing_header(MESSAGE_TIMESTAMP_HEADER))?;
        let context = RequestContext::new(publish_reference, last_modified);
        self.mapper.map_json(&message.body, &context)
    }
}
