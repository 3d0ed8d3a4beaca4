//! Consumer listen loop with cooperative shutdown.
//!
//! One logical processing stream: messages are handled one at a time, in
//! delivery order, with no internal parallelism. Poll errors are logged and
//! retried after a backoff; they never abort the loop.

use crate::handler::MessageHandler;
use crate::{MessageConsumer, MessageProducer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Pause between polls that return no messages.
const IDLE_BACKOFF: Duration = Duration::from_millis(200);
/// Pause after a failed poll before trying again.
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Cooperative shutdown flag shared between the listen loop and the process
/// entry point.
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    /// Create an untriggered shutdown flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the listen loop to stop after the in-flight batch.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Poll the consumer until shutdown is triggered, handing each message to
/// the delivery adapter.
///
/// The in-flight batch is always finished before the loop returns; the core
/// holds no resources across calls, so no further cleanup happens here.
pub fn run<C, P>(mut consumer: C, handler: &MessageHandler<P>, shutdown: &Shutdown)
where
    C: MessageConsumer,
    P: MessageProducer,
{
    tracing::info!("starting queue consumer");
    while !shutdown.is_triggered() {
        match consumer.poll() {
            Ok(messages) => {
                if messages.is_empty() {
                    std::thread::sleep(IDLE_BACKOFF);
                    continue;
                }
                for message in &messages {
                    handler.handle(message);
                }
            }
            Err(error) => {
                tracing::error!(%error, "failed to poll the queue, backing off");
                std::thread::sleep(ERROR_BACKOFF);
            }
        }
    }
    tracing::info!("queue consumer stopped");
}
