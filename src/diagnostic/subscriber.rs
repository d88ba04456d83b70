//! Logging / acknowledging subscriber.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::StreamExt;

use crate::bus::{BusError, BusMessage, MessageBus};
use crate::observability::metrics;

/// Why the subscriber stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosticExit {
    #[error("signal received: interrupt")]
    Interrupted,

    #[error("subscription closed by the message bus")]
    SubscriptionClosed,
}

pub struct DiagnosticSubscriber {
    bus: Arc<dyn MessageBus>,
    topic: String,
    ack_body: Bytes,
}

impl DiagnosticSubscriber {
    pub fn new(bus: Arc<dyn MessageBus>, topic: impl Into<String>, ack_body: impl Into<Bytes>) -> Self {
        Self {
            bus,
            topic: topic.into(),
            ack_body: ack_body.into(),
        }
    }

    /// Consume messages until `interrupt` resolves or the subscription ends.
    ///
    /// Only a failure to subscribe is an error; acknowledgment failures are
    /// logged and the subscription keeps going.
    pub async fn run<F>(&self, interrupt: F) -> Result<DiagnosticExit, BusError>
    where
        F: Future<Output = ()>,
    {
        let mut subscription = self.bus.subscribe(&self.topic).await?;
        tracing::info!(topic = %self.topic, "Running in test mode, subscribed to topic");

        tokio::pin!(interrupt);
        loop {
            tokio::select! {
                _ = &mut interrupt => {
                    tracing::info!(topic = %self.topic, "Interrupt received, leaving test mode");
                    return Ok(DiagnosticExit::Interrupted);
                }
                next = subscription.next() => match next {
                    Some(message) => self.handle(message).await,
                    None => {
                        tracing::warn!(topic = %self.topic, "Subscription closed");
                        return Ok(DiagnosticExit::SubscriptionClosed);
                    }
                },
            }
        }
    }

    async fn handle(&self, message: BusMessage) {
        metrics::record_diagnostic_message();
        tracing::info!(
            subject = %message.subject,
            reply = message.reply.as_deref().unwrap_or("-"),
            payload = %String::from_utf8_lossy(&message.payload),
            "Received message"
        );

        if let Some(reply) = message.reply {
            if let Err(e) = self.bus.publish(&reply, self.ack_body.clone()).await {
                tracing::warn!(reply = %reply, error = %e, "Failed to acknowledge message");
            }
        }
    }
}
