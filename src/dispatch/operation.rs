//! Publish and request operations against the bus.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::timeout;

use crate::bus::{BusError, MessageBus};
use crate::dispatch::topic::Topic;

/// Which bus interaction a route performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Fire-and-forget.
    Publish,
    /// Publish and wait for one reply.
    Request,
}

impl Operation {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Publish => "publish",
            Operation::Request => "request",
        }
    }
}

/// Successful result of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Handed to the bus; nothing to return.
    Published,
    /// Reply body from the responder.
    Replied(Bytes),
}

/// Runs operations against a shared bus handle.
#[derive(Clone)]
pub struct Dispatcher {
    bus: Arc<dyn MessageBus>,
    request_timeout: Duration,
}

impl Dispatcher {
    pub fn new(bus: Arc<dyn MessageBus>, request_timeout: Duration) -> Self {
        Self {
            bus,
            request_timeout,
        }
    }

    pub fn bus(&self) -> &Arc<dyn MessageBus> {
        &self.bus
    }

    pub async fn dispatch(
        &self,
        operation: Operation,
        topic: &Topic,
        payload: Bytes,
    ) -> Result<Outcome, BusError> {
        match operation {
            Operation::Publish => self.publish(topic, payload).await,
            Operation::Request => self.request(topic, payload).await,
        }
    }

    /// Returns as soon as the bus client accepts the message.
    pub async fn publish(&self, topic: &Topic, payload: Bytes) -> Result<Outcome, BusError> {
        self.bus.publish(topic.as_str(), payload).await?;
        tracing::debug!(topic = %topic, "Published");
        Ok(Outcome::Published)
    }

    /// Waits for the first reply or the request timeout, whichever comes first.
    pub async fn request(&self, topic: &Topic, payload: Bytes) -> Result<Outcome, BusError> {
        match timeout(self.request_timeout, self.bus.request(topic.as_str(), payload)).await {
            Ok(Ok(reply)) => {
                tracing::debug!(topic = %topic, reply_bytes = reply.len(), "Reply received");
                Ok(Outcome::Replied(reply))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(BusError::Timeout(self.request_timeout)),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("request_timeout", &self.request_timeout)
            .field("connected", &self.bus.is_connected())
            .finish()
    }
}
