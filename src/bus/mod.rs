//! Message bus capability.
//!
//! # Data Flow
//! ```text
//! Dispatch operation (publish / request)
//!     → MessageBus trait object (shared via Arc)
//!     → nats.rs (async-nats client)  |  mock.rs (in-memory, tests)
//!
//! Diagnostic mode:
//!     subscribe(topic) → Subscription stream → BusMessage
//! ```
//!
//! # Design Decisions
//! - The gateway never owns connection policy (reconnects, TLS, auth);
//!   that stays inside the client behind this trait
//! - Implementations must be safe for concurrent use; no locking above this layer
//! - Payloads are `Bytes` so forwarding never copies

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

pub mod mock;
pub mod nats;

pub use mock::{MockBus, ReplyMode};
pub use nats::NatsBus;

/// Result type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;

/// Errors reported by the bus capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    #[error("not connected to message bus")]
    NotConnected,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out after {}ms waiting for reply", .0.as_millis())]
    Timeout(Duration),

    #[error("no responders on topic {0}")]
    NoResponders(String),

    #[error("subscribe failed: {0}")]
    Subscribe(String),
}

impl BusError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BusError::NotConnected => "not_connected",
            BusError::Connection(_) => "connection",
            BusError::Publish(_) => "publish",
            BusError::Request(_) => "request",
            BusError::Timeout(_) => "timeout",
            BusError::NoResponders(_) => "no_responders",
            BusError::Subscribe(_) => "subscribe",
        }
    }
}

/// A message delivered to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    /// Subject the message was published on.
    pub subject: String,
    /// Reply address, present for request/reply traffic.
    pub reply: Option<String>,
    pub payload: Bytes,
}

/// Stream of messages for one subscription. Dropping it unsubscribes.
pub type Subscription = BoxStream<'static, BusMessage>;

/// Publish / request / subscribe capability of the message bus.
///
/// Implementations:
/// - `NatsBus`: NATS via `async-nats`
/// - `MockBus`: in-memory mock for testing
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Hand `payload` to the bus for delivery on `topic`.
    ///
    /// Returns once the client has accepted the message; no delivery
    /// confirmation is awaited.
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<()>;

    /// Publish `payload` with a reply address and wait for the first reply.
    ///
    /// Callers bound the wait; implementations may also enforce their own.
    async fn request(&self, topic: &str, payload: Bytes) -> Result<Bytes>;

    /// Subscribe to `topic`.
    async fn subscribe(&self, topic: &str) -> Result<Subscription>;

    /// Whether the underlying connection is currently usable.
    fn is_connected(&self) -> bool;
}
