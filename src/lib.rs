//! HTTP to NATS gateway library.
//!
//! Accepts HTTP POST requests and forwards their bodies onto a NATS
//! message bus, either fire-and-forget (`/topics/{topic}`) or waiting for a
//! single reply (`/requests/{topic}`).

// Core request translation
pub mod dispatch;
pub mod http;
pub mod payload;

// Bus capability
pub mod bus;

// Alternate process mode
pub mod diagnostic;

// Cross-cutting concerns
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use bus::{MessageBus, MockBus, NatsBus};
pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
