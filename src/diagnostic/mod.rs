//! Diagnostic (test) mode.
//!
//! An alternate process mode that subscribes to one topic and logs what
//! arrives, acknowledging request/reply traffic with a canned body. Used to
//! check connectivity without a real consumer. Never runs alongside the
//! HTTP server.

pub mod subscriber;

pub use subscriber::{DiagnosticExit, DiagnosticSubscriber};
