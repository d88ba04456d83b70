//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Parse flags → Load config file → Resolve connection settings
//!     → Connect to bus → Select mode (serve | diagnostic)
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl+C) → Stop the active mode
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and happens before serving
//! - Serve and diagnostic modes are mutually exclusive

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Mode, Startup, StartupArgs, StartupError};
