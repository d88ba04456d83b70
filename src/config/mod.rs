//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command-line flags ──┐
//! environment (NATS_*) ┴→ resolve.rs (ordered resolver chain per field)
//!                          → ConnectionSettings (endpoint, diagnostic topic)
//!
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; nothing reloads at runtime
//! - All file fields have defaults, so the file itself is optional
//! - Required connection fields fail startup when no resolver yields a value

pub mod loader;
pub mod resolve;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use resolve::{ConnectionSettings, EnvResolver, Field, FlagResolver, Resolver, ResolverChain};
pub use schema::{
    BusConfig, DiagnosticConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, PayloadConfig,
};
