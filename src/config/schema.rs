//! Configuration schema definitions.
//!
//! Everything here can come from the optional TOML file. Bus credentials
//! and the diagnostic topic are resolved separately (see `resolve.rs`).

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener settings.
    pub listener: ListenerConfig,

    /// Request body limits and validation.
    pub payload: PayloadConfig,

    /// Message bus client settings.
    pub bus: BusConfig,

    /// Diagnostic subscriber settings.
    pub diagnostic: DiagnosticConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Upper bound on the whole HTTP exchange in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Payload limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PayloadConfig {
    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,

    /// Require the body to be a single well-formed JSON document.
    pub validate_json: bool,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 8192,
            validate_json: true,
        }
    }
}

/// Message bus client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BusConfig {
    /// How long a request waits for its reply, in milliseconds.
    pub request_timeout_ms: u64,

    /// Connect over TLS.
    pub require_tls: bool,

    /// Client name reported to the server.
    pub client_name: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 4000,
            require_tls: true,
            client_name: "nats-gateway".to_string(),
        }
    }
}

/// Diagnostic subscriber configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnosticConfig {
    /// Body published back to the reply address of received messages.
    pub ack_body: String,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            ack_body: r#"{"status":"received"}"#.to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
