//! Startup orchestration.
//!
//! # Responsibilities
//! - Parse command-line flags
//! - Load and validate the optional config file
//! - Resolve bus credentials and the diagnostic topic (flag → env)
//! - Decide which process mode runs

use std::path::PathBuf;

use clap::Parser;

use crate::bus::BusError;
use crate::config::loader::load_or_default;
use crate::config::{
    ConfigError, ConnectionSettings, EnvResolver, Field, FlagResolver, GatewayConfig, ResolverChain,
};

/// Command-line flags. Connection fields fall back to `NATS_*` env vars.
#[derive(Parser, Debug, Default)]
#[command(name = "nats-gateway")]
#[command(about = "Forwards HTTP POST bodies onto a NATS message bus", long_about = None)]
pub struct StartupArgs {
    /// NATS username [env: NATS_USER]
    #[arg(long)]
    pub user: Option<String>,

    /// NATS password [env: NATS_PASS]
    #[arg(long)]
    pub pass: Option<String>,

    /// NATS server address [env: NATS_HOST]
    #[arg(long)]
    pub host: Option<String>,

    /// NATS server port [env: NATS_PORT]
    #[arg(long)]
    pub port: Option<String>,

    /// Subscribe to this topic instead of serving HTTP, for testing [env: NATS_TEST]
    #[arg(long)]
    pub test: Option<String>,

    /// Optional TOML file with listener, payload, bus and logging settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the HTTP bind address
    #[arg(long)]
    pub bind: Option<String>,
}

impl StartupArgs {
    /// Flag values as the first resolver in the chain.
    pub fn flags(&self) -> FlagResolver {
        FlagResolver::new()
            .with(Field::USER, self.user.clone())
            .with(Field::PASS, self.pass.clone())
            .with(Field::HOST, self.host.clone())
            .with(Field::PORT, self.port.clone())
            .with(Field::TEST, self.test.clone())
    }

    /// Flags first, then the process environment.
    pub fn resolver_chain(&self) -> ResolverChain {
        ResolverChain::new()
            .with(self.flags())
            .with(EnvResolver::from_process())
    }
}

/// Fatal errors before the gateway starts serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("error reading config: {0}")]
    Config(#[from] ConfigError),

    #[error("error connecting to server: {0}")]
    Connect(#[source] BusError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Which top-level mode the process runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Serve the HTTP routes.
    Serve,
    /// Subscribe to the topic and log / acknowledge what arrives.
    Diagnostic(String),
}

/// Everything resolved before connecting.
#[derive(Debug, Clone)]
pub struct Startup {
    pub config: GatewayConfig,
    pub connection: ConnectionSettings,
}

impl Startup {
    /// Load the config file (if any), apply flag overrides and resolve the
    /// connection settings through `chain`.
    pub fn prepare(args: &StartupArgs, chain: &ResolverChain) -> Result<Self, StartupError> {
        let mut config = load_or_default(args.config.as_deref())?;
        if let Some(bind) = &args.bind {
            config.listener.bind_address = bind.clone();
            crate::config::validation::validate_config(&config).map_err(ConfigError::Validation)?;
        }
        let connection = ConnectionSettings::resolve(chain)?;
        Ok(Self { config, connection })
    }

    pub fn mode(&self) -> Mode {
        match &self.connection.test_topic {
            Some(topic) => Mode::Diagnostic(topic.clone()),
            None => Mode::Serve,
        }
    }
}
