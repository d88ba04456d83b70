//! HTTP to NATS gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────┐
//!                          │                    GATEWAY                        │
//!     POST /topics/{t}     │  ┌─────────┐   ┌─────────┐   ┌───────────────┐   │
//!     POST /requests/{t}   │  │  http   │──▶│ payload │──▶│   dispatch    │   │
//!     ─────────────────────┼─▶│ handler │   │  codec  │   │ publish/request│──┼──▶ NATS
//!                          │  └────┬────┘   └─────────┘   └───────┬───────┘   │
//!                          │       │                              │           │
//!     HTTP response        │  ┌────▼─────┐                        │           │
//!     ◀────────────────────┼──│ response │◀───────── outcome ─────┘           │
//!                          │  │  mapper  │                                    │
//!                          │  └──────────┘                                    │
//!                          │                                                  │
//!                          │  --test <topic>: diagnostic subscriber instead   │
//!                          └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use nats_gateway::bus::{MessageBus, NatsBus};
use nats_gateway::config::GatewayConfig;
use nats_gateway::diagnostic::DiagnosticSubscriber;
use nats_gateway::http::HttpServer;
use nats_gateway::lifecycle::{signals, Mode, Shutdown, Startup, StartupArgs, StartupError};
use nats_gateway::observability::{logging, metrics};

#[tokio::main]
async fn main() -> ExitCode {
    let args = StartupArgs::parse();
    let startup = match Startup::prepare(&args, &args.resolver_chain()) {
        Ok(startup) => startup,
        Err(e) => {
            // No config to take the level from yet.
            logging::init(&GatewayConfig::default().observability.log_level);
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&startup.config.observability.log_level);
    tracing::info!("nats-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    match run(startup).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "nats-gateway stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(startup: Startup) -> Result<(), Box<dyn std::error::Error>> {
    let config = startup.config.clone();
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let bus = NatsBus::connect(&startup.connection.endpoint, &config.bus)
        .await
        .map_err(StartupError::Connect)?;
    let bus: Arc<dyn MessageBus> = Arc::new(bus);

    match startup.mode() {
        Mode::Diagnostic(topic) => {
            let subscriber =
                DiagnosticSubscriber::new(bus, topic, config.diagnostic.ack_body.clone());
            let exit = subscriber.run(signals::interrupt()).await?;
            Err(exit.into())
        }
        Mode::Serve => {
            let addr = config.listener.bind_address.clone();
            let listener = TcpListener::bind(&addr)
                .await
                .map_err(|source| StartupError::Bind { addr, source })?;

            let shutdown = Shutdown::new();
            HttpServer::new(config, bus)
                .run(listener, shutdown.subscribe())
                .await?;

            tracing::info!("Shutdown complete");
            Ok(())
        }
    }
}
