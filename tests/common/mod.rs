//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use nats_gateway::bus::MockBus;
use nats_gateway::config::GatewayConfig;
use nats_gateway::http::HttpServer;
use nats_gateway::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// A gateway serving on an ephemeral port in front of a mock bus.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub bus: Arc<MockBus>,
    pub shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway with `config` over `bus`.
pub async fn start_gateway(config: GatewayConfig, bus: Arc<MockBus>) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, bus.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for the accept loop.
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    TestGateway { addr, bus, shutdown }
}

/// Config with a short reply timeout so timeout tests stay fast.
pub fn fast_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.bus.request_timeout_ms = 200;
    config
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
