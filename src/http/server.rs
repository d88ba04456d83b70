//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, JSON guard)
//! - Bind server to listener
//! - Stop on Ctrl+C or an explicit shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::bus::MessageBus;
use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::health;
use crate::http::handler::{self, AppState};
use crate::http::request::{request_id, require_json, MakeRequestUuid};
use crate::http::response::text_response;
use crate::lifecycle::signals;
use crate::payload::{self, PayloadCodec};

/// HTTP front end of the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server over a shared bus handle.
    pub fn new(config: GatewayConfig, bus: Arc<dyn MessageBus>) -> Self {
        let state = AppState {
            dispatcher: Dispatcher::new(
                bus,
                Duration::from_millis(config.bus.request_timeout_ms),
            ),
            codec: PayloadCodec::from_config(&config.payload),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let topic_routes = Router::new()
            .route("/topics/{topic}", post(handler::publish_topic))
            .route("/requests/{topic}", post(handler::request_topic))
            .route_layer(middleware::from_fn(require_json));

        // Empty topic segments still reach the handler so it answers 404.
        let bare_routes = Router::new()
            .route("/topics", post(handler::publish_without_topic))
            .route("/topics/", post(handler::publish_without_topic))
            .route("/requests", post(handler::request_without_topic))
            .route("/requests/", post(handler::request_without_topic));

        Router::new()
            .merge(topic_routes)
            .merge(bare_routes)
            .route("/health", get(health::health))
            .fallback(not_found)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request_id(request.headers()),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.listener.request_timeout_secs,
                    ))),
            )
    }

    /// Router with all layers, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_body_bytes = self.config.payload.max_body_bytes,
            request_timeout_ms = self.config.bus.request_timeout_ms,
            "Waiting for requests on /topics/{{topic}} and /requests/{{topic}}"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn not_found(body: Body) -> Response {
    payload::drain(body).await;
    text_response(StatusCode::NOT_FOUND, "not found")
}

/// Resolve on Ctrl+C or on the shutdown broadcast.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        _ = signals::interrupt() => {
            tracing::info!("Shutdown signal received");
        }
        _ = shutdown.recv() => {
            tracing::info!("Shutdown requested");
        }
    }
}
