//! Liveness endpoint.
//!
//! `GET /health` reports whether the bus connection is usable.

use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
};

use crate::http::handler::AppState;
use crate::http::response::text_response;

pub async fn health(State(state): State<AppState>) -> Response {
    if state.dispatcher.bus().is_connected() {
        text_response(StatusCode::OK, "ok")
    } else {
        tracing::warn!("Health check failed: message bus not connected");
        text_response(StatusCode::SERVICE_UNAVAILABLE, "message bus not connected")
    }
}
