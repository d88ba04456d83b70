//! Route handler shared by the publish and request routes.
//!
//! Per request:
//! ```text
//! Received → TopicExtracted → BodyDecoded → Dispatched → ResponseWritten
//! ```
//! Any step may fail, which skips straight to writing the error response.
//! The body is read to the end on every path.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, State},
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
};

use crate::dispatch::{Dispatcher, Operation, Outcome, RoutingError, Topic};
use crate::http::request::request_id;
use crate::http::response::GatewayError;
use crate::observability::metrics;
use crate::payload::{self, PayloadCodec};

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub codec: PayloadCodec,
}

pub async fn publish_topic(
    State(state): State<AppState>,
    topic: Result<Path<String>, PathRejection>,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let topic = topic_segment(topic, &uri).map(Some);
    handle(&state, Operation::Publish, topic, &headers, body).await
}

pub async fn publish_without_topic(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    handle(&state, Operation::Publish, Ok(None), &headers, body).await
}

pub async fn request_topic(
    State(state): State<AppState>,
    topic: Result<Path<String>, PathRejection>,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let topic = topic_segment(topic, &uri).map(Some);
    handle(&state, Operation::Request, topic, &headers, body).await
}

pub async fn request_without_topic(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    handle(&state, Operation::Request, Ok(None), &headers, body).await
}

/// Decoded `{topic}` segment. A segment that does not decode keeps its raw
/// form in the error.
fn topic_segment(
    extracted: Result<Path<String>, PathRejection>,
    uri: &Uri,
) -> Result<String, RoutingError> {
    match extracted {
        Ok(Path(topic)) => Ok(topic),
        Err(rejection) => Err(RoutingError::InvalidTopic {
            segment: uri.path().rsplit('/').next().unwrap_or_default().to_string(),
            reason: rejection.body_text(),
        }),
    }
}

/// Run one request through the pipeline and write exactly one response.
pub async fn handle(
    state: &AppState,
    operation: Operation,
    raw_topic: Result<Option<String>, RoutingError>,
    headers: &HeaderMap,
    body: Body,
) -> Response {
    let start = Instant::now();
    let topic_label = match &raw_topic {
        Ok(topic) => topic.clone().unwrap_or_default(),
        Err(RoutingError::InvalidTopic { segment, .. }) => segment.clone(),
        Err(RoutingError::MissingTopic) => String::new(),
    };

    let response = match process(state, operation, raw_topic, body).await {
        Ok(outcome) => outcome.into_response(),
        Err(err) => {
            if err.is_client_fault() {
                tracing::warn!(
                    request_id = %request_id(headers),
                    operation = operation.as_str(),
                    topic = %topic_label,
                    error = %err,
                    "Request rejected"
                );
            } else {
                tracing::error!(
                    request_id = %request_id(headers),
                    operation = operation.as_str(),
                    topic = %topic_label,
                    error = %err,
                    "Bus error"
                );
            }
            if let GatewayError::Bus(bus_err) = &err {
                metrics::record_bus_error(bus_err.kind());
            }
            err.into_response()
        }
    };

    metrics::record_request(operation.as_str(), response.status().as_u16(), start);
    response
}

async fn process(
    state: &AppState,
    operation: Operation,
    raw_topic: Result<Option<String>, RoutingError>,
    body: Body,
) -> Result<Outcome, GatewayError> {
    let topic = match raw_topic.and_then(Topic::parse) {
        Ok(topic) => topic,
        Err(e) => {
            payload::drain(body).await;
            return Err(e.into());
        }
    };

    let payload = state.codec.decode(body).await?;

    Ok(state.dispatcher.dispatch(operation, &topic, payload).await?)
}
