//! Response mapping.
//!
//! # Responsibilities
//! - Map request-time errors to HTTP status codes
//! - Render success outcomes (204 for publish, 200 + JSON for replies)
//!
//! # Design Decisions
//! - Error bodies are plain text carrying the cause's message unredacted
//! - Client faults are 4xx, every bus fault (timeouts included) is 500

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::bus::BusError;
use crate::dispatch::{Outcome, RoutingError};
use crate::payload::PayloadError;

/// Any error that ends a request before a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Bus(#[from] BusError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Routing(RoutingError::MissingTopic) => StatusCode::NOT_FOUND,
            GatewayError::Routing(RoutingError::InvalidTopic { .. }) => StatusCode::BAD_REQUEST,
            GatewayError::Payload(PayloadError::BodyMissing) => StatusCode::NOT_ACCEPTABLE,
            GatewayError::Payload(
                PayloadError::BodyTooLarge { .. }
                | PayloadError::MalformedContent(_)
                | PayloadError::Unreadable(_),
            ) => StatusCode::BAD_REQUEST,
            GatewayError::Bus(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client faults are logged at warn, backend faults at error.
    pub fn is_client_fault(&self) -> bool {
        self.status().is_client_error()
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        text_response(self.status(), self.to_string())
    }
}

/// Plain-text response with an explicit content type.
pub fn text_response(status: StatusCode, message: impl Into<String>) -> Response {
    let mut response = Response::new(Body::from(message.into()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Published => StatusCode::NO_CONTENT.into_response(),
            Outcome::Replied(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                body,
            )
                .into_response(),
        }
    }
}
