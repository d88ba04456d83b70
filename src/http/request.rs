//! Request preconditions.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Reject bodies that are not declared as JSON before they reach a handler
//!
//! # Design Decisions
//! - Request ID added as early as possible so every log line carries it
//! - A rejected request still has its body drained

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::response::text_response;
use crate::payload;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Media type the publish and request routes accept.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Request ID of an in-flight request, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// True when the Content-Type media type is `application/json`.
/// Parameters such as `charset` are ignored.
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case(JSON_MEDIA_TYPE))
        .unwrap_or(false)
}

/// Route layer rejecting non-JSON requests with 415.
pub async fn require_json(request: Request<Body>, next: Next) -> Response {
    if is_json(request.headers()) {
        return next.run(request).await;
    }

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("<none>")
        .to_string();
    tracing::warn!(
        request_id = %request_id(request.headers()),
        path = %request.uri().path(),
        content_type = %content_type,
        "Rejected non-JSON request"
    );

    payload::drain(request.into_body()).await;
    text_response(
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
        format!("unsupported content type {}, expected {}", content_type, JSON_MEDIA_TYPE),
    )
}
