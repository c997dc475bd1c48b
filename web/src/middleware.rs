//! Request correlation middleware.
//!
//! Every request gets a correlation ID: the one the client sent in
//! `X-Correlation-ID` if it is a valid UUID, otherwise a fresh one. The ID is
//! stored in request extensions, recorded on the request span and echoed in
//! the response header.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware::from_fn};
//! use shopfront_web::middleware::correlation_id;
//!
//! let app = Router::new()
//!     .route("/health", get(health_check))
//!     .layer(from_fn(correlation_id));
//! ```

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Correlation ID stored in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

/// Attach a correlation ID to the request, its span and its response.
pub async fn correlation_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    req.extensions_mut().insert(CorrelationId(id));

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %id,
        method = %req.method(),
        uri = %req.uri(),
    );

    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    response
}
