//! Axum HTTP API for Shopfront.
//!
//! Thin adapters over the [`Storefront`](shopfront_core::Storefront) trait:
//! each handler parses its inputs, calls one store operation and maps the
//! outcome to a JSON (or CSV) response.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Parse** path, query and body values (invalid input -> 400, no store call)
//! 3. **Call** the store through `AppState::store`
//! 4. **Map result** to a response; errors become `{"error": ..., "code": ...}`
//!
//! # Endpoints
//!
//! | Method | Path                         | Handler                              |
//! |--------|------------------------------|--------------------------------------|
//! | GET    | `/`                          | [`handlers::health::welcome`]        |
//! | GET    | `/health`                    | [`handlers::health::health_check`]   |
//! | GET    | `/ready`                     | [`handlers::health::readiness_check`]|
//! | GET    | `/recommendations/:userId`   | [`handlers::queries::recommendations`] |
//! | GET    | `/highvalueusers/:value`     | [`handlers::queries::high_value_users`] |
//! | GET    | `/topproducts/:userId`       | [`handlers::queries::top_products`]  |
//! | POST   | `/placeorder`                | [`handlers::orders::place_order`]    |
//! | POST   | `/export/:queryType`         | [`handlers::export::export`]         |
//!
//! # Example
//!
//! ```ignore
//! use shopfront_web::{AppState, build_router};
//!
//! let app = build_router(AppState::new(store, "."));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{CORRELATION_ID_HEADER, CorrelationId, correlation_id};
pub use router::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
