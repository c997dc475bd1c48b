//! Shopfront HTTP router.
//!
//! Composes every handler into one Axum router.

use crate::handlers::{export, health, orders, queries};
use crate::middleware::correlation_id;
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the Shopfront router with all endpoints.
///
/// # Routes
///
/// - `GET /` - Welcome text
/// - `GET /health` - Liveness
/// - `GET /ready` - Database reachability
/// - `GET /recommendations/:userId` - Products the user has not ordered
/// - `GET /highvalueusers/:value` - Users spending more than `value`
/// - `GET /topproducts/:userId` - The user's most ordered product
/// - `POST /placeorder` - Place an order
/// - `POST /export/:queryType` - Export a query result as CSV
///
/// # Example
///
/// ```rust,ignore
/// let app = build_router(AppState::new(Arc::new(storefront), "."));
/// axum::serve(listener, app).await?;
/// ```
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/recommendations/:user_id", get(queries::recommendations))
        .route("/highvalueusers/:value", get(queries::high_value_users))
        .route("/topproducts/:user_id", get(queries::top_products))
        .route("/placeorder", post(orders::place_order))
        .route("/export/:query_type", post(export::export))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(correlation_id))
                .layer(TraceLayer::new_for_http()),
        )
}
