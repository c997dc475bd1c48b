//! Order placement endpoint.

use crate::{AppError, WebResult, state::AppState};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Serialize;
use shopfront_core::{OrderRequest, PlacedOrder};

/// Response for a committed order.
#[derive(Debug, Serialize)]
pub struct OrderPlacedResponse {
    /// Confirmation text
    pub message: &'static str,
    /// What was committed
    #[serde(flatten)]
    pub order: PlacedOrder,
}

/// Place an order and decrement stock in one transaction.
///
/// ```bash
/// curl -X POST http://localhost:3000/placeorder \
///   -H 'Content-Type: application/json' \
///   -d '{"userId": 1, "productId": 1, "quantity": 10}'
/// ```
///
/// Response:
/// ```json
/// {
///   "message": "Order placed successfully",
///   "orderId": 6, "userId": 1, "productId": 1, "quantity": 10, "remainingStock": 90
/// }
/// ```
pub async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> WebResult<Json<OrderPlacedResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Malformed order body");
        AppError::bad_request("Invalid input: userId, productId, and quantity must be integers")
    })?;
    request.validate()?;

    let order = state.store.place_order(request).await?;
    Ok(Json(OrderPlacedResponse {
        message: "Order placed successfully",
        order,
    }))
}
