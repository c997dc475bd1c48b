//! Read-only query endpoints.
//!
//! - `GET /recommendations/:userId?page&pageSize`
//! - `GET /highvalueusers/:value?page&pageSize`
//! - `GET /topproducts/:userId`

use super::PageParams;
use crate::{WebResult, state::AppState};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use shopfront_core::input::{parse_amount, parse_positive};
use shopfront_core::{HighValueUser, PageRequest, PagedResult, Recommendation, TopProduct};

/// Products the user has not ordered yet.
///
/// ```bash
/// curl 'http://localhost:3000/recommendations/3?page=1&pageSize=1'
/// ```
///
/// Response:
/// ```json
/// {
///   "data": [{ "product_name": "Laptop", "price": "1200.00" }],
///   "pagination": {
///     "currentPage": 1, "pageSize": 1, "totalPages": 2, "totalResults": 2,
///     "hasPrevPage": false, "hasNextPage": true
///   }
/// }
/// ```
pub async fn recommendations(
    Path(user_id): Path<String>,
    Query(params): Query<PageParams>,
    State(state): State<AppState>,
) -> WebResult<Json<PagedResult<Recommendation>>> {
    let user_id = parse_positive("userId", &user_id)?;
    let page = PageRequest::parse(params.page.as_deref(), params.page_size.as_deref())?;

    let result = state.store.recommendations(user_id, page).await?;
    Ok(Json(result))
}

/// Users whose total spend exceeds `value`, highest first.
///
/// ```bash
/// curl 'http://localhost:3000/highvalueusers/1000'
/// ```
pub async fn high_value_users(
    Path(value): Path<String>,
    Query(params): Query<PageParams>,
    State(state): State<AppState>,
) -> WebResult<Json<PagedResult<HighValueUser>>> {
    let threshold = parse_amount("value", &value)?;
    let page = PageRequest::parse(params.page.as_deref(), params.page_size.as_deref())?;

    let result = state.store.high_value_users(threshold, page).await?;
    Ok(Json(result))
}

/// The user's most ordered product, as a list of zero or one rows.
///
/// ```bash
/// curl http://localhost:3000/topproducts/1
/// # [{"user_name":"Alice","product_name":"Phone","total_quantity":2}]
/// ```
pub async fn top_products(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> WebResult<Json<Vec<TopProduct>>> {
    let user_id = parse_positive("userId", &user_id)?;

    let top = state.store.top_product_per_user(user_id).await?;
    Ok(Json(top.into_iter().collect()))
}
