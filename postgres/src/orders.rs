//! The place-order transaction.
//!
//! ```text
//! BEGIN
//! INSERT INTO orders ...                                   -- step 1
//! UPDATE products SET stock = stock - q
//!   WHERE id = p AND stock >= q RETURNING stock            -- step 2
//! zero rows -> ROLLBACK, InsufficientStock
//! otherwise -> COMMIT
//! ```
//!
//! Overselling is prevented by the conditional `UPDATE`: concurrent orders on
//! the same product serialize on the row lock, and the losing transaction
//! re-checks `stock >= q` against the committed value.

use shopfront_core::{OrderRequest, PlacedOrder, StoreError};
use sqlx::{PgConnection, PgPool};

/// SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Insert an order and decrement stock atomically.
///
/// # Errors
///
/// Returns [`StoreError::InsufficientStock`] when the decrement matches no
/// row, [`StoreError::InvalidReference`] when the user or product does not
/// exist, and [`StoreError::Transaction`] for anything else. The transaction
/// is rolled back explicitly in every failure case.
#[tracing::instrument(
    skip(pool),
    fields(
        user_id = request.user_id,
        product_id = request.product_id,
        quantity = request.quantity
    )
)]
pub async fn place_order(pool: &PgPool, request: OrderRequest) -> Result<PlacedOrder, StoreError> {
    let mut tx = pool.begin().await.map_err(transaction_error)?;

    match insert_and_decrement(&mut tx, request).await {
        Ok(placed) => {
            tx.commit().await.map_err(transaction_error)?;
            tracing::info!(
                order_id = placed.order_id,
                remaining_stock = placed.remaining_stock,
                "Order placed"
            );
            metrics::counter!("shopfront.orders.placed").increment(1);
            Ok(placed)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "Rollback of failed order also failed");
            }
            tracing::warn!(error = %e, "Order rejected");
            metrics::counter!("shopfront.orders.rejected").increment(1);
            Err(e)
        }
    }
}

async fn insert_and_decrement(
    conn: &mut PgConnection,
    request: OrderRequest,
) -> Result<PlacedOrder, StoreError> {
    let (order_id,): (i32,) = sqlx::query_as(
        "INSERT INTO orders (user_id, product_id, quantity) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(request.user_id)
    .bind(request.product_id)
    .bind(request.quantity)
    .fetch_one(&mut *conn)
    .await
    .map_err(transaction_error)?;

    let remaining: Option<(i32,)> = sqlx::query_as(
        "UPDATE products SET stock = stock - $1 WHERE id = $2 AND stock >= $1 RETURNING stock",
    )
    .bind(request.quantity)
    .bind(request.product_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(transaction_error)?;

    let Some((remaining_stock,)) = remaining else {
        return Err(StoreError::InsufficientStock {
            product_id: request.product_id,
            requested: request.quantity,
        });
    };

    Ok(PlacedOrder {
        order_id,
        user_id: request.user_id,
        product_id: request.product_id,
        quantity: request.quantity,
        remaining_stock,
    })
}

fn transaction_error(e: sqlx::Error) -> StoreError {
    match e.as_database_error() {
        Some(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
            StoreError::InvalidReference(db.message().to_string())
        }
        _ => StoreError::Transaction(e.to_string()),
    }
}
