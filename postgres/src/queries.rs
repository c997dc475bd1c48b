//! Read queries.
//!
//! Each paginated read runs its page query and its count query as two
//! independent statements on the pool; no transaction is held.

use rust_decimal::Decimal;
use shopfront_core::domain::Product;
use shopfront_core::{
    HighValueUser, PageRequest, PagedResult, ProductId, Recommendation, StoreError, TopProduct,
    UserId,
};
use sqlx::PgPool;

const RECOMMENDATIONS_PAGE: &str = r"
    SELECT p.name AS product_name, p.price
    FROM users u
    CROSS JOIN products p
    WHERE u.id = $1
      AND p.id NOT IN (SELECT product_id FROM orders WHERE user_id = $1)
    ORDER BY p.id
    LIMIT $2 OFFSET $3
";

// Same predicate as the page, so the total matches what can be paged through.
const RECOMMENDATIONS_COUNT: &str = r"
    SELECT COUNT(*)
    FROM users u
    CROSS JOIN products p
    WHERE u.id = $1
      AND p.id NOT IN (SELECT product_id FROM orders WHERE user_id = $1)
";

const HIGH_VALUE_USERS_PAGE: &str = r"
    SELECT u.id, u.name, SUM(o.quantity * p.price) AS total_value
    FROM users u
    JOIN orders o ON u.id = o.user_id
    JOIN products p ON o.product_id = p.id
    GROUP BY u.id, u.name
    HAVING SUM(o.quantity * p.price) > $1
    ORDER BY total_value DESC, u.id
    LIMIT $2 OFFSET $3
";

const HIGH_VALUE_USERS_COUNT: &str = r"
    SELECT COUNT(*) FROM (
        SELECT u.id
        FROM users u
        JOIN orders o ON u.id = o.user_id
        JOIN products p ON o.product_id = p.id
        GROUP BY u.id
        HAVING SUM(o.quantity * p.price) > $1
    ) AS qualifying
";

const TOP_PRODUCT: &str = r"
    SELECT u.name AS user_name, p.name AS product_name, sub.total_quantity
    FROM (
        SELECT user_id, product_id, SUM(quantity) AS total_quantity
        FROM orders
        WHERE user_id = $1
        GROUP BY user_id, product_id
        ORDER BY total_quantity DESC, product_id ASC
        LIMIT 1
    ) sub
    JOIN users u ON u.id = sub.user_id
    JOIN products p ON p.id = sub.product_id
";

/// Products the user has never ordered.
///
/// # Errors
///
/// Returns [`StoreError::Query`] if either statement fails.
#[tracing::instrument(skip(pool), fields(page = page.page(), page_size = page.page_size()))]
pub async fn recommendations(
    pool: &PgPool,
    user_id: UserId,
    page: PageRequest,
) -> Result<PagedResult<Recommendation>, StoreError> {
    let rows = sqlx::query_as::<_, (String, Decimal)>(RECOMMENDATIONS_PAGE)
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool);
    let count = sqlx::query_as::<_, (i64,)>(RECOMMENDATIONS_COUNT)
        .bind(user_id)
        .fetch_one(pool);

    let (rows, (total,)) = tokio::try_join!(rows, count)
        .map_err(|e| StoreError::query("recommendations", e))?;

    let data = rows
        .into_iter()
        .map(|(product_name, price)| Recommendation {
            product_name,
            price,
        })
        .collect();
    Ok(PagedResult::new(data, page, total))
}

/// Users whose total spend strictly exceeds `threshold`.
///
/// # Errors
///
/// Returns [`StoreError::Query`] if either statement fails.
#[tracing::instrument(skip(pool), fields(page = page.page(), page_size = page.page_size()))]
pub async fn high_value_users(
    pool: &PgPool,
    threshold: Decimal,
    page: PageRequest,
) -> Result<PagedResult<HighValueUser>, StoreError> {
    let rows = sqlx::query_as::<_, (i32, String, Decimal)>(HIGH_VALUE_USERS_PAGE)
        .bind(threshold)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool);
    let count = sqlx::query_as::<_, (i64,)>(HIGH_VALUE_USERS_COUNT)
        .bind(threshold)
        .fetch_one(pool);

    let (rows, (total,)) = tokio::try_join!(rows, count)
        .map_err(|e| StoreError::query("high-value users", e))?;

    let data = rows
        .into_iter()
        .map(|(id, name, total_value)| HighValueUser {
            id,
            name,
            total_value,
        })
        .collect();
    Ok(PagedResult::new(data, page, total))
}

/// The user's most ordered product, if any.
///
/// # Errors
///
/// Returns [`StoreError::Query`] if the statement fails.
#[tracing::instrument(skip(pool))]
pub async fn top_product_per_user(
    pool: &PgPool,
    user_id: UserId,
) -> Result<Option<TopProduct>, StoreError> {
    let row = sqlx::query_as::<_, (String, String, i64)>(TOP_PRODUCT)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| StoreError::query("top products", e))?;

    Ok(row.map(|(user_name, product_name, total_quantity)| TopProduct {
        user_name,
        product_name,
        total_quantity,
    }))
}

/// A single product with its current stock.
///
/// # Errors
///
/// Returns [`StoreError::Query`] if the statement fails.
pub async fn find_product(pool: &PgPool, id: ProductId) -> Result<Option<Product>, StoreError> {
    let row = sqlx::query_as::<_, (i32, String, Decimal, i32)>(
        "SELECT id, name, price, stock FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| StoreError::query("product", e))?;

    Ok(row.map(|(id, name, price, stock)| Product {
        id,
        name,
        price,
        stock,
    }))
}
