//! Schema bootstrap.
//!
//! Creates the `users`, `products` and `orders` tables plus the two indexes on
//! the order reference columns, then seeds sample rows if `users` is empty.
//! Everything runs in a single transaction: any failure rolls the whole
//! bootstrap back. The transaction first takes an advisory lock, so concurrent
//! bootstraps (server and console starting together) run one after the other
//! and only the first one seeds.

use shopfront_core::StoreError;
use shopfront_core::domain::seed;
use sqlx::{PgConnection, PgPool};

const CREATE_USERS: &str = r"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL
    )
";

const CREATE_PRODUCTS: &str = r"
    CREATE TABLE IF NOT EXISTS products (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        price NUMERIC(10, 2) NOT NULL,
        stock INTEGER NOT NULL DEFAULT 100 CHECK (stock >= 0)
    )
";

const CREATE_ORDERS: &str = r"
    CREATE TABLE IF NOT EXISTS orders (
        id SERIAL PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id),
        product_id INTEGER NOT NULL REFERENCES products(id),
        quantity INTEGER NOT NULL CHECK (quantity > 0)
    )
";

/// Key of the transaction-scoped advisory lock serializing bootstraps.
const BOOTSTRAP_LOCK_KEY: i64 = 0x5348_4f50_4652_4e54;

const CREATE_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_orders_user_id ON orders(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_product_id ON orders(product_id)",
];

/// Ensure the schema exists and seed it once.
///
/// # Errors
///
/// Returns [`StoreError::Initialization`] wrapping the first failure; the
/// transaction is rolled back before returning.
#[tracing::instrument(skip(pool))]
pub async fn bootstrap(pool: &PgPool) -> Result<(), StoreError> {
    let init_error = |e: sqlx::Error| StoreError::Initialization(e.to_string());

    let mut tx = pool.begin().await.map_err(init_error)?;

    match create_and_seed(&mut tx).await {
        Ok(seeded) => {
            tx.commit().await.map_err(init_error)?;
            tracing::info!(seeded, "Database initialized");
            Ok(())
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "Rollback after failed bootstrap also failed");
            }
            tracing::error!(error = %e, "Database initialization failed");
            Err(init_error(e))
        }
    }
}

/// Returns whether seed rows were inserted.
async fn create_and_seed(conn: &mut PgConnection) -> Result<bool, sqlx::Error> {
    // Released at commit or rollback.
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(BOOTSTRAP_LOCK_KEY)
        .execute(&mut *conn)
        .await?;

    for ddl in [CREATE_USERS, CREATE_PRODUCTS, CREATE_ORDERS]
        .into_iter()
        .chain(CREATE_INDEXES)
    {
        sqlx::query(ddl).execute(&mut *conn).await?;
    }

    let (user_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await?;
    if user_count > 0 {
        return Ok(false);
    }

    seed_rows(conn).await?;
    Ok(true)
}

/// Insert the seed users, products and orders.
///
/// Seed orders refer to users and products by position; the ids actually
/// assigned are used, since sequences may have advanced past 1.
async fn seed_rows(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    let mut user_ids = Vec::with_capacity(seed::USERS.len());
    for user in seed::users() {
        let (id,): (i32,) =
            sqlx::query_as("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id")
                .bind(&user.name)
                .bind(&user.email)
                .fetch_one(&mut *conn)
                .await?;
        user_ids.push(id);
    }

    let mut product_ids = Vec::with_capacity(seed::PRODUCTS.len());
    for product in seed::products() {
        let (id,): (i32,) =
            sqlx::query_as("INSERT INTO products (name, price) VALUES ($1, $2) RETURNING id")
                .bind(&product.name)
                .bind(product.price)
                .fetch_one(&mut *conn)
                .await?;
        product_ids.push(id);
    }

    for order in seed::orders() {
        let user_id = position_to_id(&user_ids, order.user_id)?;
        let product_id = position_to_id(&product_ids, order.product_id)?;
        sqlx::query("INSERT INTO orders (user_id, product_id, quantity) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(product_id)
            .bind(order.quantity)
            .execute(&mut *conn)
            .await?;
    }

    tracing::debug!(
        users = user_ids.len(),
        products = product_ids.len(),
        orders = seed::ORDERS.len(),
        "Seed rows inserted"
    );
    Ok(())
}

fn position_to_id(ids: &[i32], position: i32) -> Result<i32, sqlx::Error> {
    usize::try_from(position - 1)
        .ok()
        .and_then(|index| ids.get(index).copied())
        .ok_or_else(|| sqlx::Error::Protocol(format!("seed reference {position} out of range")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn seed_positions_map_to_assigned_ids() {
        let ids = [7, 8, 9];
        assert_eq!(position_to_id(&ids, 1).unwrap(), 7);
        assert_eq!(position_to_id(&ids, 3).unwrap(), 9);
        assert!(position_to_id(&ids, 0).is_err());
        assert!(position_to_id(&ids, 4).is_err());
    }
}
