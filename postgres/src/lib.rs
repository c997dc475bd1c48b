//! `PostgreSQL` storefront for Shopfront.
//!
//! This crate implements the [`Storefront`] trait from `shopfront-core` on top
//! of a sqlx connection pool:
//!
//! - Schema bootstrap and one-time seeding ([`schema`])
//! - Paginated read queries ([`queries`])
//! - The place-order transaction with its conditional stock decrement ([`orders`])
//! - Pool construction from configuration ([`config`])
//!
//! The pool is passed in explicitly, so tests can point a store at a
//! disposable database.
//!
//! # Example
//!
//! ```ignore
//! use shopfront_core::Storefront;
//! use shopfront_postgres::{PostgresConfig, PostgresStorefront};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = PostgresConfig::default().connect().await?;
//!     let store = PostgresStorefront::new(pool);
//!     store.bootstrap().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod orders;
pub mod queries;
pub mod schema;

pub use config::PostgresConfig;

use rust_decimal::Decimal;
use shopfront_core::domain::Product;
use shopfront_core::{
    HighValueUser, OrderRequest, PageRequest, PagedResult, PlacedOrder, ProductId,
    Recommendation, StoreError, StoreFuture, Storefront, TopProduct, UserId,
};
use sqlx::PgPool;

/// [`Storefront`] backed by a `PostgreSQL` pool.
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone, Debug)]
pub struct PostgresStorefront {
    pool: PgPool,
}

impl PostgresStorefront {
    /// Create a storefront over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Look up a product, including its current stock.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if the query fails.
    pub async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        queries::find_product(&self.pool, id).await
    }
}

impl Storefront for PostgresStorefront {
    fn bootstrap(&self) -> StoreFuture<'_, ()> {
        Box::pin(schema::bootstrap(&self.pool))
    }

    fn recommendations(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> StoreFuture<'_, PagedResult<Recommendation>> {
        Box::pin(queries::recommendations(&self.pool, user_id, page))
    }

    fn high_value_users(
        &self,
        threshold: Decimal,
        page: PageRequest,
    ) -> StoreFuture<'_, PagedResult<HighValueUser>> {
        Box::pin(queries::high_value_users(&self.pool, threshold, page))
    }

    fn top_product_per_user(&self, user_id: UserId) -> StoreFuture<'_, Option<TopProduct>> {
        Box::pin(queries::top_product_per_user(&self.pool, user_id))
    }

    fn place_order(&self, request: OrderRequest) -> StoreFuture<'_, PlacedOrder> {
        Box::pin(orders::place_order(&self.pool, request))
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            Ok(())
        })
    }
}
