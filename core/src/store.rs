//! The store abstraction behind both front ends.
//!
//! # Implementations
//!
//! - `PostgresStorefront` (in `shopfront-postgres`): production implementation
//! - `InMemoryStorefront` (in `shopfront-testing`): fast, deterministic tests
//!
//! Callers hold the store explicitly (`Arc<dyn Storefront>` in application
//! state, a reference in the console loop); there is no process-wide handle.

use crate::domain::{
    HighValueUser, OrderRequest, PlacedOrder, ProductId, Recommendation, TopProduct, UserId,
};
use crate::pagination::{PageRequest, PagedResult};
use rust_decimal::Decimal;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by [`Storefront`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Errors surfaced by store operations.
///
/// Every variant carries a message suitable for showing to a caller. None of
/// them is retried; they reach the immediate caller once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Schema creation or seeding failed; nothing was committed.
    #[error("Database initialization failed: {0}")]
    Initialization(String),

    /// A read query failed.
    #[error("Error fetching {operation}: {message}")]
    Query {
        /// Which read was running
        operation: &'static str,
        /// Underlying store message
        message: String,
    },

    /// The conditional stock decrement matched no row; the order was rolled back.
    #[error("Error placing order: Insufficient stock or invalid product ID {product_id}")]
    InsufficientStock {
        /// Product that was ordered
        product_id: ProductId,
        /// Units that were requested
        requested: i32,
    },

    /// The order referenced a user or product that does not exist; rolled back.
    #[error("Error placing order: invalid user or product reference ({0})")]
    InvalidReference(String),

    /// Any other failure inside the place-order transaction; rolled back.
    #[error("Error placing order: {0}")]
    Transaction(String),

    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Wrap a read failure with the name of the operation.
    pub fn query(operation: &'static str, err: impl fmt::Display) -> Self {
        Self::Query {
            operation,
            message: err.to_string(),
        }
    }
}

/// Schema bootstrap, the three reads and the place-order transaction.
///
/// # Dyn Compatibility
///
/// Operations return [`StoreFuture`] instead of using `async fn` so the trait
/// can be used as `Arc<dyn Storefront>` in HTTP state.
pub trait Storefront: Send + Sync {
    /// Ensure tables and indexes exist and seed sample rows when there are no
    /// users. Runs as one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Initialization`]; no partial schema or seed rows
    /// are left behind.
    fn bootstrap(&self) -> StoreFuture<'_, ()>;

    /// Products `user_id` has never ordered, ordered by product id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] on any store failure.
    fn recommendations(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> StoreFuture<'_, PagedResult<Recommendation>>;

    /// Users whose total spend is strictly greater than `threshold`, highest
    /// spend first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] on any store failure.
    fn high_value_users(
        &self,
        threshold: Decimal,
        page: PageRequest,
    ) -> StoreFuture<'_, PagedResult<HighValueUser>>;

    /// The product with the highest summed quantity across the user's orders,
    /// lowest product id on ties. `None` if the user has no orders.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] on any store failure.
    fn top_product_per_user(&self, user_id: UserId) -> StoreFuture<'_, Option<TopProduct>>;

    /// Insert an order and decrement stock atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InsufficientStock`], [`StoreError::InvalidReference`]
    /// or [`StoreError::Transaction`]. In every case neither the order nor the
    /// stock change is visible afterwards.
    fn place_order(&self, request: OrderRequest) -> StoreFuture<'_, PlacedOrder>;

    /// Check that the store answers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if it does not.
    fn ping(&self) -> StoreFuture<'_, ()>;
}
