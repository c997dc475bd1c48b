//! # Shopfront Core
//!
//! Domain types and abstractions shared by every Shopfront crate.
//!
//! The only I/O in this crate is the CSV export adapter.
//! Storage lives behind the [`Storefront`](store::Storefront) trait:
//!
//! - `PostgresStorefront` (in `shopfront-postgres`): production implementation
//! - `InMemoryStorefront` (in `shopfront-testing`): fast, deterministic tests
//!
//! ## Modules
//!
//! - [`domain`]: users, products, orders and the row types returned by queries
//! - [`pagination`]: page requests and the pagination envelope
//! - [`store`]: the store trait and its error type
//! - [`input`]: parsing of caller-supplied identifiers and page parameters
//! - [`export`]: CSV serialization of query results
//!
//! ## Example
//!
//! ```ignore
//! use shopfront_core::{PageRequest, Storefront};
//!
//! async fn show(store: &dyn Storefront) -> Result<(), shopfront_core::StoreError> {
//!     let page = store.recommendations(1, PageRequest::first()).await?;
//!     println!("{} of {} products", page.data.len(), page.pagination.total_results);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod domain;
pub mod export;
pub mod input;
pub mod pagination;
pub mod store;

pub use domain::{
    HighValueUser, OrderRequest, PlacedOrder, ProductId, Recommendation, TopProduct, UserId,
};
pub use export::{ExportError, ExportQuery, Record};
pub use input::InputError;
pub use pagination::{PageRequest, PagedResult, Pagination};
pub use rust_decimal::Decimal;
pub use store::{StoreError, StoreFuture, Storefront};
