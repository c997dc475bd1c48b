//! # Shopfront Testing
//!
//! Testing utilities for Shopfront.
//!
//! This crate provides [`InMemoryStorefront`], a `Vec`-backed implementation
//! of [`Storefront`] with the same query semantics as the `PostgreSQL` store.
//! Front ends can be exercised at memory speed, without a database.
//!
//! ## Example
//!
//! ```
//! use shopfront_core::{OrderRequest, Storefront};
//! use shopfront_testing::InMemoryStorefront;
//!
//! # tokio_test::block_on(async {
//! let store = InMemoryStorefront::seeded();
//! let placed = store.place_order(OrderRequest::new(1, 1, 10)).await.unwrap();
//! assert_eq!(placed.remaining_stock, 90);
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use rust_decimal::Decimal;
use shopfront_core::domain::{Order, Product, User, seed};
use shopfront_core::{
    HighValueUser, OrderRequest, PageRequest, PagedResult, PlacedOrder, ProductId,
    Recommendation, StoreError, StoreFuture, Storefront, TopProduct, UserId,
};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

impl Tables {
    fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// In-memory [`Storefront`] for tests.
///
/// Call [`set_unavailable`](Self::set_unavailable) to make every operation
/// fail as if the database were unreachable.
#[derive(Debug, Default)]
pub struct InMemoryStorefront {
    tables: Mutex<Tables>,
    unavailable: std::sync::atomic::AtomicBool,
}

fn page_slice<T: Clone>(rows: &[T], page: PageRequest) -> Vec<T> {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    rows.iter().skip(offset).take(limit).cloned().collect()
}

fn total(rows: usize) -> i64 {
    i64::try_from(rows).unwrap_or(i64::MAX)
}

impl InMemoryStorefront {
    /// Create an empty store; call `bootstrap` to seed it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding the seed data.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            tables: Mutex::new(Tables {
                users: seed::users(),
                products: seed::products(),
                orders: seed::orders(),
            }),
            unavailable: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable
            .store(unavailable, std::sync::atomic::Ordering::SeqCst);
    }

    fn check_available(&self, wrap: impl FnOnce(String) -> StoreError) -> Result<(), StoreError> {
        if self.unavailable.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(wrap("connection refused".to_string()));
        }
        Ok(())
    }

    /// Current state of a product.
    pub async fn product(&self, id: ProductId) -> Option<Product> {
        self.tables.lock().await.product(id).cloned()
    }

    /// Number of order rows.
    pub async fn order_count(&self) -> usize {
        self.tables.lock().await.orders.len()
    }

    /// Number of user rows.
    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }
}

impl Storefront for InMemoryStorefront {
    fn bootstrap(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.check_available(StoreError::Initialization)?;
            let mut tables = self.tables.lock().await;
            if tables.users.is_empty() {
                tables.users = seed::users();
                tables.products = seed::products();
                tables.orders = seed::orders();
            }
            Ok(())
        })
    }

    fn recommendations(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> StoreFuture<'_, PagedResult<Recommendation>> {
        Box::pin(async move {
            self.check_available(|m| StoreError::query("recommendations", m))?;
            let tables = self.tables.lock().await;
            if tables.user(user_id).is_none() {
                return Ok(PagedResult::new(Vec::new(), page, 0));
            }

            let mut eligible: Vec<&Product> = tables
                .products
                .iter()
                .filter(|p| {
                    !tables
                        .orders
                        .iter()
                        .any(|o| o.user_id == user_id && o.product_id == p.id)
                })
                .collect();
            eligible.sort_by_key(|p| p.id);

            let rows: Vec<Recommendation> = eligible
                .into_iter()
                .map(|p| Recommendation {
                    product_name: p.name.clone(),
                    price: p.price,
                })
                .collect();
            Ok(PagedResult::new(page_slice(&rows, page), page, total(rows.len())))
        })
    }

    fn high_value_users(
        &self,
        threshold: Decimal,
        page: PageRequest,
    ) -> StoreFuture<'_, PagedResult<HighValueUser>> {
        Box::pin(async move {
            self.check_available(|m| StoreError::query("high-value users", m))?;
            let tables = self.tables.lock().await;

            let mut spend: BTreeMap<UserId, Decimal> = BTreeMap::new();
            for order in &tables.orders {
                if let Some(product) = tables.product(order.product_id) {
                    *spend.entry(order.user_id).or_default() +=
                        product.price * Decimal::from(order.quantity);
                }
            }

            let mut rows: Vec<HighValueUser> = spend
                .into_iter()
                .filter(|(_, value)| *value > threshold)
                .filter_map(|(id, total_value)| {
                    tables.user(id).map(|u| HighValueUser {
                        id,
                        name: u.name.clone(),
                        total_value,
                    })
                })
                .collect();
            rows.sort_by(|a, b| b.total_value.cmp(&a.total_value).then(a.id.cmp(&b.id)));

            Ok(PagedResult::new(page_slice(&rows, page), page, total(rows.len())))
        })
    }

    fn top_product_per_user(&self, user_id: UserId) -> StoreFuture<'_, Option<TopProduct>> {
        Box::pin(async move {
            self.check_available(|m| StoreError::query("top products", m))?;
            let tables = self.tables.lock().await;

            let mut quantities: BTreeMap<ProductId, i64> = BTreeMap::new();
            for order in tables.orders.iter().filter(|o| o.user_id == user_id) {
                *quantities.entry(order.product_id).or_default() += i64::from(order.quantity);
            }

            // BTreeMap iterates by ascending id; keep the first maximum.
            let best = quantities
                .into_iter()
                .fold(None, |best: Option<(ProductId, i64)>, (id, qty)| match best {
                    Some((_, top)) if top >= qty => best,
                    _ => Some((id, qty)),
                });

            Ok(best.and_then(|(product_id, total_quantity)| {
                let user = tables.user(user_id)?;
                let product = tables.product(product_id)?;
                Some(TopProduct {
                    user_name: user.name.clone(),
                    product_name: product.name.clone(),
                    total_quantity,
                })
            }))
        })
    }

    fn place_order(&self, request: OrderRequest) -> StoreFuture<'_, PlacedOrder> {
        Box::pin(async move {
            self.check_available(StoreError::Transaction)?;
            let mut tables = self.tables.lock().await;

            if tables.user(request.user_id).is_none() {
                return Err(StoreError::InvalidReference(format!(
                    "user {} does not exist",
                    request.user_id
                )));
            }
            let Some(product) = tables
                .products
                .iter_mut()
                .find(|p| p.id == request.product_id)
            else {
                return Err(StoreError::InvalidReference(format!(
                    "product {} does not exist",
                    request.product_id
                )));
            };
            if product.stock < request.quantity {
                return Err(StoreError::InsufficientStock {
                    product_id: request.product_id,
                    requested: request.quantity,
                });
            }
            product.stock -= request.quantity;
            let remaining_stock = product.stock;

            let order_id = tables.orders.iter().map(|o| o.id).max().unwrap_or(0) + 1;
            tables.orders.push(Order {
                id: order_id,
                user_id: request.user_id,
                product_id: request.product_id,
                quantity: request.quantity,
            });

            Ok(PlacedOrder {
                order_id,
                user_id: request.user_id,
                product_id: request.product_id,
                quantity: request.quantity,
                remaining_stock,
            })
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.check_available(StoreError::Unavailable) })
    }
}
