//! Domain entities and query row types.
//!
//! Identifiers are `i32` because the store assigns them from `SERIAL` columns.
//! Row types serialize with the column names the store queries produce, so the
//! same names show up in JSON responses and in CSV headers.

use crate::input::InputError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a [`User`].
pub type UserId = i32;

/// Identifier of a [`Product`].
pub type ProductId = i32;

/// Identifier of an [`Order`].
pub type OrderId = i32;

/// Stock assigned to a product when none is given.
pub const DEFAULT_STOCK: i32 = 100;

/// A customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Store-assigned identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
}

/// A product that can be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Store-assigned identifier
    pub id: ProductId,
    /// Product name
    pub name: String,
    /// Unit price with two decimal places
    pub price: Decimal,
    /// Units available; never negative
    pub stock: i32,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Store-assigned identifier
    pub id: OrderId,
    /// Ordering user
    pub user_id: UserId,
    /// Ordered product
    pub product_id: ProductId,
    /// Units ordered; always positive
    pub quantity: i32,
}

/// A product the user has never ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Product name
    pub product_name: String,
    /// Unit price
    pub price: Decimal,
}

/// A user whose total spend exceeds a threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighValueUser {
    /// User identifier
    pub id: UserId,
    /// User name
    pub name: String,
    /// Sum of `quantity * price` over all of the user's orders
    pub total_value: Decimal,
}

/// The product a user has ordered the most units of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    /// User name
    pub user_name: String,
    /// Product name
    pub product_name: String,
    /// Units of the product summed over the user's orders
    pub total_quantity: i64,
}

/// Input to the place-order transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Ordering user
    pub user_id: UserId,
    /// Ordered product
    pub product_id: ProductId,
    /// Units to order
    pub quantity: i32,
}

impl OrderRequest {
    /// Create a new order request.
    #[must_use]
    pub const fn new(user_id: UserId, product_id: ProductId, quantity: i32) -> Self {
        Self {
            user_id,
            product_id,
            quantity,
        }
    }

    /// Check the request before it reaches the store.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NotPositive`] if an identifier or the quantity is
    /// below one.
    pub const fn validate(&self) -> Result<(), InputError> {
        if self.user_id < 1 {
            return Err(InputError::NotPositive { field: "userId" });
        }
        if self.product_id < 1 {
            return Err(InputError::NotPositive { field: "productId" });
        }
        if self.quantity < 1 {
            return Err(InputError::NotPositive { field: "quantity" });
        }
        Ok(())
    }
}

/// Outcome of a committed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    /// Identifier of the new order row
    pub order_id: OrderId,
    /// Ordering user
    pub user_id: UserId,
    /// Ordered product
    pub product_id: ProductId,
    /// Units ordered
    pub quantity: i32,
    /// Product stock after the decrement
    pub remaining_stock: i32,
}

/// Sample data inserted by the bootstrap when no users exist.
pub mod seed {
    use super::{DEFAULT_STOCK, Order, Product, User};
    use rust_decimal::Decimal;

    /// `(name, email)` of each seeded user, in id order.
    pub const USERS: [(&str, &str); 3] = [
        ("Alice", "alice@example.com"),
        ("Bob", "bob@example.com"),
        ("Charlie", "charlie@example.com"),
    ];

    /// `(name, price in cents)` of each seeded product, in id order.
    pub const PRODUCTS: [(&str, i64); 3] = [
        ("Laptop", 120_000),
        ("Phone", 80_000),
        ("Headphones", 15_000),
    ];

    /// `(user_id, product_id, quantity)` of each seeded order.
    pub const ORDERS: [(i32, i32, i32); 5] = [(1, 1, 1), (1, 2, 2), (2, 1, 3), (2, 3, 1), (3, 2, 1)];

    /// Seed users with ids assigned from 1.
    #[must_use]
    pub fn users() -> Vec<User> {
        USERS
            .iter()
            .zip(1..)
            .map(|(&(name, email), id)| User {
                id,
                name: name.to_string(),
                email: email.to_string(),
            })
            .collect()
    }

    /// Seed products with ids assigned from 1 and default stock.
    #[must_use]
    pub fn products() -> Vec<Product> {
        PRODUCTS
            .iter()
            .zip(1..)
            .map(|(&(name, cents), id)| Product {
                id,
                name: name.to_string(),
                price: Decimal::new(cents, 2),
                stock: DEFAULT_STOCK,
            })
            .collect()
    }

    /// Seed orders with ids assigned from 1.
    #[must_use]
    pub fn orders() -> Vec<Order> {
        ORDERS
            .iter()
            .zip(1..)
            .map(|(&(user_id, product_id, quantity), id)| Order {
                id,
                user_id,
                product_id,
                quantity,
            })
            .collect()
    }
}
