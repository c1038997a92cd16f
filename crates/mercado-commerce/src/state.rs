//! The marketplace's persisted state.

use mercado_db::Table;
use serde::{Deserialize, Serialize};

use crate::accounts::UserAccount;
use crate::cart::Cart;
use crate::catalog::{Category, Product, StockAdjustment};
use crate::error::{CommerceError, Result};
use crate::ids::{CategoryId, FavoriteId, OrderId, ProductId, ReviewId, UserId};
use crate::orders::Order;
use crate::reviews::Review;
use crate::wishlist::Favorite;

/// Every table the marketplace keeps.
///
/// Operations in this crate take `&MarketState` or `&mut MarketState`; the
/// [`Marketplace`](crate::Marketplace) service wraps them in store
/// transactions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketState {
    pub users: Table<UserId, UserAccount>,
    pub categories: Table<CategoryId, Category>,
    pub products: Table<ProductId, Product>,
    /// One cart per user, keyed by the owner.
    pub carts: Table<UserId, Cart>,
    /// Orders own their line items.
    pub orders: Table<OrderId, Order>,
    /// Keyed by `ReviewId::for_pair(author, recipient)`.
    pub reviews: Table<ReviewId, Review>,
    pub favorites: Table<FavoriteId, Favorite>,
    /// Append-only stock audit trail.
    pub stock_log: Vec<StockAdjustment>,
}

impl MarketState {
    pub fn user(&self, id: &UserId) -> Result<&UserAccount> {
        self.users
            .get(id)
            .ok_or_else(|| CommerceError::not_found("User", id))
    }

    pub fn user_by_username(&self, username: &str) -> Result<&UserAccount> {
        self.users
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .ok_or_else(|| CommerceError::not_found("User", username))
    }

    pub fn category(&self, id: &CategoryId) -> Result<&Category> {
        self.categories
            .get(id)
            .ok_or_else(|| CommerceError::not_found("Category", id))
    }

    pub fn product(&self, id: &ProductId) -> Result<&Product> {
        self.products
            .get(id)
            .ok_or_else(|| CommerceError::not_found("Product", id))
    }

    pub fn product_mut(&mut self, id: &ProductId) -> Result<&mut Product> {
        self.products
            .get_mut(id)
            .ok_or_else(|| CommerceError::not_found("Product", id))
    }

    pub fn cart(&self, owner: &UserId) -> Result<&Cart> {
        self.carts
            .get(owner)
            .ok_or_else(|| CommerceError::not_found("Cart", owner))
    }

    pub fn cart_mut(&mut self, owner: &UserId) -> Result<&mut Cart> {
        self.carts
            .get_mut(owner)
            .ok_or_else(|| CommerceError::not_found("Cart", owner))
    }

    pub fn order(&self, id: &OrderId) -> Result<&Order> {
        self.orders
            .get(id)
            .ok_or_else(|| CommerceError::not_found("Order", id))
    }

    pub fn order_mut(&mut self, id: &OrderId) -> Result<&mut Order> {
        self.orders
            .get_mut(id)
            .ok_or_else(|| CommerceError::not_found("Order", id))
    }

    /// Look an order up by its human-readable number.
    pub fn order_by_number(&self, number: &str) -> Result<&Order> {
        self.orders
            .find(|o| o.order_number.eq_ignore_ascii_case(number))
            .ok_or_else(|| CommerceError::not_found("Order", number))
    }
}

/// Current Unix timestamp in seconds.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
