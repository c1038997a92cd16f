//! Cart and cart item types.

use crate::error::{CommerceError, Result};
use crate::ids::{CartItemId, ProductId, UserId};
use crate::state::current_timestamp;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// A user's shopping cart.
///
/// Items reference catalog products; prices are read from the catalog
/// whenever the cart is priced, so nothing here goes stale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Owner of the cart.
    pub user_id: UserId,
    /// Items in the cart, one per product.
    pub items: Vec<CartItem>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create an empty cart for `user_id`.
    pub fn new(user_id: UserId) -> Self {
        let now = current_timestamp();
        Self {
            user_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add `quantity` units of a product.
    ///
    /// Increments the existing item for the product if there is one.
    pub fn add(&mut self, product_id: &ProductId, quantity: u32) -> Result<CartItemId> {
        if quantity == 0 {
            return Err(CommerceError::validation("quantity must be at least 1"));
        }

        if let Some(existing) = self.items.iter_mut().find(|i| &i.product_id == product_id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .filter(|q| *q <= MAX_QUANTITY_PER_ITEM)
                .ok_or_else(quantity_limit)?;

            existing.quantity = new_quantity;
            self.updated_at = current_timestamp();
            return Ok(existing.id.clone());
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(quantity_limit());
        }

        let item = CartItem::new(product_id.clone(), quantity);
        let id = item.id.clone();
        self.items.push(item);
        self.updated_at = current_timestamp();
        Ok(id)
    }

    /// Set an item's quantity. Zero removes the item.
    ///
    /// Returns `false` if the item is not in this cart.
    pub fn update(&mut self, item_id: &CartItemId, quantity: u32) -> Result<bool> {
        if quantity == 0 {
            return Ok(self.remove(item_id));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(quantity_limit());
        }

        match self.items.iter_mut().find(|i| &i.id == item_id) {
            Some(item) => {
                item.quantity = quantity;
                self.updated_at = current_timestamp();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove an item from the cart.
    pub fn remove(&mut self, item_id: &CartItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != item_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = current_timestamp();
    }

    /// Get an item by ID.
    pub fn get_item(&self, item_id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == item_id)
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn quantity_limit() -> CommerceError {
    CommerceError::validation(format!(
        "quantity per item cannot exceed {}",
        MAX_QUANTITY_PER_ITEM
    ))
}

/// A product in a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Unique item identifier.
    pub id: CartItemId,
    /// Product being bought.
    pub product_id: ProductId,
    /// Quantity, at least 1.
    pub quantity: u32,
    /// Unix timestamp when first added.
    pub added_at: i64,
}

impl CartItem {
    fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            id: CartItemId::generate(),
            product_id,
            quantity,
            added_at: current_timestamp(),
        }
    }
}
