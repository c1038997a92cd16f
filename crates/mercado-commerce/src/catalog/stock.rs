//! Stock bookkeeping.

use crate::catalog::Product;
use crate::error::{CommerceError, Result};
use crate::ids::{OrderId, ProductId};
use crate::state::current_timestamp;
use serde::{Deserialize, Serialize};

impl Product {
    /// Take `quantity` units out of stock.
    ///
    /// Compare-and-decrement: fails without touching the product when fewer
    /// than `quantity` units are left. Clears `on_stock` at zero.
    pub fn reserve(&mut self, quantity: u32) -> Result<()> {
        let remaining =
            self.stock
                .checked_sub(quantity)
                .ok_or_else(|| CommerceError::InsufficientStock {
                    product: self.name.clone(),
                    requested: quantity,
                    available: self.stock,
                })?;

        self.stock = remaining;
        if remaining == 0 {
            self.on_stock = false;
        }
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Put `quantity` units back into stock (cancellation, restock).
    pub fn release(&mut self, quantity: u32) -> Result<()> {
        self.stock = self
            .stock
            .checked_add(quantity)
            .ok_or_else(|| CommerceError::validation("stock count overflow"))?;
        self.on_stock = true;
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Check if `quantity` units could be reserved right now.
    pub fn can_fulfill(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }
}

/// Reason for a stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    /// Sold at checkout.
    Sale,
    /// Returned by an order cancellation.
    Cancellation,
    /// Added or corrected by the seller.
    Restock,
}

impl AdjustmentReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentReason::Sale => "sale",
            AdjustmentReason::Cancellation => "cancellation",
            AdjustmentReason::Restock => "restock",
        }
    }
}

/// A stock change record (audit trail).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockAdjustment {
    /// Product that was adjusted.
    pub product_id: ProductId,
    /// Change in quantity (positive or negative).
    pub quantity_change: i64,
    /// Reason for the adjustment.
    pub reason: AdjustmentReason,
    /// Order that caused it, if any.
    pub order_id: Option<OrderId>,
    /// Unix timestamp of adjustment.
    pub timestamp: i64,
}

impl StockAdjustment {
    pub fn new(product_id: ProductId, quantity_change: i64, reason: AdjustmentReason) -> Self {
        Self {
            product_id,
            quantity_change,
            reason,
            order_id: None,
            timestamp: current_timestamp(),
        }
    }

    pub fn for_order(mut self, order_id: &OrderId) -> Self {
        self.order_id = Some(order_id.clone());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{CategoryId, UserId};
    use crate::money::{Currency, Money};

    fn product(stock: u32) -> Product {
        Product {
            id: ProductId::new("prod_1"),
            owner: UserId::new("usr_bob"),
            name: "Mate".into(),
            category_id: CategoryId::new("cat_1"),
            description: String::new(),
            brand: "Genérico".into(),
            price: Money::new(1000, Currency::ARS),
            stock,
            on_stock: stock > 0,
            on_sale: false,
            discount_percent: 0,
            image: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_reserve_to_zero_clears_on_stock() {
        let mut p = product(2);
        p.reserve(2).unwrap();
        assert_eq!(p.stock, 0);
        assert!(!p.on_stock);
    }

    #[test]
    fn test_reserve_more_than_available_is_rejected() {
        let mut p = product(1);
        let err = p.reserve(2).unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InsufficientStock {
                requested: 2,
                available: 1,
                ..
            }
        ));
        assert_eq!(p.stock, 1);
        assert!(p.on_stock);
    }

    #[test]
    fn test_release_restores() {
        let mut p = product(1);
        p.reserve(1).unwrap();
        p.release(1).unwrap();
        assert_eq!(p.stock, 1);
        assert!(p.on_stock);
        assert!(p.can_fulfill(1));
        assert!(!p.can_fulfill(2));
    }

    #[test]
    fn test_adjustment_reference() {
        let adj = StockAdjustment::new(ProductId::new("prod_1"), -2, AdjustmentReason::Sale)
            .for_order(&OrderId::new("ord_1"));
        assert_eq!(adj.order_id, Some(OrderId::new("ord_1")));
        assert_eq!(adj.reason.as_str(), "sale");
    }
}
