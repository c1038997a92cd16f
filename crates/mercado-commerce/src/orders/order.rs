//! Order types.

use crate::error::CommerceError;
use crate::ids::{OrderId, OrderItemId, ProductId, UserId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if order can be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| CommerceError::validation(format!("unknown order status '{}'", key)))
    }
}

/// How the buyer paid. Payment itself is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Paypal,
        PaymentMethod::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Transfer => "transfer",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::DebitCard => "Debit card",
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::Transfer => "Bank transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| CommerceError::validation(format!("unknown payment method '{}'", key)))
    }
}

/// Where an order ships to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingInfo {
    pub address: String,
    pub city: String,
    pub country: String,
    pub phone: String,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-readable order number.
    pub order_number: String,
    /// Position in the ledger, starting at 1.
    pub sequence: u64,
    /// Who bought.
    pub buyer: UserId,
    /// Order status.
    pub status: OrderStatus,
    /// Line items, frozen at checkout.
    pub items: Vec<OrderItem>,
    /// Sum of line subtotals.
    pub subtotal: Money,
    /// Flat shipping cost.
    pub shipping_cost: Money,
    /// subtotal + shipping_cost.
    pub total: Money,
    /// Shipping destination.
    pub shipping: ShippingInfo,
    pub payment_method: PaymentMethod,
    pub paid: bool,
    pub paid_at: Option<i64>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
    /// Unix timestamp of cancellation.
    pub cancelled_at: Option<i64>,
}

impl Order {
    /// Check if `user` sold at least one item in this order.
    pub fn has_seller(&self, user: &UserId) -> bool {
        self.items.iter().any(|i| &i.seller == user)
    }

    /// Items sold by `seller`.
    pub fn items_for<'a>(&'a self, seller: &'a UserId) -> impl Iterator<Item = &'a OrderItem> + 'a {
        self.items.iter().filter(move |i| &i.seller == seller)
    }

    /// Sum of `seller`'s own line subtotals.
    pub fn seller_total(&self, seller: &UserId) -> Money {
        let cents = self
            .items_for(seller)
            .fold(0i64, |acc, i| acc.saturating_add(i.subtotal.amount_cents));
        Money::new(cents, self.subtotal.currency)
    }

    /// Distinct sellers, in line order.
    pub fn sellers(&self) -> Vec<&UserId> {
        let mut sellers: Vec<&UserId> = Vec::new();
        for item in &self.items {
            if !sellers.contains(&&item.seller) {
                sellers.push(&item.seller);
            }
        }
        sellers
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Check if `user` may look at this order.
    pub fn is_visible_to(&self, user: &UserId) -> bool {
        &self.buyer == user || self.has_seller(user)
    }
}

/// A line item, snapshotted from the catalog at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Unique line identifier.
    pub id: OrderItemId,
    /// Product bought.
    pub product_id: ProductId,
    /// Product name at checkout.
    pub product_name: String,
    /// Effective unit price at checkout.
    pub unit_price: Money,
    pub quantity: u32,
    /// unit_price * quantity.
    pub subtotal: Money,
    /// Product owner at checkout. Never changes afterwards.
    pub seller: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn item(seller: &str, cents: i64, quantity: u32) -> OrderItem {
        OrderItem {
            id: OrderItemId::generate(),
            product_id: ProductId::generate(),
            product_name: "x".into(),
            unit_price: Money::new(cents, Currency::ARS),
            quantity,
            subtotal: Money::new(cents * i64::from(quantity), Currency::ARS),
            seller: UserId::new(seller),
        }
    }

    fn order(items: Vec<OrderItem>) -> Order {
        Order {
            id: OrderId::generate(),
            order_number: "ABCDEF1234".into(),
            sequence: 1,
            buyer: UserId::new("usr_alice"),
            status: OrderStatus::Pending,
            items,
            subtotal: Money::zero(Currency::ARS),
            shipping_cost: Money::zero(Currency::ARS),
            total: Money::zero(Currency::ARS),
            shipping: ShippingInfo {
                address: "Calle 1".into(),
                city: "Rosario".into(),
                country: "Argentina".into(),
                phone: "555".into(),
            },
            payment_method: PaymentMethod::Transfer,
            paid: true,
            paid_at: Some(0),
            created_at: 0,
            updated_at: 0,
            cancelled_at: None,
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!(matches!(
            "lost".parse::<OrderStatus>(),
            Err(CommerceError::Validation(_))
        ));
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_can_cancel() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Processing.can_cancel());
        assert!(!OrderStatus::Shipped.can_cancel());
        assert!(!OrderStatus::Delivered.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!(
            "paypal".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::Paypal
        );
        assert!("cash".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_seller_total_counts_own_lines_only() {
        let order = order(vec![
            item("usr_bob", 100, 2),
            item("usr_carol", 999, 1),
            item("usr_bob", 50, 1),
        ]);
        let bob = UserId::new("usr_bob");

        assert_eq!(order.seller_total(&bob).amount_cents, 250);
        assert_eq!(order.items_for(&bob).count(), 2);
        assert_eq!(order.sellers().len(), 2);
        assert!(order.is_visible_to(&bob));
        assert!(order.is_visible_to(&UserId::new("usr_alice")));
        assert!(!order.is_visible_to(&UserId::new("usr_dave")));
    }
}
