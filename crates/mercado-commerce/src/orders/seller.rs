//! Seller-scoped order views.

use crate::error::{CommerceError, Result};
use crate::ids::{OrderId, UserId};
use crate::money::Money;
use crate::orders::{Order, OrderItem, OrderStatus};
use crate::state::MarketState;
use serde::{Deserialize, Serialize};

/// An order as one seller sees it: only their own lines and total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderWithSellerTotal {
    pub order: Order,
    /// The seller's lines in this order.
    pub items: Vec<OrderItem>,
    /// Sum of the seller's line subtotals.
    pub seller_total: Money,
}

impl OrderWithSellerTotal {
    fn new(order: &Order, seller: &UserId) -> Self {
        Self {
            items: order.items_for(seller).cloned().collect(),
            seller_total: order.seller_total(seller),
            order: order.clone(),
        }
    }
}

/// Order counts by status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub shipped: usize,
    pub delivered: usize,
    pub cancelled: usize,
    pub total: usize,
}

impl StatusCounts {
    fn record(&mut self, status: OrderStatus) {
        match status {
            OrderStatus::Pending => self.pending += 1,
            OrderStatus::Processing => self.processing += 1,
            OrderStatus::Shipped => self.shipped += 1,
            OrderStatus::Delivered => self.delivered += 1,
            OrderStatus::Cancelled => self.cancelled += 1,
        }
        self.total += 1;
    }

    /// Count for one status.
    pub fn get(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::Processing => self.processing,
            OrderStatus::Shipped => self.shipped,
            OrderStatus::Delivered => self.delivered,
            OrderStatus::Cancelled => self.cancelled,
        }
    }
}

/// Everything a seller needs to work their orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SellerDashboard {
    /// Orders containing the seller's items, newest first.
    pub orders: Vec<OrderWithSellerTotal>,
    pub counts: StatusCounts,
}

/// Orders with at least one line sold by `seller`.
pub fn seller_orders(state: &MarketState, seller: &UserId) -> SellerDashboard {
    let mut orders: Vec<&Order> = state
        .orders
        .values()
        .filter(|o| o.has_seller(seller))
        .collect();
    orders.sort_by(|a, b| b.sequence.cmp(&a.sequence));

    let mut counts = StatusCounts::default();
    let orders = orders
        .into_iter()
        .map(|order| {
            counts.record(order.status);
            OrderWithSellerTotal::new(order, seller)
        })
        .collect();

    tracing::debug!(seller = %seller, total = counts.total, "built seller dashboard");
    SellerDashboard { orders, counts }
}

/// One order as `seller` sees it.
pub fn seller_order_detail(
    state: &MarketState,
    seller: &UserId,
    order_id: &OrderId,
) -> Result<OrderWithSellerTotal> {
    let order = state.order(order_id)?;
    if !order.has_seller(seller) {
        return Err(CommerceError::Permission(format!(
            "no items of yours in order {}",
            order.order_number
        )));
    }
    Ok(OrderWithSellerTotal::new(order, seller))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{register, SignupForm};
    use crate::cart::add_to_cart;
    use crate::catalog::{create_category, create_product, ProductDraft};
    use crate::config::CommerceConfig;
    use crate::ids::{CategoryId, ProductId};
    use crate::money::Currency;
    use crate::orders::{cancel_order, create_order, CheckoutForm};

    fn user(state: &mut MarketState, name: &str) -> UserId {
        register(
            state,
            SignupForm {
                username: name.into(),
                email: format!("{}@example.com", name),
                ..SignupForm::default()
            },
        )
        .unwrap()
        .id
    }

    fn product(state: &mut MarketState, owner: &UserId, cat: &CategoryId, cents: i64) -> ProductId {
        create_product(
            state,
            &CommerceConfig::default(),
            owner,
            ProductDraft {
                name: format!("item {}", cents),
                category_id: cat.clone(),
                price: Money::new(cents, Currency::ARS),
                stock: 10,
                ..ProductDraft::default()
            },
        )
        .unwrap()
        .id
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            address: Some("Calle 1".into()),
            city: Some("Salta".into()),
            phone: Some("555".into()),
            payment_method: Some("paypal".into()),
            ..CheckoutForm::default()
        }
    }

    #[test]
    fn test_multi_seller_order_split() {
        let mut state = MarketState::default();
        let config = CommerceConfig::default();
        let alice = user(&mut state, "alice");
        let bob = user(&mut state, "bob");
        let carol = user(&mut state, "carol");
        let cat = create_category(&mut state, "Varios", "", None).unwrap().id;
        let from_bob = product(&mut state, &bob, &cat, 300);
        let from_carol = product(&mut state, &carol, &cat, 700);

        add_to_cart(&mut state, &alice, &from_bob, 2).unwrap();
        add_to_cart(&mut state, &alice, &from_carol, 1).unwrap();
        let first = create_order(&mut state, &config, &alice, &form()).unwrap();
        assert_eq!(first.total.amount_cents, 1300);

        add_to_cart(&mut state, &alice, &from_carol, 1).unwrap();
        let second = create_order(&mut state, &config, &alice, &form()).unwrap();
        cancel_order(&mut state, &alice, &second.id).unwrap();

        let bob_view = seller_orders(&state, &bob);
        assert_eq!(bob_view.orders.len(), 1);
        assert_eq!(bob_view.orders[0].seller_total.amount_cents, 600);
        assert_eq!(bob_view.orders[0].items.len(), 1);
        assert_eq!(bob_view.counts.pending, 1);

        let carol_view = seller_orders(&state, &carol);
        assert_eq!(carol_view.orders.len(), 2);
        assert_eq!(carol_view.orders[0].order.id, second.id);
        assert_eq!(carol_view.counts.get(OrderStatus::Cancelled), 1);
        assert_eq!(carol_view.counts.total, 2);

        let detail = seller_order_detail(&state, &carol, &first.id).unwrap();
        assert_eq!(detail.seller_total.amount_cents, 700);
        assert!(matches!(
            seller_order_detail(&state, &bob, &second.id),
            Err(CommerceError::Permission(_))
        ));
    }

    #[test]
    fn test_ownership_change_keeps_past_sales() {
        let mut state = MarketState::default();
        let config = CommerceConfig::default();
        let alice = user(&mut state, "alice");
        let bob = user(&mut state, "bob");
        let carol = user(&mut state, "carol");
        let cat = create_category(&mut state, "Varios", "", None).unwrap().id;
        let item = product(&mut state, &bob, &cat, 500);

        add_to_cart(&mut state, &alice, &item, 1).unwrap();
        let order = create_order(&mut state, &config, &alice, &form()).unwrap();

        state.product_mut(&item).unwrap().owner = carol.clone();

        assert_eq!(seller_orders(&state, &bob).orders.len(), 1);
        assert!(seller_orders(&state, &carol).orders.is_empty());
        assert!(seller_order_detail(&state, &bob, &order.id).is_ok());
    }
}
