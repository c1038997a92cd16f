//! Order ledger: checkout, cancellation and status changes.

use crate::cart::price_cart;
use crate::catalog::{AdjustmentReason, StockAdjustment};
use crate::config::CommerceConfig;
use crate::error::{CommerceError, Result};
use crate::ids::{OrderId, OrderItemId, UserId};
use crate::orders::number::{random_order_number, unique_order_number};
use crate::orders::{CheckoutForm, Order, OrderItem, OrderStatus, PaymentMethod, ShippingInfo};
use crate::state::{current_timestamp, MarketState};

/// Turn `buyer`'s cart into an order.
///
/// Every line freezes its seller from the product owner, stock is
/// decremented, the cart is cleared and the order is marked paid. On error
/// nothing has been changed.
pub fn create_order(
    state: &mut MarketState,
    config: &CommerceConfig,
    buyer: &UserId,
    form: &CheckoutForm,
) -> Result<Order> {
    if state.cart(buyer)?.is_empty() {
        return Err(CommerceError::EmptyCart);
    }
    let (shipping, payment_method) = form.validate(config)?;

    place_order(state, config, buyer, shipping, payment_method).map_err(|err| match err {
        CommerceError::InsufficientStock { .. } | CommerceError::OrderCreation(_) => err,
        other => CommerceError::OrderCreation(other.to_string()),
    })
}

fn place_order(
    state: &mut MarketState,
    config: &CommerceConfig,
    buyer: &UserId,
    shipping: ShippingInfo,
    payment_method: PaymentMethod,
) -> Result<Order> {
    let pricing = price_cart(state, state.cart(buyer)?, config.currency)?;

    // Check every line before touching any stock.
    for line in &pricing.lines {
        let product = state.product(&line.product_id)?;
        if !product.can_fulfill(line.quantity) {
            return Err(CommerceError::InsufficientStock {
                product: product.name.clone(),
                requested: line.quantity,
                available: product.stock,
            });
        }
    }

    let shipping_cost = config.shipping_cost();
    let total = pricing
        .total
        .try_add(&shipping_cost)
        .ok_or_else(|| CommerceError::OrderCreation("order total overflows".to_string()))?;

    let order_number = unique_order_number(
        config.order_number_attempts,
        |candidate| state.orders.find(|o| o.order_number == candidate).is_some(),
        || random_order_number(config.order_number_length),
    )?;

    let order_id = OrderId::generate();
    let mut items = Vec::with_capacity(pricing.lines.len());
    for line in &pricing.lines {
        let product = state.product_mut(&line.product_id)?;
        product.reserve(line.quantity)?;
        items.push(OrderItem {
            id: OrderItemId::generate(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            subtotal: line.subtotal,
            seller: product.owner.clone(),
        });
        state.stock_log.push(
            StockAdjustment::new(
                line.product_id.clone(),
                -i64::from(line.quantity),
                AdjustmentReason::Sale,
            )
            .for_order(&order_id),
        );
    }

    state.cart_mut(buyer)?.clear();

    let now = current_timestamp();
    let order = Order {
        id: order_id,
        order_number,
        sequence: state.orders.len() as u64 + 1,
        buyer: buyer.clone(),
        status: OrderStatus::Pending,
        items,
        subtotal: pricing.total,
        shipping_cost,
        total,
        shipping,
        payment_method,
        paid: true,
        paid_at: Some(now),
        created_at: now,
        updated_at: now,
        cancelled_at: None,
    };
    state
        .orders
        .insert_unique("orders", order.id.clone(), order.clone())?;

    tracing::info!(
        order = %order.order_number,
        buyer = %buyer,
        lines = order.items.len(),
        total = %order.total,
        "created order"
    );
    Ok(order)
}

/// Cancel an order. Only the buyer may cancel, and only while pending or
/// processing. Stock goes back to every product that still exists.
pub fn cancel_order(state: &mut MarketState, actor: &UserId, order_id: &OrderId) -> Result<Order> {
    let order = state.order(order_id)?;
    if &order.buyer != actor {
        tracing::warn!(order = %order.order_number, actor = %actor, "rejected cancel by non-buyer");
        return Err(CommerceError::Permission(
            "only the buyer can cancel an order".to_string(),
        ));
    }
    apply_cancellation(state, order_id)
}

/// Change an order's status. Only sellers with items in the order may do
/// this.
pub fn update_order_status(
    state: &mut MarketState,
    actor: &UserId,
    order_id: &OrderId,
    new_status: &str,
) -> Result<Order> {
    let order = state.order(order_id)?;
    if !order.has_seller(actor) {
        tracing::warn!(order = %order.order_number, actor = %actor, "rejected status change by non-seller");
        return Err(CommerceError::Permission(
            "only sellers in this order can change its status".to_string(),
        ));
    }
    let status: OrderStatus = new_status.parse()?;

    if order.status == OrderStatus::Cancelled {
        return Err(CommerceError::InvalidState(format!(
            "order {} is cancelled",
            order.order_number
        )));
    }
    if status == OrderStatus::Cancelled {
        return apply_cancellation(state, order_id);
    }

    let order = state.order_mut(order_id)?;
    let previous = order.status;
    order.status = status;
    order.updated_at = current_timestamp();

    tracing::info!(
        order = %order.order_number,
        from = %previous,
        to = %status,
        "changed order status"
    );
    Ok(order.clone())
}

fn apply_cancellation(state: &mut MarketState, order_id: &OrderId) -> Result<Order> {
    let order = state.order(order_id)?;
    if !order.status.can_cancel() {
        return Err(CommerceError::InvalidState(format!(
            "order {} is {} and can no longer be cancelled",
            order.order_number, order.status
        )));
    }
    let returns: Vec<_> = order
        .items
        .iter()
        .map(|i| (i.product_id.clone(), i.quantity))
        .collect();

    for (product_id, quantity) in returns {
        // Products deleted since checkout get nothing back.
        if let Some(product) = state.products.get_mut(&product_id) {
            product.release(quantity)?;
            state.stock_log.push(
                StockAdjustment::new(product_id, i64::from(quantity), AdjustmentReason::Cancellation)
                    .for_order(order_id),
            );
        }
    }

    let now = current_timestamp();
    let order = state.order_mut(order_id)?;
    order.status = OrderStatus::Cancelled;
    order.cancelled_at = Some(now);
    order.updated_at = now;

    tracing::info!(order = %order.order_number, "cancelled order");
    Ok(order.clone())
}

/// Orders placed by `buyer`, newest first.
pub fn orders_for_buyer(state: &MarketState, buyer: &UserId) -> Vec<Order> {
    let mut orders: Vec<Order> = state
        .orders
        .values()
        .filter(|o| &o.buyer == buyer)
        .cloned()
        .collect();
    orders.sort_by(|a, b| b.sequence.cmp(&a.sequence));
    orders
}

/// Full order, visible to its buyer and to sellers in it.
pub fn order_detail(state: &MarketState, actor: &UserId, order_id: &OrderId) -> Result<Order> {
    let order = state.order(order_id)?;
    if !order.is_visible_to(actor) {
        return Err(CommerceError::Permission(format!(
            "order {} belongs to someone else",
            order.order_number
        )));
    }
    Ok(order.clone())
}
