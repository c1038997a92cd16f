//! Order commands: checkout, purchases, sales.

use std::collections::HashMap;

use anyhow::Result;
use dialoguer::Confirm;
use mercado_commerce::orders::{CheckoutForm, Order, OrderItem, OrderStatus};
use mercado_commerce::UserId;

use super::users::usernames;
use super::{resolve_order, OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::{format_timestamp, status_badge, truncate};

/// Run the orders command.
pub fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    let market = ctx.market()?;
    let user = ctx.actor(&market)?;

    match args.command {
        OrdersCommand::Checkout {
            address,
            city,
            country,
            phone,
            payment,
        } => {
            let form = CheckoutForm {
                address,
                city,
                country,
                phone,
                payment_method: payment,
            };
            let order = market.checkout(&user, &form)?;
            if ctx.output.is_json() {
                ctx.output.json(&order);
            } else {
                ctx.output.success(&format!(
                    "Order {} placed, total {}",
                    order.order_number,
                    order.total.display()
                ));
            }
        }
        OrdersCommand::List => {
            let orders = market.orders_for_buyer(&user)?;
            if ctx.output.is_json() {
                ctx.output.json(&orders);
                return Ok(());
            }
            ctx.output.header(&format!("Your orders ({})", orders.len()));
            print_order_rows(orders.iter().map(|o| (o, o.total.display())), ctx);
        }
        OrdersCommand::Show { order } => {
            let id = resolve_order(&market, &order)?;
            let order = market.order_detail(&user, &id)?;
            if ctx.output.is_json() {
                ctx.output.json(&order);
                return Ok(());
            }
            let names = usernames(&market)?;
            print_order(&order, &order.items, &names, ctx);
            ctx.output.kv("subtotal", &order.subtotal.display());
            ctx.output.kv("shipping", &order.shipping_cost.display());
            ctx.output.kv("total", &order.total.display());
        }
        OrdersCommand::Cancel { order, yes } => {
            let id = resolve_order(&market, &order)?;
            let current = market.order_detail(&user, &id)?;

            if !yes && !ctx.output.is_json() {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Cancel order {} ({})?",
                        current.order_number,
                        current.total.display()
                    ))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    ctx.output.warn("Order left as is");
                    return Ok(());
                }
            }

            let cancelled = market.cancel_order(&user, &id)?;
            if ctx.output.is_json() {
                ctx.output.json(&cancelled);
            } else {
                ctx.output.success(&format!(
                    "Order {} cancelled; stock returned",
                    cancelled.order_number
                ));
            }
        }
        OrdersCommand::Status { order, status } => {
            let id = resolve_order(&market, &order)?;
            let updated = market.update_order_status(&user, &id, &status)?;
            if ctx.output.is_json() {
                ctx.output.json(&updated);
            } else {
                ctx.output.success(&format!(
                    "Order {} is now {}",
                    updated.order_number,
                    status_badge(updated.status)
                ));
            }
        }
        OrdersCommand::Sales { status } => {
            let filter = status.as_deref().map(str::parse::<OrderStatus>).transpose()?;
            let dashboard = market.seller_orders(&user)?;
            let rows: Vec<_> = dashboard
                .orders
                .iter()
                .filter(|o| filter.map_or(true, |s| o.order.status == s))
                .collect();

            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "orders": rows,
                    "counts": dashboard.counts,
                }));
                return Ok(());
            }

            ctx.output.header(&format!("Sales ({})", dashboard.counts.total));
            for status in OrderStatus::ALL {
                ctx.output
                    .kv(status.display_name(), &dashboard.counts.get(status).to_string());
            }
            ctx.output.info("");
            print_order_rows(
                rows.iter().map(|o| (&o.order, o.seller_total.display())),
                ctx,
            );
        }
        OrdersCommand::Sale { order } => {
            let id = resolve_order(&market, &order)?;
            let sale = market.seller_order_detail(&user, &id)?;
            if ctx.output.is_json() {
                ctx.output.json(&sale);
                return Ok(());
            }
            let names = usernames(&market)?;
            print_order(&sale.order, &sale.items, &names, ctx);
            ctx.output.kv("your total", &sale.seller_total.display());
        }
    }

    Ok(())
}

fn print_order_rows<'a>(rows: impl Iterator<Item = (&'a Order, String)>, ctx: &Context) {
    let widths = [12, 18, 12, 6, 14];
    ctx.output
        .table_row(&["NUMBER", "PLACED", "STATUS", "ITEMS", "TOTAL"], &widths);
    for (order, total) in rows {
        ctx.output.table_row(
            &[
                &order.order_number,
                &format_timestamp(order.created_at),
                &status_badge(order.status),
                &order.item_count().to_string(),
                &total,
            ],
            &widths,
        );
    }
}

fn print_order(order: &Order, items: &[OrderItem], names: &HashMap<UserId, String>, ctx: &Context) {
    let name_of = |id: &UserId| names.get(id).cloned().unwrap_or_else(|| id.to_string());

    ctx.output.header(&format!("Order {}", order.order_number));
    ctx.output.kv("status", &status_badge(order.status));
    ctx.output.kv("placed", &format_timestamp(order.created_at));
    ctx.output.kv("buyer", &name_of(&order.buyer));
    ctx.output.kv(
        "ship to",
        &format!(
            "{}, {}, {} ({})",
            order.shipping.address, order.shipping.city, order.shipping.country, order.shipping.phone
        ),
    );
    ctx.output.kv("payment", order.payment_method.display_name());
    if let Some(at) = order.cancelled_at {
        ctx.output.kv("cancelled", &format_timestamp(at));
    }

    let widths = [26, 12, 5, 14, 14];
    ctx.output
        .table_row(&["PRODUCT", "UNIT", "QTY", "SUBTOTAL", "SELLER"], &widths);
    for item in items {
        ctx.output.table_row(
            &[
                &truncate(&item.product_name, 26),
                &item.unit_price.display(),
                &item.quantity.to_string(),
                &item.subtotal.display(),
                &name_of(&item.seller),
            ],
            &widths,
        );
    }
}
