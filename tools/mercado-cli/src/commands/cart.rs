//! Cart commands.

use anyhow::Result;
use mercado_commerce::cart::CartPricing;
use mercado_commerce::{CartItemId, ProductId};

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::truncate;

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let market = ctx.market()?;
    let user = ctx.actor(&market)?;

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {}
        CartCommand::Add { product, quantity } => {
            let product = ProductId::new(product);
            market.add_to_cart(&user, &product, quantity)?;
            let name = market.product(&product)?.name;
            ctx.output.success(&format!("Added {} x {}", quantity, name));
        }
        CartCommand::Update { item, quantity } => {
            market.update_cart_item(&user, &CartItemId::new(item), quantity)?;
            if quantity == 0 {
                ctx.output.success("Removed item");
            } else {
                ctx.output.success(&format!("Quantity set to {}", quantity));
            }
        }
        CartCommand::Remove { item } => {
            market.remove_cart_item(&user, &CartItemId::new(item))?;
            ctx.output.success("Removed item");
        }
        CartCommand::Clear => {
            market.clear_cart(&user)?;
            ctx.output.success("Cart emptied");
        }
    }

    let cart = market.view_cart(&user)?;
    if ctx.output.is_json() {
        ctx.output.json(&cart);
    } else {
        print_cart(&cart, ctx);
    }
    Ok(())
}

fn print_cart(cart: &CartPricing, ctx: &Context) {
    ctx.output.header(&format!("Cart ({} item(s))", cart.item_count));
    if cart.lines.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    let widths = [20, 26, 14, 5, 14];
    ctx.output
        .table_row(&["ITEM", "PRODUCT", "UNIT", "QTY", "SUBTOTAL"], &widths);
    for line in &cart.lines {
        ctx.output.table_row(
            &[
                line.item_id.as_str(),
                &truncate(&line.product_name, 26),
                &line.unit_price.display(),
                &line.quantity.to_string(),
                &line.subtotal.display(),
            ],
            &widths,
        );
        if line.quantity > line.stock {
            ctx.output.warn(&format!(
                "Only {} of {} left in stock",
                line.stock, line.product_name
            ));
        }
    }
    if cart.has_discounts() {
        ctx.output.info("Sale prices applied");
    }
    ctx.output.kv("total", &cart.total.display());
}
