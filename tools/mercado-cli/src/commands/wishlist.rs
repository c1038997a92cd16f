//! Wishlist commands.

use anyhow::Result;
use mercado_commerce::ProductId;

use super::{WishlistArgs, WishlistCommand};
use crate::context::Context;
use crate::output::{format_timestamp, truncate};

/// Run the wishlist command.
pub fn run(args: WishlistArgs, ctx: &Context) -> Result<()> {
    let market = ctx.market()?;
    let user = ctx.actor(&market)?;

    let message = match args.command.unwrap_or(WishlistCommand::List) {
        WishlistCommand::List => None,
        WishlistCommand::Add { product } => {
            let added = market.add_favorite(&user, &ProductId::new(product))?;
            Some(if added { "Added to wishlist" } else { "Already in wishlist" })
        }
        WishlistCommand::Remove { product } => {
            let removed = market.remove_favorite(&user, &ProductId::new(product))?;
            Some(if removed { "Removed from wishlist" } else { "Not in wishlist" })
        }
        WishlistCommand::Toggle { product } => {
            let now = market.toggle_favorite(&user, &ProductId::new(product))?;
            Some(if now { "Added to wishlist" } else { "Removed from wishlist" })
        }
    };

    if let Some(message) = message {
        ctx.output.success(message);
    }

    let entries = market.list_favorites(&user)?;
    if ctx.output.is_json() {
        ctx.output.json(&entries);
        return Ok(());
    }

    ctx.output.header(&format!("Wishlist ({})", entries.len()));
    let widths = [22, 28, 14, 18];
    ctx.output.table_row(&["ID", "PRODUCT", "PRICE", "ADDED"], &widths);
    for entry in &entries {
        ctx.output.table_row(
            &[
                entry.product.id.as_str(),
                &truncate(&entry.product.name, 28),
                &entry.product.effective_price().display(),
                &format_timestamp(entry.favorite.added_at),
            ],
            &widths,
        );
    }
    Ok(())
}
