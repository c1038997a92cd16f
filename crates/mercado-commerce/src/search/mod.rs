//! Catalog listings.
//!
//! Filtered, sorted and paginated product listings plus the storefront
//! shelves (related products, best sellers, on sale).

mod filter;
mod query;
mod results;

pub use filter::Filter;
pub use query::{ProductQuery, SortOption};
pub use results::{Page, Pagination};

use crate::catalog::Product;
use crate::error::Result;
use crate::ids::ProductId;
use crate::orders::OrderStatus;
use crate::state::MarketState;
use std::collections::HashMap;

/// Default size of the related products shelf.
pub const RELATED_LIMIT: usize = 4;
/// Default size of the best sellers and on-sale shelves.
pub const SHELF_LIMIT: usize = 8;

/// Run a listing query.
pub fn list_products(state: &MarketState, query: &ProductQuery) -> Page<Product> {
    let mut matching: Vec<Product> = state
        .products
        .values()
        .filter(|p| query.matches(state, p))
        .cloned()
        .collect();
    matching.sort_by(|a, b| query.sort.compare(a, b));

    tracing::debug!(total = matching.len(), page = query.page, "listed products");
    Page::slice(matching, query.page, query.per_page)
}

/// In-stock products from the same category, excluding the product itself.
pub fn related_products(
    state: &MarketState,
    product_id: &ProductId,
    limit: usize,
) -> Result<Vec<Product>> {
    let product = state.product(product_id)?;
    let mut related: Vec<Product> = state
        .products
        .values()
        .filter(|p| p.id != product.id && p.category_id == product.category_id && p.is_available())
        .cloned()
        .collect();
    related.sort_by(|a, b| SortOption::Newest.compare(a, b));
    related.truncate(limit);
    Ok(related)
}

/// Products ranked by units sold in delivered orders.
///
/// Falls back to the newest in-stock products when nothing has been
/// delivered yet.
pub fn best_sellers(state: &MarketState, limit: usize) -> Vec<Product> {
    let mut sold: HashMap<&ProductId, u64> = HashMap::new();
    for order in state
        .orders
        .values()
        .filter(|o| o.status == OrderStatus::Delivered)
    {
        for item in &order.items {
            *sold.entry(&item.product_id).or_default() += u64::from(item.quantity);
        }
    }

    if sold.is_empty() {
        let mut newest: Vec<Product> = state
            .products
            .values()
            .filter(|p| p.is_available())
            .cloned()
            .collect();
        newest.sort_by(|a, b| SortOption::Newest.compare(a, b));
        newest.truncate(limit);
        return newest;
    }

    let mut ranked: Vec<(u64, &Product)> = sold
        .into_iter()
        .filter_map(|(id, qty)| state.products.get(id).map(|p| (qty, p)))
        .collect();
    ranked.sort_by(|(qa, a), (qb, b)| qb.cmp(qa).then_with(|| a.id.cmp(&b.id)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(_, p)| p.clone())
        .collect()
}

/// In-stock products on sale, highest discount first.
pub fn on_sale(state: &MarketState, limit: usize) -> Vec<Product> {
    let mut deals: Vec<Product> = state
        .products
        .values()
        .filter(|p| p.on_sale && p.is_available())
        .cloned()
        .collect();
    deals.sort_by(|a, b| {
        b.discount_percent
            .cmp(&a.discount_percent)
            .then_with(|| SortOption::Newest.compare(a, b))
    });
    deals.truncate(limit);
    deals
}
