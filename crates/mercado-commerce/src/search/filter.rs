//! Product listing filters.

use crate::catalog::{category_scope, Product};
use crate::ids::CategoryId;
use crate::money::Money;
use crate::state::MarketState;
use serde::{Deserialize, Serialize};

/// A listing filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Category, including its subcategories.
    Category(CategoryId),
    /// Effective price range (inclusive).
    PriceRange {
        min: Option<Money>,
        max: Option<Money>,
    },
    /// Only products that can be bought.
    InStock,
    /// Case-insensitive substring of the brand.
    Brand(String),
    /// Case-insensitive substring of the name.
    Text(String),
}

impl Filter {
    /// Create a category filter.
    pub fn category(id: impl Into<CategoryId>) -> Self {
        Filter::Category(id.into())
    }

    /// Create a price range filter.
    pub fn price_range(min: Option<Money>, max: Option<Money>) -> Self {
        Filter::PriceRange { min, max }
    }

    /// Create an in-stock filter.
    pub fn in_stock() -> Self {
        Filter::InStock
    }

    /// Create a brand filter.
    pub fn brand(brand: impl Into<String>) -> Self {
        Filter::Brand(brand.into())
    }

    /// Create a text search filter.
    pub fn text(query: impl Into<String>) -> Self {
        Filter::Text(query.into())
    }

    /// Check a product against this filter.
    pub fn matches(&self, state: &MarketState, product: &Product) -> bool {
        match self {
            Filter::Category(id) => category_scope(state, id).contains(&product.category_id),
            Filter::PriceRange { min, max } => {
                let price = product.effective_price().amount_cents;
                min.map_or(true, |m| price >= m.amount_cents)
                    && max.map_or(true, |m| price <= m.amount_cents)
            }
            Filter::InStock => product.is_available(),
            Filter::Brand(brand) => contains_ignore_case(&product.brand, brand),
            Filter::Text(query) => contains_ignore_case(&product.name, query),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}
