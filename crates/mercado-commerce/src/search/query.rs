//! Listing query builder.

use crate::catalog::Product;
use crate::ids::CategoryId;
use crate::money::Money;
use crate::search::Filter;
use crate::state::MarketState;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort options for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Sort by newest first.
    #[default]
    Newest,
    /// Sort by effective price, low to high.
    PriceAsc,
    /// Sort by effective price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::Newest,
        SortOption::PriceAsc,
        SortOption::PriceDesc,
        SortOption::NameAsc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Newest => "newest",
            SortOption::PriceAsc => "price_asc",
            SortOption::PriceDesc => "price_desc",
            SortOption::NameAsc => "name",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Newest => "Newest",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::NameAsc => "Name: A-Z",
        }
    }

    /// Parse a sort key; unknown keys fall back to newest.
    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == key)
            .unwrap_or_default()
    }

    pub(crate) fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOption::Newest => b
                .created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id)),
            SortOption::PriceAsc => a
                .effective_price()
                .amount_cents
                .cmp(&b.effective_price().amount_cents),
            SortOption::PriceDesc => b
                .effective_price()
                .amount_cents
                .cmp(&a.effective_price().amount_cents),
            SortOption::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

/// A product listing query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Filters to apply (all must match).
    pub filters: Vec<Filter>,
    /// Sort option.
    pub sort: SortOption,
    /// Current page (1-indexed).
    pub page: usize,
    /// Items per page.
    pub per_page: usize,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductQuery {
    /// Create a query listing in-stock products, newest first.
    pub fn new() -> Self {
        Self {
            filters: vec![Filter::InStock],
            sort: SortOption::Newest,
            page: 1,
            per_page: 12,
        }
    }

    /// Set the text query (matched against names).
    pub fn with_text(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        if !q.trim().is_empty() {
            self.filters.push(Filter::Text(q));
        }
        self
    }

    /// Restrict to a category and its subcategories.
    pub fn with_category(mut self, id: CategoryId) -> Self {
        self.filters.push(Filter::Category(id));
        self
    }

    /// Restrict the effective price.
    pub fn with_price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        if min.is_some() || max.is_some() {
            self.filters.push(Filter::price_range(min, max));
        }
        self
    }

    /// Restrict to brands containing `brand`.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        let brand = brand.into();
        if !brand.trim().is_empty() {
            self.filters.push(Filter::Brand(brand));
        }
        self
    }

    /// Include products that are out of stock.
    pub fn include_out_of_stock(mut self) -> Self {
        self.filters.retain(|f| f != &Filter::InStock);
        self
    }

    /// Add a filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Set pagination.
    pub fn with_pagination(mut self, page: usize, per_page: usize) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.clamp(1, 100);
        self
    }

    /// Number of items skipped before the current page.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.per_page)
    }

    /// Check a product against every filter.
    pub fn matches(&self, state: &MarketState, product: &Product) -> bool {
        self.filters.iter().all(|f| f.matches(state, product))
    }
}
