//! Product catalog module.
//!
//! Contains types for products, categories, and stock.

mod category;
mod product;
mod stock;

pub use category::{category_scope, category_tree, create_category, Category};
pub use product::{create_product, restock, update_product, Product, ProductDraft, DEFAULT_BRAND};
pub use stock::{AdjustmentReason, StockAdjustment};
