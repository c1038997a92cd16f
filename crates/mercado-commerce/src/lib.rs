//! Marketplace domain types and logic for Mercado.
//!
//! A multi-vendor marketplace core:
//!
//! - **Accounts**: registration, profiles, public profile pages
//! - **Catalog**: categories, products, stock bookkeeping
//! - **Cart**: one basket per user, priced from the live catalog
//! - **Orders**: checkout into an immutable ledger with per-line sellers
//! - **Reviews**: ratings gated on delivered orders, reputation
//! - **Wishlist**: favorite products
//! - **Search**: filtered listings and storefront shelves
//!
//! Operations are plain functions over a [`MarketState`]. The
//! [`Marketplace`] service runs each of them as one store transaction, so a
//! failed checkout never leaves a half-written order behind.
//!
//! # Example
//!
//! ```rust
//! use mercado_commerce::prelude::*;
//!
//! let market = Marketplace::in_memory(CommerceConfig::default())?;
//! let seller = market.register(SignupForm {
//!     username: "bob".into(),
//!     email: "bob@example.com".into(),
//!     ..SignupForm::default()
//! })?;
//! let books = market.create_category("Libros", "", None)?;
//! let product = market.create_product(&seller.id, ProductDraft {
//!     name: "Rayuela".into(),
//!     category_id: books.id,
//!     price: Money::new(100, Currency::ARS),
//!     stock: 5,
//!     ..ProductDraft::default()
//! })?;
//!
//! let buyer = market.register(SignupForm {
//!     username: "alice".into(),
//!     email: "alice@example.com".into(),
//!     ..SignupForm::default()
//! })?;
//! market.add_to_cart(&buyer.id, &product.id, 2)?;
//! let order = market.checkout(&buyer.id, &CheckoutForm {
//!     address: Some("Calle Falsa 123".into()),
//!     city: Some("Rosario".into()),
//!     phone: Some("341-555-0100".into()),
//!     payment_method: Some("transfer".into()),
//!     ..CheckoutForm::default()
//! })?;
//!
//! assert_eq!(order.subtotal.amount_cents, 200);
//! assert_eq!(order.items[0].seller, seller.id);
//! assert_eq!(market.product(&product.id)?.stock, 3);
//! # Ok::<(), CommerceError>(())
//! ```

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;
pub mod orders;
pub mod reviews;
pub mod search;
pub mod wishlist;

mod service;
mod state;

pub use config::CommerceConfig;
pub use error::{CommerceError, Result};
pub use ids::*;
pub use money::{Currency, Money};
pub use service::Marketplace;
pub use state::MarketState;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::CommerceConfig;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::service::Marketplace;
    pub use crate::state::MarketState;

    // Accounts
    pub use crate::accounts::{Profile, ProfileUpdate, ProfileView, SignupForm, UserAccount};

    // Catalog
    pub use crate::catalog::{AdjustmentReason, Category, Product, ProductDraft, StockAdjustment};

    // Cart
    pub use crate::cart::{Cart, CartItem, CartPricing, LinePricing};

    // Orders
    pub use crate::orders::{
        CheckoutForm, Order, OrderItem, OrderStatus, OrderWithSellerTotal, PaymentMethod,
        SellerDashboard, ShippingInfo, StatusCounts,
    };

    // Reviews
    pub use crate::reviews::{Rating, Reputation, Review, ReviewCandidate, ReviewOutcome};

    // Wishlist
    pub use crate::wishlist::{Favorite, WishlistEntry};

    // Search
    pub use crate::search::{Filter, Page, Pagination, ProductQuery, SortOption};
}
