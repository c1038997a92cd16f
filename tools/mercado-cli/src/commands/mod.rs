//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod orders;
pub mod reviews;
pub mod users;
pub mod wishlist;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use mercado_commerce::{Currency, Marketplace, Money, OrderId};

/// Arguments for the users command.
#[derive(Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Subcommand)]
pub enum UsersCommand {
    /// Create an account.
    Register {
        /// Unique username.
        username: String,
        /// Email address.
        #[arg(short, long)]
        email: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
    /// Show a public profile with reputation.
    Show {
        /// Username to look up.
        username: String,
    },
    /// Edit your own profile (needs --as).
    Edit {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Picture URL or path.
        #[arg(long)]
        picture: Option<String>,
    },
    /// List all accounts.
    List,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Create a category.
    AddCategory {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Parent category ID.
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Show the category tree.
    Categories,
    /// List a product for sale (needs --as).
    AddProduct {
        name: String,
        /// Category ID.
        #[arg(short, long)]
        category: String,
        /// Price, e.g. 1499.90
        #[arg(short, long)]
        price: String,
        #[arg(short, long, default_value = "0")]
        stock: u32,
        #[arg(short, long, default_value = "")]
        brand: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Discount percentage.
        #[arg(long)]
        discount: Option<u8>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Edit one of your products (needs --as).
    EditProduct {
        /// Product ID.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        price: Option<String>,
        /// Absolute stock level.
        #[arg(short, long)]
        stock: Option<u32>,
        #[arg(short, long)]
        brand: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Discount percentage; 0 ends the sale.
        #[arg(long)]
        discount: Option<u8>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Add units to one of your products (needs --as).
    Restock {
        /// Product ID.
        id: String,
        quantity: u32,
    },
    /// Browse products.
    List {
        /// Text to search in product names.
        #[arg(short, long)]
        query: Option<String>,
        /// Category ID (includes subcategories).
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        min_price: Option<String>,
        #[arg(long)]
        max_price: Option<String>,
        #[arg(short, long)]
        brand: Option<String>,
        /// Include products that are out of stock.
        #[arg(long)]
        all: bool,
        /// newest, price_asc, price_desc or name_asc.
        #[arg(long, default_value = "newest")]
        sort: String,
        #[arg(long, default_value = "1")]
        page: usize,
        #[arg(long, default_value = "12")]
        per_page: usize,
    },
    /// Show a product and related products.
    Show {
        /// Product ID.
        id: String,
    },
    /// Most sold products.
    BestSellers {
        #[arg(short, long, default_value = "8")]
        limit: usize,
    },
    /// Products on sale.
    OnSale {
        #[arg(short, long, default_value = "8")]
        limit: usize,
    },
    /// Stock changes of a product.
    History {
        /// Product ID.
        id: String,
    },
}

/// Arguments for the cart command (needs --as).
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart with live prices.
    Show,
    /// Add a product.
    Add {
        /// Product ID.
        product: String,
        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },
    /// Set the quantity of a line; 0 removes it.
    Update {
        /// Cart item ID.
        item: String,
        quantity: u32,
    },
    /// Remove a line.
    Remove {
        /// Cart item ID.
        item: String,
    },
    /// Empty the cart.
    Clear,
}

/// Arguments for the orders command (needs --as).
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// Turn the cart into an order.
    Checkout {
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        city: Option<String>,
        /// Defaults to the configured country.
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// credit_card, debit_card, paypal or transfer.
        #[arg(long)]
        payment: Option<String>,
    },
    /// Your purchases, newest first.
    List,
    /// Show one of your orders.
    Show {
        /// Order ID or order number.
        order: String,
    },
    /// Cancel one of your orders.
    Cancel {
        /// Order ID or order number.
        order: String,
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Move an order you sold into to a new status.
    Status {
        /// Order ID or order number.
        order: String,
        /// pending, processing, shipped, delivered or cancelled.
        status: String,
    },
    /// Orders containing your products.
    Sales {
        /// Only orders in this status.
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show your part of a sold order.
    Sale {
        /// Order ID or order number.
        order: String,
    },
}

/// Arguments for the reviews command.
#[derive(Args)]
pub struct ReviewsArgs {
    #[command(subcommand)]
    pub command: ReviewsCommand,
}

#[derive(Subcommand)]
pub enum ReviewsCommand {
    /// Rate a user you have traded with (needs --as).
    Submit {
        /// Username to review.
        username: String,
        /// 1 to 5.
        rating: i64,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Users you can review (needs --as).
    Candidates,
    /// Reviews a user has received.
    For {
        username: String,
    },
}

/// Arguments for the wishlist command (needs --as).
#[derive(Args)]
pub struct WishlistArgs {
    #[command(subcommand)]
    pub command: Option<WishlistCommand>,
}

#[derive(Subcommand)]
pub enum WishlistCommand {
    /// Show favorites.
    List,
    /// Add a favorite.
    Add {
        /// Product ID.
        product: String,
    },
    /// Remove a favorite.
    Remove {
        /// Product ID.
        product: String,
    },
    /// Flip a product in or out of the wishlist.
    Toggle {
        /// Product ID.
        product: String,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// Parse a price typed on the command line.
pub(crate) fn parse_price(input: &str, currency: Currency) -> Result<Money> {
    Money::parse(input, currency).ok_or_else(|| anyhow!("Invalid price: {}", input))
}

/// Accept either an order ID or an order number.
pub(crate) fn resolve_order(market: &Marketplace, reference: &str) -> Result<OrderId> {
    let prefix = format!("{}_", OrderId::PREFIX);
    if reference.starts_with(&prefix) {
        return Ok(OrderId::new(reference));
    }
    Ok(market.order_id_by_number(reference)?)
}
