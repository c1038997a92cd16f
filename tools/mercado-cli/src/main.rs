//! Mercado CLI - run a multi-vendor marketplace from the terminal.
//!
//! Commands:
//! - `mercado users` - Register accounts, show and edit profiles
//! - `mercado catalog` - Categories, products, browsing
//! - `mercado cart` - The acting user's cart
//! - `mercado orders` - Checkout, purchases, sales
//! - `mercado reviews` - Ratings between trading partners
//! - `mercado wishlist` - Favorite products
//! - `mercado config` - Manage configuration
//!
//! Commands that act on behalf of someone take `--as <username>`.

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CartArgs, CatalogArgs, ConfigArgs, OrdersArgs, ReviewsArgs, UsersArgs, WishlistArgs};

/// Mercado CLI - Manage a multi-vendor marketplace
#[derive(Parser)]
#[command(name = "mercado")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// State file path (overrides the config file)
    #[arg(long, global = true)]
    store: Option<String>,

    /// Act as this user
    #[arg(long = "as", global = true, value_name = "USERNAME")]
    principal: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage accounts and profiles
    Users(UsersArgs),

    /// Manage categories and products
    Catalog(CatalogArgs),

    /// Manage your cart
    Cart(CartArgs),

    /// Check out and track orders
    Orders(OrdersArgs),

    /// Rate users you have traded with
    Reviews(ReviewsArgs),

    /// Manage your wishlist
    Wishlist(WishlistArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(
        cli.config.as_deref(),
        cli.store.as_deref(),
        cli.principal.clone(),
        output.clone(),
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose, &ctx.config.log.level);

    // Execute command
    let result = match cli.command {
        Commands::Users(args) => commands::users::run(args, &ctx),
        Commands::Catalog(args) => commands::catalog::run(args, &ctx),
        Commands::Cart(args) => commands::cart::run(args, &ctx),
        Commands::Orders(args) => commands::orders::run(args, &ctx),
        Commands::Reviews(args) => commands::reviews::run(args, &ctx),
        Commands::Wishlist(args) => commands::wishlist::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise the configured level, raised to info by `--verbose`.
fn init_tracing(verbose: bool, level: &str) {
    let default = if verbose { "info" } else { level };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
