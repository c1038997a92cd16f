//! The marketplace service: every operation as one store transaction.

use std::path::Path;

use mercado_db::Db;

use crate::accounts::{self, ProfileUpdate, ProfileView, SignupForm, UserAccount};
use crate::cart::{self, CartPricing};
use crate::catalog::{self, Category, Product, ProductDraft, StockAdjustment};
use crate::config::CommerceConfig;
use crate::error::{CommerceError, Result};
use crate::ids::{CartItemId, CategoryId, OrderId, ProductId, UserId};
use crate::orders::{self, CheckoutForm, Order, OrderWithSellerTotal, SellerDashboard};
use crate::reviews::{self, Reputation, ReviewCandidate, ReviewOutcome};
use crate::search::{self, Page, ProductQuery};
use crate::state::MarketState;
use crate::wishlist::{self, WishlistEntry};

/// Marketplace handle.
///
/// Holds the store and the settings. Cheap to share behind an `Arc`; all
/// writes are serialized by the store.
#[derive(Debug)]
pub struct Marketplace {
    db: Db<MarketState>,
    config: CommerceConfig,
}

impl Marketplace {
    /// Create a marketplace over an existing store.
    pub fn new(db: Db<MarketState>, config: CommerceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { db, config })
    }

    /// Create an empty marketplace that lives only in memory.
    pub fn in_memory(config: CommerceConfig) -> Result<Self> {
        Self::new(Db::in_memory(), config)
    }

    /// Open a marketplace persisted at `path`.
    pub fn open(path: impl AsRef<Path>, config: CommerceConfig) -> Result<Self> {
        Self::new(Db::open(path)?, config)
    }

    pub fn config(&self) -> &CommerceConfig {
        &self.config
    }

    /// Path of the state file, if persisted.
    pub fn store_path(&self) -> Option<&Path> {
        self.db.path()
    }

    /// Clone the whole committed state.
    pub fn snapshot(&self) -> Result<MarketState> {
        Ok(self.db.snapshot()?)
    }

    fn read<T>(&self, f: impl FnOnce(&MarketState) -> Result<T>) -> Result<T> {
        self.db.read(f)?
    }

    fn write<T>(&self, f: impl FnOnce(&mut MarketState, &CommerceConfig) -> Result<T>) -> Result<T> {
        self.db.transaction(|state| f(state, &self.config))
    }

    // Accounts

    pub fn register(&self, form: SignupForm) -> Result<UserAccount> {
        self.write(|state, _| accounts::register(state, form))
    }

    pub fn update_profile(&self, actor: &UserId, update: ProfileUpdate) -> Result<UserAccount> {
        self.write(|state, _| accounts::update_profile(state, actor, update))
    }

    pub fn profile_view(&self, viewer: Option<&UserId>, username: &str) -> Result<ProfileView> {
        self.read(|state| accounts::profile_view(state, viewer, username))
    }

    pub fn user_by_username(&self, username: &str) -> Result<UserAccount> {
        self.read(|state| state.user_by_username(username).cloned())
    }

    pub fn users(&self) -> Result<Vec<UserAccount>> {
        self.read(|state| {
            let mut users: Vec<UserAccount> = state.users.values().cloned().collect();
            users.sort_by(|a, b| a.username.cmp(&b.username));
            Ok(users)
        })
    }

    // Catalog

    pub fn create_category(
        &self,
        name: &str,
        description: &str,
        parent: Option<&CategoryId>,
    ) -> Result<Category> {
        self.write(|state, _| catalog::create_category(state, name, description, parent))
    }

    pub fn category_tree(&self) -> Result<Vec<(Category, Vec<Category>)>> {
        self.read(|state| Ok(catalog::category_tree(state)))
    }

    pub fn create_product(&self, actor: &UserId, draft: ProductDraft) -> Result<Product> {
        self.write(|state, config| catalog::create_product(state, config, actor, draft))
    }

    pub fn update_product(
        &self,
        actor: &UserId,
        product_id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product> {
        self.write(|state, config| catalog::update_product(state, config, actor, product_id, draft))
    }

    pub fn restock(&self, actor: &UserId, product_id: &ProductId, quantity: u32) -> Result<Product> {
        self.write(|state, _| catalog::restock(state, actor, product_id, quantity))
    }

    pub fn product(&self, product_id: &ProductId) -> Result<Product> {
        self.read(|state| state.product(product_id).cloned())
    }

    /// Stock changes of one product, oldest first.
    pub fn stock_history(&self, product_id: &ProductId) -> Result<Vec<StockAdjustment>> {
        self.read(|state| {
            state.product(product_id)?;
            Ok(state
                .stock_log
                .iter()
                .filter(|a| &a.product_id == product_id)
                .cloned()
                .collect())
        })
    }

    pub fn list_products(&self, query: &ProductQuery) -> Result<Page<Product>> {
        self.read(|state| Ok(search::list_products(state, query)))
    }

    pub fn related_products(&self, product_id: &ProductId, limit: usize) -> Result<Vec<Product>> {
        self.read(|state| search::related_products(state, product_id, limit))
    }

    pub fn best_sellers(&self, limit: usize) -> Result<Vec<Product>> {
        self.read(|state| Ok(search::best_sellers(state, limit)))
    }

    pub fn on_sale(&self, limit: usize) -> Result<Vec<Product>> {
        self.read(|state| Ok(search::on_sale(state, limit)))
    }

    // Cart

    pub fn add_to_cart(&self, user: &UserId, product_id: &ProductId, quantity: u32) -> Result<CartItemId> {
        self.write(|state, _| cart::add_to_cart(state, user, product_id, quantity))
    }

    pub fn update_cart_item(&self, user: &UserId, item_id: &CartItemId, quantity: u32) -> Result<()> {
        self.write(|state, _| cart::update_cart_item(state, user, item_id, quantity))
    }

    pub fn remove_cart_item(&self, user: &UserId, item_id: &CartItemId) -> Result<()> {
        self.write(|state, _| cart::remove_cart_item(state, user, item_id))
    }

    pub fn clear_cart(&self, user: &UserId) -> Result<()> {
        self.write(|state, _| cart::clear_cart(state, user))
    }

    pub fn view_cart(&self, user: &UserId) -> Result<CartPricing> {
        self.read(|state| cart::view_cart(state, user, self.config.currency))
    }

    // Orders

    /// Check out `buyer`'s cart.
    ///
    /// Store failures surface as [`CommerceError::OrderCreation`].
    pub fn checkout(&self, buyer: &UserId, form: &CheckoutForm) -> Result<Order> {
        self.write(|state, config| orders::create_order(state, config, buyer, form))
            .map_err(|err| match err {
                CommerceError::Storage(e) => {
                    tracing::error!(buyer = %buyer, error = %e, "failed to persist order");
                    CommerceError::OrderCreation(e.to_string())
                }
                other => other,
            })
    }

    pub fn cancel_order(&self, actor: &UserId, order_id: &OrderId) -> Result<Order> {
        self.write(|state, _| orders::cancel_order(state, actor, order_id))
    }

    pub fn update_order_status(&self, actor: &UserId, order_id: &OrderId, status: &str) -> Result<Order> {
        self.write(|state, _| orders::update_order_status(state, actor, order_id, status))
    }

    pub fn orders_for_buyer(&self, buyer: &UserId) -> Result<Vec<Order>> {
        self.read(|state| Ok(orders::orders_for_buyer(state, buyer)))
    }

    pub fn order_detail(&self, actor: &UserId, order_id: &OrderId) -> Result<Order> {
        self.read(|state| orders::order_detail(state, actor, order_id))
    }

    /// Resolve an order number to its ID.
    pub fn order_id_by_number(&self, number: &str) -> Result<OrderId> {
        self.read(|state| Ok(state.order_by_number(number)?.id.clone()))
    }

    pub fn seller_orders(&self, seller: &UserId) -> Result<SellerDashboard> {
        self.read(|state| Ok(orders::seller_orders(state, seller)))
    }

    pub fn seller_order_detail(&self, seller: &UserId, order_id: &OrderId) -> Result<OrderWithSellerTotal> {
        self.read(|state| orders::seller_order_detail(state, seller, order_id))
    }

    // Reviews

    pub fn has_transacted(&self, a: &UserId, b: &UserId) -> Result<bool> {
        self.read(|state| Ok(reviews::has_transacted(state, a, b)))
    }

    pub fn submit_review(
        &self,
        author: &UserId,
        recipient: &UserId,
        rating: i64,
        comment: &str,
    ) -> Result<ReviewOutcome> {
        self.write(|state, _| reviews::submit_review(state, author, recipient, rating, comment))
    }

    pub fn review_candidates(&self, user: &UserId) -> Result<Vec<ReviewCandidate>> {
        self.read(|state| reviews::review_candidates(state, user))
    }

    pub fn reputation(&self, user: &UserId) -> Result<Reputation> {
        self.read(|state| reviews::reputation(state, user))
    }

    // Wishlist

    pub fn add_favorite(&self, user: &UserId, product_id: &ProductId) -> Result<bool> {
        self.write(|state, _| wishlist::add_favorite(state, user, product_id))
    }

    pub fn remove_favorite(&self, user: &UserId, product_id: &ProductId) -> Result<bool> {
        self.write(|state, _| wishlist::remove_favorite(state, user, product_id))
    }

    pub fn toggle_favorite(&self, user: &UserId, product_id: &ProductId) -> Result<bool> {
        self.write(|state, _| wishlist::toggle_favorite(state, user, product_id))
    }

    pub fn list_favorites(&self, user: &UserId) -> Result<Vec<WishlistEntry>> {
        self.read(|state| Ok(wishlist::list_favorites(state, user)))
    }

    pub fn is_favorite(&self, user: &UserId, product_id: &ProductId) -> Result<bool> {
        self.read(|state| Ok(wishlist::is_favorite(state, user, product_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_config() {
        let config = CommerceConfig {
            order_number_length: 2,
            ..CommerceConfig::default()
        };
        assert!(matches!(
            Marketplace::in_memory(config),
            Err(CommerceError::Validation(_))
        ));
    }

    #[test]
    fn test_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Marketplace>();
    }

    #[test]
    fn test_failed_write_leaves_no_trace() {
        let market = Marketplace::in_memory(CommerceConfig::default()).unwrap();
        let result = market.register(SignupForm {
            username: "alice".into(),
            email: "not-an-email".into(),
            ..SignupForm::default()
        });
        assert!(result.is_err());
        assert!(market.users().unwrap().is_empty());
    }
}
