//! Per-user favorite products.

use crate::catalog::Product;
use crate::error::Result;
use crate::ids::{FavoriteId, ProductId, UserId};
use crate::state::{current_timestamp, MarketState};
use serde::{Deserialize, Serialize};

/// A product a user marked as favorite. Unique per (user, product).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub product_id: ProductId,
    /// Unix timestamp when added.
    pub added_at: i64,
}

/// A favorite together with the product it points at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WishlistEntry {
    pub favorite: Favorite,
    pub product: Product,
}

/// Mark a product as favorite. Returns `false` if it already was.
pub fn add_favorite(state: &mut MarketState, user: &UserId, product_id: &ProductId) -> Result<bool> {
    state.user(user)?;
    state.product(product_id)?;
    if is_favorite(state, user, product_id) {
        return Ok(false);
    }

    let favorite = Favorite {
        id: FavoriteId::generate(),
        user_id: user.clone(),
        product_id: product_id.clone(),
        added_at: current_timestamp(),
    };
    state
        .favorites
        .insert_unique("favorites", favorite.id.clone(), favorite)?;

    tracing::debug!(user = %user, product = %product_id, "added favorite");
    Ok(true)
}

/// Unmark a product. Returns `false` if it was not a favorite.
pub fn remove_favorite(
    state: &mut MarketState,
    user: &UserId,
    product_id: &ProductId,
) -> Result<bool> {
    state.product(product_id)?;
    let removed = state
        .favorites
        .remove_where(|f| &f.user_id == user && &f.product_id == product_id);
    Ok(removed > 0)
}

/// Flip a product's favorite state. Returns the new state.
pub fn toggle_favorite(
    state: &mut MarketState,
    user: &UserId,
    product_id: &ProductId,
) -> Result<bool> {
    if is_favorite(state, user, product_id) {
        remove_favorite(state, user, product_id)?;
        Ok(false)
    } else {
        add_favorite(state, user, product_id)
    }
}

/// Check if `user` marked `product_id` as favorite.
pub fn is_favorite(state: &MarketState, user: &UserId, product_id: &ProductId) -> bool {
    state
        .favorites
        .find(|f| &f.user_id == user && &f.product_id == product_id)
        .is_some()
}

/// `user`'s favorites, oldest first.
pub fn list_favorites(state: &MarketState, user: &UserId) -> Vec<WishlistEntry> {
    let mut entries: Vec<WishlistEntry> = state
        .favorites
        .values()
        .filter(|f| &f.user_id == user)
        .filter_map(|f| {
            state.products.get(&f.product_id).map(|p| WishlistEntry {
                favorite: f.clone(),
                product: p.clone(),
            })
        })
        .collect();
    entries.sort_by(|a, b| {
        a.favorite
            .added_at
            .cmp(&b.favorite.added_at)
            .then_with(|| a.favorite.id.cmp(&b.favorite.id))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{register, SignupForm};
    use crate::catalog::{create_category, create_product, ProductDraft};
    use crate::config::CommerceConfig;
    use crate::error::CommerceError;
    use crate::money::{Currency, Money};

    fn setup() -> (MarketState, UserId, ProductId) {
        let mut state = MarketState::default();
        let alice = register(
            &mut state,
            SignupForm {
                username: "alice".into(),
                email: "alice@example.com".into(),
                ..SignupForm::default()
            },
        )
        .unwrap()
        .id;
        let cat = create_category(&mut state, "Hogar", "", None).unwrap();
        let product = create_product(
            &mut state,
            &CommerceConfig::default(),
            &alice,
            ProductDraft {
                name: "Lámpara".into(),
                category_id: cat.id,
                price: Money::new(2500, Currency::ARS),
                stock: 1,
                ..ProductDraft::default()
            },
        )
        .unwrap()
        .id;
        (state, alice, product)
    }

    #[test]
    fn test_add_is_idempotent() {
        let (mut state, alice, product) = setup();
        assert!(add_favorite(&mut state, &alice, &product).unwrap());
        assert!(!add_favorite(&mut state, &alice, &product).unwrap());
        assert_eq!(state.favorites.len(), 1);
        assert_eq!(list_favorites(&state, &alice).len(), 1);
    }

    #[test]
    fn test_remove_and_toggle() {
        let (mut state, alice, product) = setup();
        assert!(!remove_favorite(&mut state, &alice, &product).unwrap());

        assert!(toggle_favorite(&mut state, &alice, &product).unwrap());
        assert!(is_favorite(&state, &alice, &product));
        assert!(!toggle_favorite(&mut state, &alice, &product).unwrap());
        assert!(!is_favorite(&state, &alice, &product));
    }

    #[test]
    fn test_unknown_product() {
        let (mut state, alice, _) = setup();
        let result = add_favorite(&mut state, &alice, &ProductId::new("prod_nope"));
        assert!(matches!(result, Err(CommerceError::NotFound { .. })));
    }
}
