//! Shopping cart module.
//!
//! One cart per user, created at registration. Stock is only checked when
//! a quantity is set explicitly; checkout does the authoritative check.

mod cart;
mod pricing;

pub use cart::{Cart, CartItem, MAX_QUANTITY_PER_ITEM};
pub use pricing::{price_cart, CartPricing, LinePricing};

use crate::error::{CommerceError, Result};
use crate::ids::{CartItemId, ProductId, UserId};
use crate::money::Currency;
use crate::state::MarketState;

/// Add `quantity` units of a product to `user`'s cart.
pub fn add_to_cart(
    state: &mut MarketState,
    user: &UserId,
    product_id: &ProductId,
    quantity: u32,
) -> Result<CartItemId> {
    state.product(product_id)?;
    let item_id = state.cart_mut(user)?.add(product_id, quantity)?;

    tracing::debug!(user = %user, product = %product_id, quantity, "added to cart");
    Ok(item_id)
}

/// Set the quantity of a cart item. Zero removes it.
///
/// A quantity above the product's current stock is rejected.
pub fn update_cart_item(
    state: &mut MarketState,
    user: &UserId,
    item_id: &CartItemId,
    quantity: u32,
) -> Result<()> {
    let product_id = state
        .cart(user)?
        .get_item(item_id)
        .map(|i| i.product_id.clone())
        .ok_or_else(|| CommerceError::not_found("CartItem", item_id))?;

    if quantity > 0 {
        let product = state.product(&product_id)?;
        if !product.can_fulfill(quantity) {
            return Err(CommerceError::InsufficientStock {
                product: product.name.clone(),
                requested: quantity,
                available: product.stock,
            });
        }
    }

    state.cart_mut(user)?.update(item_id, quantity)?;
    tracing::debug!(user = %user, item = %item_id, quantity, "updated cart item");
    Ok(())
}

/// Remove an item from `user`'s cart.
pub fn remove_cart_item(state: &mut MarketState, user: &UserId, item_id: &CartItemId) -> Result<()> {
    if !state.cart_mut(user)?.remove(item_id) {
        return Err(CommerceError::not_found("CartItem", item_id));
    }
    Ok(())
}

/// Empty `user`'s cart.
pub fn clear_cart(state: &mut MarketState, user: &UserId) -> Result<()> {
    state.cart_mut(user)?.clear();
    Ok(())
}

/// Price `user`'s cart.
pub fn view_cart(state: &MarketState, user: &UserId, currency: Currency) -> Result<CartPricing> {
    price_cart(state, state.cart(user)?, currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{register, SignupForm};
    use crate::catalog::{create_category, create_product, ProductDraft};
    use crate::config::CommerceConfig;
    use crate::money::Money;

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
        .unwrap();
        let cat = create_category(&mut state, "Libros", "", None).unwrap();
        let product = create_product(
            &mut state,
            &CommerceConfig::default(),
            &alice.id,
            ProductDraft {
                name: "Ficciones".into(),
                category_id: cat.id,
                price: Money::new(100, Currency::ARS),
                stock: 5,
                ..ProductDraft::default()
            },
        )
        .unwrap();
        (state, alice.id, product.id)
    }

    #[test]
    fn test_add_requires_known_product() {
        let (mut state, alice, _) = setup();
        let result = add_to_cart(&mut state, &alice, &ProductId::new("prod_nope"), 1);
        assert!(matches!(result, Err(CommerceError::NotFound { .. })));
    }

    #[test]
    fn test_add_does_not_check_stock() {
        let (mut state, alice, product) = setup();
        add_to_cart(&mut state, &alice, &product, 50).unwrap();
        let pricing = view_cart(&state, &alice, Currency::ARS).unwrap();
        assert_eq!(pricing.total.amount_cents, 5000);
        assert_eq!(state.product(&product).unwrap().stock, 5);
    }

    #[test]
    fn test_update_checks_stock() {
        let (mut state, alice, product) = setup();
        let item = add_to_cart(&mut state, &alice, &product, 1).unwrap();

        let result = update_cart_item(&mut state, &alice, &item, 6);
        assert!(matches!(
            result,
            Err(CommerceError::InsufficientStock {
                requested: 6,
                available: 5,
                ..
            })
        ));

        update_cart_item(&mut state, &alice, &item, 5).unwrap();
        assert_eq!(state.cart(&alice).unwrap().item_count(), 5);

        update_cart_item(&mut state, &alice, &item, 0).unwrap();
        assert!(state.cart(&alice).unwrap().is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let (mut state, alice, product) = setup();
        let item = add_to_cart(&mut state, &alice, &product, 1).unwrap();

        remove_cart_item(&mut state, &alice, &item).unwrap();
        assert!(matches!(
            remove_cart_item(&mut state, &alice, &item),
            Err(CommerceError::NotFound { .. })
        ));

        add_to_cart(&mut state, &alice, &product, 2).unwrap();
        clear_cart(&mut state, &alice).unwrap();
        assert!(state.cart(&alice).unwrap().is_empty());
    }
}
