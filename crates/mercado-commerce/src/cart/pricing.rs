//! Cart pricing calculations.

use crate::cart::Cart;
use crate::error::{CommerceError, Result};
use crate::ids::{CartItemId, ProductId};
use crate::money::{Currency, Money};
use crate::state::MarketState;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a cart, read from the current catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Per-item pricing breakdown.
    pub lines: Vec<LinePricing>,
    /// Sum of line subtotals.
    pub total: Money,
    /// Sum of quantities.
    pub item_count: u64,
}

impl CartPricing {
    /// Check if any line is discounted.
    pub fn has_discounts(&self) -> bool {
        self.lines.iter().any(|l| l.unit_price != l.list_price)
    }
}

/// Pricing breakdown for a single cart item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    /// Cart item ID.
    pub item_id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    /// Price before any sale discount.
    pub list_price: Money,
    /// Effective unit price.
    pub unit_price: Money,
    pub quantity: u32,
    /// Stock currently available.
    pub stock: u32,
    /// unit_price * quantity.
    pub subtotal: Money,
}

/// Price every item of `cart` at current effective prices.
pub fn price_cart(state: &MarketState, cart: &Cart, currency: Currency) -> Result<CartPricing> {
    let lines = cart
        .items
        .iter()
        .map(|item| {
            let product = state.product(&item.product_id)?;
            let unit_price = product.effective_price();
            let subtotal = unit_price
                .try_multiply(item.quantity)
                .ok_or_else(|| overflow(&product.name))?;
            Ok(LinePricing {
                item_id: item.id.clone(),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                list_price: product.price,
                unit_price,
                quantity: item.quantity,
                stock: product.stock,
                subtotal,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let total = Money::try_sum(lines.iter().map(|l| &l.subtotal), currency)
        .ok_or_else(|| CommerceError::validation("cart total overflows or mixes currencies"))?;

    Ok(CartPricing {
        lines,
        total,
        item_count: cart.item_count(),
    })
}

fn overflow(product: &str) -> CommerceError {
    CommerceError::validation(format!("line total for {} overflows", product))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::ids::{CategoryId, UserId};

    fn product(id: &str, cents: i64, discount: u8) -> Product {
        Product {
            id: ProductId::new(id),
            owner: UserId::new("usr_bob"),
            name: id.into(),
            category_id: CategoryId::new("cat_1"),
            description: String::new(),
            brand: "Genérico".into(),
            price: Money::new(cents, Currency::ARS),
            stock: 10,
            on_stock: true,
            on_sale: discount > 0,
            discount_percent: discount,
            image: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_total_uses_effective_prices() {
        let mut state = MarketState::default();
        for p in [product("prod_a", 10000, 0), product("prod_b", 999, 10)] {
            state.products.insert(p.id.clone(), p);
        }
        let mut cart = Cart::new(UserId::new("usr_alice"));
        cart.add(&ProductId::new("prod_a"), 2).unwrap();
        cart.add(&ProductId::new("prod_b"), 3).unwrap();

        let pricing = price_cart(&state, &cart, Currency::ARS).unwrap();
        // 999 * 0.9 = 899.1 -> 899
        assert_eq!(pricing.lines[1].unit_price.amount_cents, 899);
        assert_eq!(pricing.total.amount_cents, 2 * 10000 + 3 * 899);
        assert_eq!(pricing.item_count, 5);
        assert!(pricing.has_discounts());
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        let state = MarketState::default();
        let cart = Cart::new(UserId::new("usr_alice"));
        let pricing = price_cart(&state, &cart, Currency::ARS).unwrap();
        assert!(pricing.total.is_zero());
        assert!(pricing.lines.is_empty());
    }

    #[test]
    fn test_missing_product() {
        let state = MarketState::default();
        let mut cart = Cart::new(UserId::new("usr_alice"));
        cart.add(&ProductId::new("prod_gone"), 1).unwrap();
        assert!(matches!(
            price_cart(&state, &cart, Currency::ARS),
            Err(CommerceError::NotFound { .. })
        ));
    }
}
