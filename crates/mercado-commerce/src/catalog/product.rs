//! Products and seller-side catalog management.

use crate::catalog::{AdjustmentReason, StockAdjustment};
use crate::config::CommerceConfig;
use crate::error::{CommerceError, Result};
use crate::ids::{CategoryId, ProductId, UserId};
use crate::money::Money;
use crate::state::{current_timestamp, MarketState};
use serde::{Deserialize, Serialize};

/// Brand used when a seller leaves it blank.
pub const DEFAULT_BRAND: &str = "Genérico";

/// A product listed by a seller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Seller who listed the product.
    pub owner: UserId,
    /// Product name.
    pub name: String,
    /// Category or subcategory.
    pub category_id: CategoryId,
    /// Free-form description.
    pub description: String,
    /// Brand name.
    pub brand: String,
    /// List price.
    pub price: Money,
    /// Units available.
    pub stock: u32,
    /// Cleared when stock runs out, set again on restock.
    pub on_stock: bool,
    /// Whether the discount applies.
    pub on_sale: bool,
    /// Discount percentage (0-100) applied while on sale.
    pub discount_percent: u8,
    /// Opaque path to the product image.
    pub image: Option<String>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Product {
    /// Price the buyer pays per unit.
    pub fn effective_price(&self) -> Money {
        if self.on_sale && self.discount_percent > 0 {
            self.price.discounted(self.discount_percent)
        } else {
            self.price
        }
    }

    /// Whether the product can currently be bought.
    pub fn is_available(&self) -> bool {
        self.on_stock && self.stock > 0
    }

    /// Check if `user` listed this product.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }
}

/// Seller input for creating or editing a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category_id: CategoryId,
    pub description: String,
    pub brand: String,
    pub price: Money,
    pub stock: u32,
    /// Discount percentage; `Some(0)` or `None` means not on sale.
    pub discount_percent: Option<u8>,
    pub image: Option<String>,
}

impl ProductDraft {
    fn validate(&self, state: &MarketState, config: &CommerceConfig) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::validation("product name is required"));
        }
        if self.name.trim().chars().count() > 50 {
            return Err(CommerceError::validation(
                "product name must be at most 50 characters",
            ));
        }
        if self.price.is_negative() {
            return Err(CommerceError::validation("price must not be negative"));
        }
        if self.price.currency != config.currency {
            return Err(CommerceError::validation(format!(
                "price must be in {}",
                config.currency
            )));
        }
        if matches!(self.discount_percent, Some(p) if p > 100) {
            return Err(CommerceError::validation(
                "discount must be between 0 and 100 percent",
            ));
        }
        state.category(&self.category_id)?;
        Ok(())
    }

    fn brand_or_default(&self) -> String {
        let brand = self.brand.trim();
        if brand.is_empty() {
            DEFAULT_BRAND.to_string()
        } else {
            brand.to_string()
        }
    }
}

/// List a new product owned by `actor`.
pub fn create_product(
    state: &mut MarketState,
    config: &CommerceConfig,
    actor: &UserId,
    draft: ProductDraft,
) -> Result<Product> {
    state.user(actor)?;
    draft.validate(state, config)?;

    let now = current_timestamp();
    let discount = draft.discount_percent.unwrap_or(0);
    let product = Product {
        id: ProductId::generate(),
        owner: actor.clone(),
        name: draft.name.trim().to_string(),
        brand: draft.brand_or_default(),
        category_id: draft.category_id,
        description: draft.description,
        price: draft.price,
        stock: draft.stock,
        on_stock: draft.stock > 0,
        on_sale: discount > 0,
        discount_percent: discount,
        image: draft.image,
        created_at: now,
        updated_at: now,
    };

    state
        .products
        .insert_unique("products", product.id.clone(), product.clone())?;

    tracing::info!(product = %product.id, owner = %actor, "listed product");
    Ok(product)
}

/// Replace a product's details. Only the owner may edit.
///
/// Stock set here is an absolute correction; the difference is logged as a
/// restock adjustment.
pub fn update_product(
    state: &mut MarketState,
    config: &CommerceConfig,
    actor: &UserId,
    product_id: &ProductId,
    draft: ProductDraft,
) -> Result<Product> {
    if !state.product(product_id)?.is_owned_by(actor) {
        tracing::warn!(product = %product_id, actor = %actor, "rejected product edit by non-owner");
        return Err(CommerceError::Permission(format!(
            "only the owner can edit product {}",
            product_id
        )));
    }
    draft.validate(state, config)?;
    let brand = draft.brand_or_default();

    let product = state.product_mut(product_id)?;

    let delta = i64::from(draft.stock) - i64::from(product.stock);
    let discount = draft.discount_percent.unwrap_or(0);

    product.name = draft.name.trim().to_string();
    product.brand = brand;
    product.category_id = draft.category_id;
    product.description = draft.description;
    product.price = draft.price;
    product.stock = draft.stock;
    product.on_stock = draft.stock > 0;
    product.on_sale = discount > 0;
    product.discount_percent = discount;
    if draft.image.is_some() {
        product.image = draft.image;
    }
    product.updated_at = current_timestamp();
    let updated = product.clone();

    if delta != 0 {
        state.stock_log.push(StockAdjustment::new(
            product_id.clone(),
            delta,
            AdjustmentReason::Restock,
        ));
    }

    tracing::info!(product = %product_id, "updated product");
    Ok(updated)
}

/// Add units to a product's stock. Only the owner may restock.
pub fn restock(
    state: &mut MarketState,
    actor: &UserId,
    product_id: &ProductId,
    quantity: u32,
) -> Result<Product> {
    if quantity == 0 {
        return Err(CommerceError::validation("restock quantity must be at least 1"));
    }

    let product = state.product_mut(product_id)?;
    if !product.is_owned_by(actor) {
        return Err(CommerceError::Permission(format!(
            "only the owner can restock product {}",
            product_id
        )));
    }
    product.release(quantity)?;
    let updated = product.clone();

    state.stock_log.push(StockAdjustment::new(
        product_id.clone(),
        i64::from(quantity),
        AdjustmentReason::Restock,
    ));

    tracing::info!(product = %product_id, quantity, stock = updated.stock, "restocked product");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{register, SignupForm};
    use crate::catalog::create_category;
    use crate::money::Currency;

    fn setup() -> (MarketState, UserId, UserId, CategoryId) {
        let mut state = MarketState::default();
        let bob = register(
            &mut state,
            SignupForm {
                username: "bob".into(),
                email: "bob@example.com".into(),
                ..SignupForm::default()
            },
        )
        .unwrap();
        let carol = register(
            &mut state,
            SignupForm {
                username: "carol".into(),
                email: "carol@example.com".into(),
                ..SignupForm::default()
            },
        )
        .unwrap();
        let category = create_category(&mut state, "Libros", "", None).unwrap();
        (state, bob.id, carol.id, category.id)
    }

    fn draft(category: &CategoryId, cents: i64, stock: u32) -> ProductDraft {
        ProductDraft {
            name: "El Aleph".into(),
            category_id: category.clone(),
            price: Money::new(cents, Currency::ARS),
            stock,
            ..ProductDraft::default()
        }
    }

    #[test]
    fn test_effective_price() {
        let (mut state, bob, _, cat) = setup();
        let config = CommerceConfig::default();
        let mut d = draft(&cat, 10000, 3);
        d.discount_percent = Some(20);
        let product = create_product(&mut state, &config, &bob, d).unwrap();

        assert!(product.on_sale);
        assert_eq!(product.effective_price().amount_cents, 8000);
        assert_eq!(product.brand, DEFAULT_BRAND);
    }

    #[test]
    fn test_validation() {
        let (mut state, bob, _, cat) = setup();
        let config = CommerceConfig::default();

        let mut blank = draft(&cat, 100, 1);
        blank.name = "  ".into();
        assert!(matches!(
            create_product(&mut state, &config, &bob, blank),
            Err(CommerceError::Validation(_))
        ));

        let mut too_much = draft(&cat, 100, 1);
        too_much.discount_percent = Some(101);
        assert!(matches!(
            create_product(&mut state, &config, &bob, too_much),
            Err(CommerceError::Validation(_))
        ));

        let negative = draft(&cat, -1, 1);
        assert!(matches!(
            create_product(&mut state, &config, &bob, negative),
            Err(CommerceError::Validation(_))
        ));

        let unknown = draft(&CategoryId::new("cat_nope"), 100, 1);
        assert!(matches!(
            create_product(&mut state, &config, &bob, unknown),
            Err(CommerceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_only_owner_can_edit() {
        let (mut state, bob, carol, cat) = setup();
        let config = CommerceConfig::default();
        let product = create_product(&mut state, &config, &bob, draft(&cat, 100, 1)).unwrap();

        let result = update_product(&mut state, &config, &carol, &product.id, draft(&cat, 1, 1));
        assert!(matches!(result, Err(CommerceError::Permission(_))));
        assert_eq!(state.product(&product.id).unwrap().price.amount_cents, 100);

        let updated =
            update_product(&mut state, &config, &bob, &product.id, draft(&cat, 250, 4)).unwrap();
        assert_eq!(updated.price.amount_cents, 250);
        assert_eq!(updated.stock, 4);
        assert_eq!(state.stock_log.len(), 1);
        assert_eq!(state.stock_log[0].quantity_change, 3);
    }

    #[test]
    fn test_non_owner_gets_permission_before_validation() {
        let (mut state, bob, carol, cat) = setup();
        let config = CommerceConfig::default();
        let product = create_product(&mut state, &config, &bob, draft(&cat, 100, 1)).unwrap();

        let mut blank = draft(&cat, 100, 1);
        blank.name = String::new();
        assert!(matches!(
            update_product(&mut state, &config, &carol, &product.id, blank),
            Err(CommerceError::Permission(_))
        ));

        let elsewhere = draft(&CategoryId::new("cat_nope"), 100, 1);
        assert!(matches!(
            update_product(&mut state, &config, &carol, &product.id, elsewhere),
            Err(CommerceError::Permission(_))
        ));
    }

    #[test]
    fn test_restock_sets_on_stock() {
        let (mut state, bob, carol, cat) = setup();
        let config = CommerceConfig::default();
        let product = create_product(&mut state, &config, &bob, draft(&cat, 100, 0)).unwrap();
        assert!(!product.on_stock);

        assert!(matches!(
            restock(&mut state, &carol, &product.id, 2),
            Err(CommerceError::Permission(_))
        ));

        let restocked = restock(&mut state, &bob, &product.id, 2).unwrap();
        assert_eq!(restocked.stock, 2);
        assert!(restocked.on_stock);
    }
}
