//! Marketplace settings.

use serde::{Deserialize, Serialize};

use crate::error::{CommerceError, Result};
use crate::money::{Currency, Money};

/// Settings that shape checkout and pricing.
///
/// Deserializes from the `[market]` table of `mercado.toml`; every field has
/// a default so a partial table is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommerceConfig {
    /// Currency for every price in the store.
    pub currency: Currency,
    /// Flat shipping cost added to each order, in cents.
    pub shipping_cost_cents: i64,
    /// Country used when checkout leaves it blank.
    pub default_country: String,
    /// Length of generated order numbers.
    pub order_number_length: usize,
    /// How many order numbers to try before giving up on a checkout.
    pub order_number_attempts: u32,
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            currency: Currency::ARS,
            shipping_cost_cents: 0,
            default_country: "Argentina".to_string(),
            order_number_length: 10,
            order_number_attempts: 8,
        }
    }
}

impl CommerceConfig {
    /// Shipping cost as money.
    pub fn shipping_cost(&self) -> Money {
        Money::new(self.shipping_cost_cents, self.currency)
    }

    /// Reject settings the ledger cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.shipping_cost_cents < 0 {
            return Err(CommerceError::validation("shipping_cost_cents must be >= 0"));
        }
        if !(6..=20).contains(&self.order_number_length) {
            return Err(CommerceError::validation(
                "order_number_length must be between 6 and 20",
            ));
        }
        if self.order_number_attempts == 0 {
            return Err(CommerceError::validation("order_number_attempts must be >= 1"));
        }
        if self.default_country.trim().is_empty() {
            return Err(CommerceError::validation("default_country must not be empty"));
        }
        Ok(())
    }
}
