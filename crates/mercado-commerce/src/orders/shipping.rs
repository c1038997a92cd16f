//! Checkout form handling.

use crate::config::CommerceConfig;
use crate::error::{CommerceError, Result};
use crate::orders::{PaymentMethod, ShippingInfo};
use serde::{Deserialize, Serialize};

/// Raw checkout input. Blank strings count as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub address: Option<String>,
    pub city: Option<String>,
    /// Defaults to the configured country.
    pub country: Option<String>,
    pub phone: Option<String>,
    /// One of `credit_card`, `debit_card`, `paypal`, `transfer`.
    pub payment_method: Option<String>,
}

impl CheckoutForm {
    /// Check required fields and resolve defaults.
    pub fn validate(&self, config: &CommerceConfig) -> Result<(ShippingInfo, PaymentMethod)> {
        let address = present(&self.address);
        let city = present(&self.city);
        let phone = present(&self.phone);
        let payment = present(&self.payment_method);

        let missing: Vec<&str> = [
            ("address", address.is_none()),
            ("city", city.is_none()),
            ("phone", phone.is_none()),
            ("payment_method", payment.is_none()),
        ]
        .into_iter()
        .filter(|(_, missing)| *missing)
        .map(|(field, _)| field)
        .collect();

        match (address, city, phone, payment) {
            (Some(address), Some(city), Some(phone), Some(payment)) => {
                let payment_method = payment.parse::<PaymentMethod>()?;
                let country = present(&self.country)
                    .unwrap_or(config.default_country.trim())
                    .to_string();
                let shipping = ShippingInfo {
                    address: address.to_string(),
                    city: city.to_string(),
                    country,
                    phone: phone.to_string(),
                };
                Ok((shipping, payment_method))
            }
            _ => Err(CommerceError::validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            ))),
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CheckoutForm {
        CheckoutForm {
            address: Some("Av. Siempre Viva 742".into()),
            city: Some("Córdoba".into()),
            country: None,
            phone: Some("351-555-0100".into()),
            payment_method: Some("credit_card".into()),
        }
    }

    #[test]
    fn test_country_defaults() {
        let (shipping, method) = form().validate(&CommerceConfig::default()).unwrap();
        assert_eq!(shipping.country, "Argentina");
        assert_eq!(method, PaymentMethod::CreditCard);
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let mut f = form();
        f.city = Some("   ".into());
        f.payment_method = None;

        match f.validate(&CommerceConfig::default()) {
            Err(CommerceError::Validation(msg)) => {
                assert!(msg.contains("city"));
                assert!(msg.contains("payment_method"));
                assert!(!msg.contains("address"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_payment_method() {
        let mut f = form();
        f.payment_method = Some("bitcoin".into());
        assert!(matches!(
            f.validate(&CommerceConfig::default()),
            Err(CommerceError::Validation(_))
        ));
    }
}
