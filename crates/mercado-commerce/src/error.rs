//! Marketplace error types.

use mercado_db::DbError;
use thiserror::Error;

/// Errors that can occur in marketplace operations.
///
/// Every variant is recoverable; callers turn them into a user-facing
/// message.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// A required field is missing or a value is out of range.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Checkout was attempted with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Not enough stock to satisfy a quantity.
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: u32,
        available: u32,
    },

    /// The order is not in a state that allows the operation.
    #[error("Invalid order state: {0}")]
    InvalidState(String),

    /// The acting user is not allowed to do this.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// A user tried to review themselves.
    #[error("Users cannot review themselves")]
    SelfReview,

    /// No delivered order connects author and recipient.
    #[error("No delivered order between {author} and {recipient}")]
    UnauthorizedReview { author: String, recipient: String },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Checkout failed for a reason other than the typed ones above.
    #[error("Order creation failed: {0}")]
    OrderCreation(String),

    /// Storage failure.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

impl CommerceError {
    /// Shorthand for [`CommerceError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CommerceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for [`CommerceError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        CommerceError::Validation(msg.into())
    }
}

/// Result alias used across the crate.
pub type Result<T, E = CommerceError> = std::result::Result<T, E>;
