//! Newtype IDs for type-safe identifiers.
//!
//! Each ID carries a short prefix (`usr_`, `prod_`, ...) so a stray value in
//! a log line or a JSON dump is easy to place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        /// A unique identifier.
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix used by generated IDs.
            pub const PREFIX: &'static str = $prefix;

            /// Create an ID from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new random ID.
            pub fn generate() -> Self {
                Self(format!("{}_{}", $prefix, random_suffix()))
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(UserId, "usr");
define_id!(CategoryId, "cat");
define_id!(ProductId, "prod");
define_id!(CartItemId, "item");
define_id!(OrderId, "ord");
define_id!(OrderItemId, "line");
define_id!(ReviewId, "rev");
define_id!(FavoriteId, "fav");

impl ReviewId {
    /// The single review slot for `author` writing about `recipient`.
    ///
    /// Reviews are keyed by this, so the store itself rejects a second
    /// review for the same pair.
    pub fn for_pair(author: &UserId, recipient: &UserId) -> Self {
        Self(format!("{}_{}_to_{}", Self::PREFIX, author, recipient))
    }
}

/// 64 random bits, hex encoded.
fn random_suffix() -> String {
    format!("{:016x}", rand::random::<u64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_prefixed() {
        let id = ProductId::generate();
        assert!(id.as_str().starts_with("prod_"));
        assert_eq!(id.as_str().len(), "prod_".len() + 16);
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(OrderId::generate(), OrderId::generate());
    }

    #[test]
    fn test_review_id_is_directional() {
        let alice = UserId::new("usr_alice");
        let bob = UserId::new("usr_bob");
        assert_eq!(ReviewId::for_pair(&alice, &bob), ReviewId::for_pair(&alice, &bob));
        assert_ne!(ReviewId::for_pair(&alice, &bob), ReviewId::for_pair(&bob, &alice));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = UserId::new("usr_alice");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""usr_alice""#);
        assert_eq!(format!("{}", id), "usr_alice");
    }
}
