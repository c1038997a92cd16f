//! Review types.

use crate::error::CommerceError;
use crate::ids::{ReviewId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Filled and empty stars, e.g. `★★★☆☆`.
    pub fn stars(&self) -> String {
        let filled = usize::from(self.0);
        let empty = usize::from(Self::MAX - self.0);
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

impl TryFrom<i64> for Rating {
    type Error = CommerceError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(CommerceError::validation(format!(
                "rating must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// What one user thinks of another after trading with them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    /// Who wrote it.
    pub author: UserId,
    /// Who it is about.
    pub recipient: UserId,
    pub rating: Rating,
    pub comment: String,
    /// Unix timestamp of the first submission.
    pub created_at: i64,
    /// Unix timestamp of the last edit.
    pub updated_at: i64,
}

impl Review {
    /// Check if the review was edited after it was written.
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }
}
