//! Reputation module.
//!
//! Reviews are only accepted between users connected by a delivered order.

mod engine;
mod review;

pub use engine::{
    find_review, has_transacted, reputation, review_candidates, submit_review, Reputation,
    ReviewCandidate, ReviewOutcome,
};
pub use review::{Rating, Review};
