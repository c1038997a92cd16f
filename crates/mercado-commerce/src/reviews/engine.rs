//! Review authorization, storage and reputation.

use crate::accounts::UserAccount;
use crate::error::{CommerceError, Result};
use crate::ids::{ReviewId, UserId};
use crate::orders::OrderStatus;
use crate::reviews::{Rating, Review};
use crate::state::{current_timestamp, MarketState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Check if a delivered order links `a` and `b` as buyer and seller, in
/// either direction.
pub fn has_transacted(state: &MarketState, a: &UserId, b: &UserId) -> bool {
    state
        .orders
        .values()
        .filter(|o| o.status == OrderStatus::Delivered)
        .any(|o| (&o.buyer == a && o.has_seller(b)) || (&o.buyer == b && o.has_seller(a)))
}

/// The review `author` wrote about `recipient`, if any.
pub fn find_review<'a>(
    state: &'a MarketState,
    author: &UserId,
    recipient: &UserId,
) -> Option<&'a Review> {
    state.reviews.get(&ReviewId::for_pair(author, recipient))
}

/// Result of a review submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewOutcome {
    pub review: Review,
    /// `false` when an existing review was edited.
    pub created: bool,
}

/// Write or edit `author`'s review of `recipient`.
///
/// There is at most one review per (author, recipient); submitting again
/// overwrites rating and comment and keeps the first creation time.
pub fn submit_review(
    state: &mut MarketState,
    author: &UserId,
    recipient: &UserId,
    rating: i64,
    comment: &str,
) -> Result<ReviewOutcome> {
    if author == recipient {
        return Err(CommerceError::SelfReview);
    }
    state.user(author)?;
    state.user(recipient)?;

    if !has_transacted(state, author, recipient) {
        tracing::warn!(author = %author, recipient = %recipient, "rejected review without delivered order");
        return Err(CommerceError::UnauthorizedReview {
            author: author.to_string(),
            recipient: recipient.to_string(),
        });
    }
    let rating = Rating::try_from(rating)?;
    let comment = comment.trim().to_string();
    let now = current_timestamp();

    let id = ReviewId::for_pair(author, recipient);
    let outcome = match state.reviews.get_mut(&id) {
        Some(review) => {
            review.rating = rating;
            review.comment = comment;
            review.updated_at = now.max(review.created_at);
            ReviewOutcome {
                review: review.clone(),
                created: false,
            }
        }
        None => {
            let review = Review {
                id,
                author: author.clone(),
                recipient: recipient.clone(),
                rating,
                comment,
                created_at: now,
                updated_at: now,
            };
            state
                .reviews
                .insert_unique("reviews", review.id.clone(), review.clone())?;
            ReviewOutcome {
                review,
                created: true,
            }
        }
    };

    tracing::info!(
        author = %author,
        recipient = %recipient,
        rating = outcome.review.rating.value(),
        created = outcome.created,
        "stored review"
    );
    Ok(outcome)
}

/// Someone `user` has completed a delivered order with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewCandidate {
    pub counterparty: UserAccount,
    /// Whether `user` already reviewed them.
    pub has_review: bool,
}

/// Distinct counterparties of `user`'s delivered orders, by username.
pub fn review_candidates(state: &MarketState, user: &UserId) -> Result<Vec<ReviewCandidate>> {
    state.user(user)?;

    let mut counterparties: BTreeSet<&UserId> = BTreeSet::new();
    for order in state
        .orders
        .values()
        .filter(|o| o.status == OrderStatus::Delivered)
    {
        if &order.buyer == user {
            counterparties.extend(order.items.iter().map(|i| &i.seller));
        } else if order.has_seller(user) {
            counterparties.insert(&order.buyer);
        }
    }
    counterparties.remove(user);

    let mut candidates: Vec<ReviewCandidate> = counterparties
        .into_iter()
        .filter_map(|id| state.users.get(id))
        .map(|account| ReviewCandidate {
            has_review: find_review(state, user, &account.id).is_some(),
            counterparty: account.clone(),
        })
        .collect();
    candidates.sort_by(|a, b| a.counterparty.username.cmp(&b.counterparty.username));
    Ok(candidates)
}

/// Reviews a user received and their average.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reputation {
    /// Newest first.
    pub reviews: Vec<Review>,
    pub total: usize,
    /// Mean rating rounded to one decimal; 0 without reviews.
    pub average: f64,
}

/// Build `user`'s reputation from the reviews they received.
pub fn reputation(state: &MarketState, user: &UserId) -> Result<Reputation> {
    state.user(user)?;

    let mut reviews: Vec<Review> = state
        .reviews
        .values()
        .filter(|r| &r.recipient == user)
        .cloned()
        .collect();
    reviews.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    let total = reviews.len();
    let average = if total == 0 {
        0.0
    } else {
        let sum: u64 = reviews.iter().map(|r| u64::from(r.rating.value())).sum();
        (sum as f64 * 10.0 / total as f64).round() / 10.0
    };

    Ok(Reputation {
        reviews,
        total,
        average,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{register, SignupForm};
    use crate::cart::add_to_cart;
    use crate::catalog::{create_category, create_product, ProductDraft};
    use crate::config::CommerceConfig;
    use crate::ids::OrderId;
    use crate::money::{Currency, Money};
    use crate::orders::{create_order, update_order_status, CheckoutForm};

    struct Fixture {
        state: MarketState,
        alice: UserId,
        bob: UserId,
        carol: UserId,
        order: OrderId,
    }

    fn user(state: &mut MarketState, name: &str) -> UserId {
        register(
            state,
            SignupForm {
                username: name.into(),
                email: format!("{}@example.com", name),
                ..SignupForm::default()
            },
        )
        .unwrap()
        .id
    }

    /// alice buys from bob; the order is left pending.
    fn fixture() -> Fixture {
        let mut state = MarketState::default();
        let config = CommerceConfig::default();
        let alice = user(&mut state, "alice");
        let bob = user(&mut state, "bob");
        let carol = user(&mut state, "carol");
        let cat = create_category(&mut state, "Música", "", None).unwrap();
        let product = create_product(
            &mut state,
            &config,
            &bob,
            ProductDraft {
                name: "Vinilo".into(),
                category_id: cat.id,
                price: Money::new(5000, Currency::ARS),
                stock: 3,
                ..ProductDraft::default()
            },
        )
        .unwrap();
        add_to_cart(&mut state, &alice, &product.id, 1).unwrap();
        let order = create_order(
            &mut state,
            &config,
            &alice,
            &CheckoutForm {
                address: Some("Calle 1".into()),
                city: Some("La Plata".into()),
                phone: Some("555".into()),
                payment_method: Some("transfer".into()),
                ..CheckoutForm::default()
            },
        )
        .unwrap();
        Fixture {
            state,
            alice,
            bob,
            carol,
            order: order.id,
        }
    }

    fn deliver(f: &mut Fixture) {
        update_order_status(&mut f.state, &f.bob, &f.order, "delivered").unwrap();
    }

    #[test]
    fn test_self_review() {
        let mut f = fixture();
        let result = submit_review(&mut f.state, &f.alice, &f.alice, 5, "");
        assert!(matches!(result, Err(CommerceError::SelfReview)));
    }

    #[test]
    fn test_undelivered_order_does_not_count() {
        let mut f = fixture();
        update_order_status(&mut f.state, &f.bob, &f.order, "processing").unwrap();

        assert!(!has_transacted(&f.state, &f.alice, &f.bob));
        let result = submit_review(&mut f.state, &f.alice, &f.bob, 5, "Excelente");
        assert!(matches!(result, Err(CommerceError::UnauthorizedReview { .. })));
        assert!(f.state.reviews.is_empty());
    }

    #[test]
    fn test_both_directions_after_delivery() {
        let mut f = fixture();
        deliver(&mut f);

        assert!(has_transacted(&f.state, &f.alice, &f.bob));
        assert!(has_transacted(&f.state, &f.bob, &f.alice));
        assert!(!has_transacted(&f.state, &f.alice, &f.carol));

        assert!(submit_review(&mut f.state, &f.alice, &f.bob, 5, "Muy bueno").is_ok());
        assert!(submit_review(&mut f.state, &f.bob, &f.alice, 4, "Pagó rápido").is_ok());
        assert!(matches!(
            submit_review(&mut f.state, &f.carol, &f.bob, 1, ""),
            Err(CommerceError::UnauthorizedReview { .. })
        ));
    }

    #[test]
    fn test_rating_checked_after_authorization() {
        let mut f = fixture();
        assert!(matches!(
            submit_review(&mut f.state, &f.alice, &f.bob, 9, ""),
            Err(CommerceError::UnauthorizedReview { .. })
        ));

        deliver(&mut f);
        for bad in [0, 6, -1] {
            assert!(matches!(
                submit_review(&mut f.state, &f.alice, &f.bob, bad, ""),
                Err(CommerceError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_resubmission_updates_in_place() {
        let mut f = fixture();
        deliver(&mut f);

        let first = submit_review(&mut f.state, &f.alice, &f.bob, 2, "Lento").unwrap();
        assert!(first.created);
        f.state
            .reviews
            .get_mut(&first.review.id)
            .unwrap()
            .created_at -= 100;

        let second = submit_review(&mut f.state, &f.alice, &f.bob, 5, " Llegó al final ").unwrap();
        assert!(!second.created);
        assert_eq!(second.review.id, first.review.id);
        assert_eq!(second.review.created_at, first.review.created_at - 100);
        assert!(second.review.is_edited());
        assert_eq!(second.review.comment, "Llegó al final");
        assert_eq!(f.state.reviews.len(), 1);
    }

    #[test]
    fn test_store_rejects_second_review_for_pair() {
        let mut f = fixture();
        deliver(&mut f);
        let stored = submit_review(&mut f.state, &f.alice, &f.bob, 3, "").unwrap().review;
        assert_eq!(stored.id, ReviewId::for_pair(&f.alice, &f.bob));

        let duplicate = Review {
            comment: "otra".into(),
            ..stored.clone()
        };
        let result = f
            .state
            .reviews
            .insert_unique("reviews", ReviewId::for_pair(&f.alice, &f.bob), duplicate);
        assert!(matches!(result, Err(mercado_db::DbError::UniqueViolation { .. })));
        assert_eq!(find_review(&f.state, &f.alice, &f.bob), Some(&stored));
        assert!(find_review(&f.state, &f.bob, &f.alice).is_none());
    }

    #[test]
    fn test_candidates_and_reputation() {
        let mut f = fixture();
        assert!(review_candidates(&f.state, &f.alice).unwrap().is_empty());
        deliver(&mut f);

        let candidates = review_candidates(&f.state, &f.alice).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].counterparty.id, f.bob);
        assert!(!candidates[0].has_review);

        submit_review(&mut f.state, &f.alice, &f.bob, 4, "").unwrap();
        let candidates = review_candidates(&f.state, &f.alice).unwrap();
        assert!(candidates[0].has_review);

        let bob_candidates = review_candidates(&f.state, &f.bob).unwrap();
        assert_eq!(bob_candidates[0].counterparty.id, f.alice);

        let rep = reputation(&f.state, &f.bob).unwrap();
        assert_eq!(rep.total, 1);
        assert_eq!(rep.average, 4.0);

        let empty = reputation(&f.state, &f.carol).unwrap();
        assert_eq!(empty.total, 0);
        assert_eq!(empty.average, 0.0);
    }
}
