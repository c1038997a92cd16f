//! User accounts and public profiles.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::{CommerceError, Result};
use crate::ids::UserId;
use crate::reviews::{self, Reputation, Review};
use crate::state::{current_timestamp, MarketState};

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccount {
    pub id: UserId,
    /// Unique, compared case-insensitively.
    pub username: String,
    /// Unique, compared case-insensitively.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile: Profile,
    /// Unix timestamp of registration.
    pub created_at: i64,
}

impl UserAccount {
    /// Full name, falling back to the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Public profile details.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub bio: String,
    pub phone: String,
    pub address: String,
    /// Opaque path to an uploaded picture.
    pub picture: Option<String>,
}

/// Registration input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Profile edit input. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub picture: Option<String>,
}

/// What one user sees on another user's profile page.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub user: UserAccount,
    pub reputation: Reputation,
    /// Whether the viewer may leave (or edit) a review here.
    pub can_review: bool,
    /// The viewer's existing review of this user.
    pub own_review: Option<Review>,
}

/// Register a user and create their empty cart.
pub fn register(state: &mut MarketState, form: SignupForm) -> Result<UserAccount> {
    let username = form.username.trim();
    let email = form.email.trim();

    if username.is_empty() {
        return Err(CommerceError::validation("username is required"));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '@' | '+'))
    {
        return Err(CommerceError::validation(format!(
            "username '{}' contains invalid characters",
            username
        )));
    }
    validate_email(email)?;

    if state.users.find(|u| u.username.eq_ignore_ascii_case(username)).is_some() {
        return Err(CommerceError::validation(format!(
            "username '{}' is already taken",
            username
        )));
    }
    ensure_email_free(state, email, None)?;

    let account = UserAccount {
        id: UserId::generate(),
        username: username.to_string(),
        email: email.to_string(),
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        profile: Profile::default(),
        created_at: current_timestamp(),
    };

    state
        .users
        .insert_unique("users", account.id.clone(), account.clone())?;
    state
        .carts
        .insert_unique("carts", account.id.clone(), Cart::new(account.id.clone()))?;

    tracing::info!(user = %account.id, username = %account.username, "registered user");
    Ok(account)
}

/// Edit the actor's own account and profile.
pub fn update_profile(
    state: &mut MarketState,
    actor: &UserId,
    update: ProfileUpdate,
) -> Result<UserAccount> {
    if let Some(email) = update.email.as_deref() {
        let email = email.trim();
        validate_email(email)?;
        ensure_email_free(state, email, Some(actor))?;
    }

    let account = state
        .users
        .get_mut(actor)
        .ok_or_else(|| CommerceError::not_found("User", actor))?;

    if let Some(v) = update.first_name {
        account.first_name = v.trim().to_string();
    }
    if let Some(v) = update.last_name {
        account.last_name = v.trim().to_string();
    }
    if let Some(v) = update.email {
        account.email = v.trim().to_string();
    }
    if let Some(v) = update.bio {
        account.profile.bio = v;
    }
    if let Some(v) = update.phone {
        account.profile.phone = v.trim().to_string();
    }
    if let Some(v) = update.address {
        account.profile.address = v.trim().to_string();
    }
    if let Some(v) = update.picture {
        account.profile.picture = if v.trim().is_empty() { None } else { Some(v) };
    }

    tracing::info!(user = %actor, "updated profile");
    Ok(account.clone())
}

/// Build the profile page of `username` as seen by `viewer`.
pub fn profile_view(
    state: &MarketState,
    viewer: Option<&UserId>,
    username: &str,
) -> Result<ProfileView> {
    let user = state.user_by_username(username)?.clone();
    let reputation = reviews::reputation(state, &user.id)?;

    let (can_review, own_review) = match viewer {
        Some(viewer) if viewer != &user.id => (
            reviews::has_transacted(state, viewer, &user.id),
            reviews::find_review(state, viewer, &user.id).cloned(),
        ),
        _ => (false, None),
    };

    Ok(ProfileView {
        user,
        reputation,
        can_review,
        own_review,
    })
}

fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.contains(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(CommerceError::validation(format!(
            "'{}' is not a valid email address",
            email
        )))
    }
}

fn ensure_email_free(state: &MarketState, email: &str, except: Option<&UserId>) -> Result<()> {
    let taken = state
        .users
        .find(|u| u.email.eq_ignore_ascii_case(email) && Some(&u.id) != except)
        .is_some();

    if taken {
        return Err(CommerceError::validation(format!(
            "email '{}' is already registered",
            email
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, email: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            email: email.to_string(),
            ..SignupForm::default()
        }
    }

    #[test]
    fn test_register_creates_cart() {
        let mut state = MarketState::default();
        let alice = register(&mut state, signup("alice", "alice@example.com")).unwrap();

        assert!(state.cart(&alice.id).unwrap().is_empty());
        assert_eq!(state.user_by_username("ALICE").unwrap().id, alice.id);
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut state = MarketState::default();
        register(&mut state, signup("alice", "alice@example.com")).unwrap();

        let dup_name = register(&mut state, signup("Alice", "other@example.com"));
        assert!(matches!(dup_name, Err(CommerceError::Validation(_))));

        let dup_email = register(&mut state, signup("alice2", "ALICE@example.com"));
        assert!(matches!(dup_email, Err(CommerceError::Validation(_))));
    }

    #[test]
    fn test_register_validates_email() {
        let mut state = MarketState::default();
        for bad in ["", "alice", "alice@", "@example.com", "alice@example", "a b@example.com"] {
            let result = register(&mut state, signup("alice", bad));
            assert!(
                matches!(result, Err(CommerceError::Validation(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_update_profile() {
        let mut state = MarketState::default();
        let alice = register(&mut state, signup("alice", "alice@example.com")).unwrap();

        let updated = update_profile(
            &mut state,
            &alice.id,
            ProfileUpdate {
                first_name: Some("Alice".to_string()),
                bio: Some("Vendo cosas".to_string()),
                phone: Some(" 555-0100 ".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .unwrap();

        assert_eq!(updated.display_name(), "Alice");
        assert_eq!(updated.profile.bio, "Vendo cosas");
        assert_eq!(updated.profile.phone, "555-0100");
        assert_eq!(updated.email, "alice@example.com");
    }

    #[test]
    fn test_update_profile_rejects_taken_email() {
        let mut state = MarketState::default();
        let alice = register(&mut state, signup("alice", "alice@example.com")).unwrap();
        register(&mut state, signup("bob", "bob@example.com")).unwrap();

        let result = update_profile(
            &mut state,
            &alice.id,
            ProfileUpdate {
                email: Some("bob@example.com".to_string()),
                ..ProfileUpdate::default()
            },
        );
        assert!(matches!(result, Err(CommerceError::Validation(_))));

        // Keeping your own address is fine.
        let result = update_profile(
            &mut state,
            &alice.id,
            ProfileUpdate {
                email: Some("alice@example.com".to_string()),
                ..ProfileUpdate::default()
            },
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_profile_view_of_self_cannot_review() {
        let mut state = MarketState::default();
        let alice = register(&mut state, signup("alice", "alice@example.com")).unwrap();

        let view = profile_view(&state, Some(&alice.id), "alice").unwrap();
        assert!(!view.can_review);
        assert!(view.own_review.is_none());
        assert_eq!(view.reputation.total, 0);
    }
}
