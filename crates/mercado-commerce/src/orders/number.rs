//! Order number generation.

use crate::error::{CommerceError, Result};
use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A random order number of uppercase letters and digits.
pub fn random_order_number(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(CHARSET[rng.gen_range(0..CHARSET.len())]))
        .collect()
}

/// Draw numbers from `generate` until one is not `taken`.
///
/// Gives up after `attempts` draws.
pub fn unique_order_number(
    attempts: u32,
    taken: impl Fn(&str) -> bool,
    mut generate: impl FnMut() -> String,
) -> Result<String> {
    for attempt in 1..=attempts {
        let candidate = generate();
        if !taken(&candidate) {
            return Ok(candidate);
        }
        tracing::warn!(attempt, "order number collision, retrying");
    }
    Err(CommerceError::OrderCreation(format!(
        "no free order number after {} attempts",
        attempts
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let number = random_order_number(10);
        assert_eq!(number.len(), 10);
        assert!(number
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_retries_on_collision() {
        let mut draws = vec!["BBBBBBBBBB".to_string(), "AAAAAAAAAA".to_string()];
        let number =
            unique_order_number(3, |n| n == "AAAAAAAAAA", || draws.pop().unwrap_or_default())
                .unwrap();
        assert_eq!(number, "BBBBBBBBBB");
    }

    #[test]
    fn test_gives_up() {
        let result = unique_order_number(2, |_| true, || "SAME".to_string());
        assert!(matches!(result, Err(CommerceError::OrderCreation(_))));
    }
}
