//! Custom assertions for moderation testing.
//!
//! Provides domain-specific assertions that make tests more readable
//! and provide better error messages.

use moderator::{ModeratorError, ModeratorResult};

/// Asserts that `redacted` differs from `original` only by masked characters.
///
/// # Panics
/// Panics if the character counts differ or an unmasked character changed.
pub fn assert_masked_only(original: &str, redacted: &str, mask: char) {
    let a: Vec<char> = original.chars().collect();
    let b: Vec<char> = redacted.chars().collect();
    assert_eq!(
        a.len(),
        b.len(),
        "Redaction changed length: '{}' -> '{}'",
        original,
        redacted
    );
    for (i, (x, y)) in a.iter().zip(&b).enumerate() {
        assert!(
            x == y || *y == mask,
            "Character {} changed from '{}' to '{}' in '{}'",
            i,
            x,
            y,
            redacted
        );
    }
}

/// Asserts that `result` is a rejection naming `field`.
///
/// # Panics
/// Panics on success or on any other error.
pub fn assert_rejected<T: std::fmt::Debug>(result: ModeratorResult<T>, field: &str) {
    match result {
        Err(ModeratorError::ContentRejected {
            field: actual,
            message,
        }) => {
            assert_eq!(actual, field, "Rejected the wrong field");
            assert!(
                message.contains(field),
                "Message '{}' should mention '{}'",
                message,
                field
            );
        }
        other => panic!("Expected rejection of '{}', got {:?}", field, other),
    }
}
