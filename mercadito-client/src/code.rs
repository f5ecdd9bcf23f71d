//! Pickup code generation
//!
//! Codes are short strings a buyer reads out or shows at the handoff
//! counter, so the alphabet drops every visually or verbally confusable
//! character (0/O, 1/I/L). Codes are not globally unique by construction;
//! uniqueness matters only among currently pending orders, and the session
//! enforces it there by retrying on collision.

use rand::Rng;
use std::collections::HashSet;

/// Characters a code may contain. No `0`, `1`, `I`, `L`, `O`.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Default pickup code length
pub const DEFAULT_CODE_LENGTH: usize = 4;

/// Generate one pickup code of the given length, drawn uniformly from
/// [`CODE_ALPHABET`]
pub fn generate_pickup_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Generate a code that does not collide with any code in `taken`
///
/// `taken` holds the uppercase codes of currently pending orders. Retries up
/// to `retry_limit` times; if every draw collides the last candidate is
/// returned anyway (validation is then ambiguous for that code, the same
/// exposure an unscoped draw would have) and the event is logged.
pub fn unique_pending_code(length: usize, retry_limit: u32, taken: &HashSet<String>) -> String {
    let mut candidate = generate_pickup_code(length);
    for _ in 0..retry_limit {
        if !taken.contains(&candidate) {
            return candidate;
        }
        candidate = generate_pickup_code(length);
    }
    if taken.contains(&candidate) {
        tracing::warn!(code = %candidate, "Pickup code collides with a pending order after retries");
    }
    candidate
}
