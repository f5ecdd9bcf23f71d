//! Client configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | PICKUP_CODE_LENGTH | 4 | Length of generated pickup codes |
//! | PICKUP_CODE_RETRIES | 8 | Collision retries against pending codes |

use crate::code::DEFAULT_CODE_LENGTH;

/// Session configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Pickup code length
    pub code_length: usize,
    /// How many times code generation retries on a pending-code collision
    pub code_retry_limit: u32,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            code_length: std::env::var("PICKUP_CODE_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CODE_LENGTH),
            code_retry_limit: std::env::var("PICKUP_CODE_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            code_retry_limit: 8,
        }
    }
}
