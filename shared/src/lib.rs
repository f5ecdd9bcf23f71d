//! Shared types for the Mercadito marketplace
//!
//! Common types used across the store and client crates: data models,
//! change-event payloads and the unified error type.

pub mod error;
pub mod event;
pub mod models;

// Re-exports
pub use error::{MarketError, MarketResult};
pub use event::ChangeEvent;
pub use serde::{Deserialize, Serialize};
