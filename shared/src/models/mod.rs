//! Data models
//!
//! Shared between the store and client crates. Row ids are UUID strings
//! assigned by the store at insert time; timestamps are UTC.

pub mod location;
pub mod menu;
pub mod order;
pub mod user;

// Re-exports
pub use location::*;
pub use menu::*;
pub use order::*;
pub use user::*;
