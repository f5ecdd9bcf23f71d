//! Mercadito remote store boundary
//!
//! The marketplace core treats persistence as an external collaborator: a
//! structured store with two tables (`menus`, `orders`) supporting row
//! insert, conditional update, select-by-filter and a per-table change
//! subscription that pushes every mutation to all connected listeners.
//!
//! [`MarketStore`] is that boundary as a trait. [`MemoryStore`] is the
//! embedded implementation used by tests and demos; a production deployment
//! would put a database-backed implementation behind the same trait.

pub mod memory;
pub mod store;

// Re-exports
pub use memory::MemoryStore;
pub use store::{MarketStore, OrderFilter};
