//! Mercadito client core
//!
//! The role-scoped session that a UI shell drives: it keeps local menu and
//! order collections synchronized with the remote store, generates pickup
//! codes, and runs the order lifecycle (place, validate, deliver).
//!
//! # Module structure
//!
//! ```text
//! mercadito-client/src/
//! ├── code.rs      # pickup code generation
//! ├── config.rs    # env-driven configuration
//! ├── logger.rs    # tracing setup
//! ├── sync.rs      # pure change-event reducers + role scoping
//! └── session.rs   # open/close session, lifecycle operations
//! ```

pub mod code;
pub mod config;
pub mod logger;
pub mod session;
pub mod sync;

// Re-export public types
pub use code::{generate_pickup_code, CODE_ALPHABET, DEFAULT_CODE_LENGTH};
pub use config::Config;
pub use logger::{init_logger, init_logger_with_file};
pub use session::Session;
pub use sync::{apply_menu_event, apply_order_event, OrderScope};
