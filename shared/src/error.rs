//! Unified error type for store and client operations

use thiserror::Error;

/// Result alias used across the workspace
pub type MarketResult<T> = Result<T, MarketError>;

/// Marketplace errors
///
/// Business outcomes (`OutOfStock`, `NotFound`, `MenuInactive`) are kept
/// separate from infrastructure faults (`Remote`) so a caller can tell
/// "sold out" apart from "try again".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarketError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("menu is out of stock")]
    OutOfStock,

    #[error("menu is no longer active")]
    MenuInactive,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("buyer already has a pending order")]
    PendingOrderExists,

    #[error("session is closed")]
    SessionClosed,

    #[error("operation not permitted for role: {0}")]
    RoleMismatch(String),

    #[error("remote store failure: {0}")]
    Remote(String),
}

impl MarketError {
    /// Create a not found error for a named resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a remote failure error
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Whether this error is a normal business outcome of order placement
    /// rather than an infrastructure fault
    pub fn is_business_outcome(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::OutOfStock | Self::MenuInactive
        )
    }
}
