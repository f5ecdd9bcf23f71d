//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status
///
/// Two states only: an order is created `Pending` together with the stock
/// reservation and moves to `Delivered` exactly once, when the vendor
/// validates the pickup code at handoff. No cancellation, no expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Delivered,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Delivered => write!(f, "delivered"),
        }
    }
}

/// Order entity
///
/// `secure_id` is the short pickup code the buyer presents at handoff. It is
/// only required to be unique among currently pending orders; a delivered
/// order may share a code with a live one and must never match validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    /// Human-presentable pickup code
    pub secure_id: String,
    pub menu_id: String,
    pub buyer_id: String,
    /// Snapshot of the buyer's display name at creation time
    pub buyer_name: String,
    /// Snapshot of the menu's owner at creation time, not a live reference
    pub vendor_id: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Whether this order's code should match a validation lookup
    pub fn matches_code(&self, code: &str) -> bool {
        self.status == OrderStatus::Pending && self.secure_id.eq_ignore_ascii_case(code)
    }
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub secure_id: String,
    pub menu_id: String,
    pub buyer_id: String,
    pub buyer_name: String,
    pub vendor_id: String,
}
