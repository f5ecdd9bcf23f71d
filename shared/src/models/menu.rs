//! Menu Model

use super::Location;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu listing entity
///
/// Owned by exactly one vendor. Stock only ever moves downwards: the sole
/// mutator of `current_stock` is the store's reservation operation, and no
/// restock path exists. Menus are never hard-deleted; clearing `active` is
/// the only removal mechanism.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Menu {
    pub id: String,
    /// Owning vendor reference
    pub vendor_id: String,
    pub title: String,
    pub price: Decimal,
    /// Units available at publication, immutable afterwards
    pub initial_stock: u32,
    /// Units still available; invariant: `current_stock <= initial_stock`
    pub current_stock: u32,
    pub location: Location,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Menu {
    /// Whether a buyer can currently order from this menu
    pub fn is_orderable(&self) -> bool {
        self.active && self.current_stock > 0
    }
}

/// Create menu payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCreate {
    pub vendor_id: String,
    pub title: String,
    pub price: Decimal,
    pub initial_stock: u32,
    pub location: Location,
}
