//! Store trait - the collaborator boundary

use async_trait::async_trait;
use shared::models::{Menu, MenuCreate, Order, OrderCreate};
use shared::{ChangeEvent, MarketResult};
use tokio::sync::broadcast;

/// Row filter for order selects
///
/// A vendor fetches the orders addressed to it, a buyer fetches its own.
/// There is deliberately no "all orders" select; every session is scoped to
/// one side of the marketplace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderFilter {
    ByVendor(String),
    ByBuyer(String),
}

impl OrderFilter {
    /// Whether an order row passes this filter
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            Self::ByVendor(id) => order.vendor_id == *id,
            Self::ByBuyer(id) => order.buyer_id == *id,
        }
    }
}

/// Remote marketplace store
///
/// Every method suspends until the store responds; callers must assume
/// remote state may change during that window. The one operation with
/// cross-session contention, [`reserve_stock`](MarketStore::reserve_stock),
/// is therefore a single conditional decrement evaluated store-side, never a
/// client-side read-modify-write.
#[async_trait]
pub trait MarketStore: Send + Sync {
    // ==================== menus ====================

    /// Insert a new menu listing
    ///
    /// Validates the payload, assigns id and timestamps, sets
    /// `current_stock = initial_stock` and `active = true`.
    async fn insert_menu(&self, data: MenuCreate) -> MarketResult<Menu>;

    /// Select all active menus
    async fn fetch_active_menus(&self) -> MarketResult<Vec<Menu>>;

    /// Select one menu by id
    async fn fetch_menu(&self, menu_id: &str) -> MarketResult<Option<Menu>>;

    /// Atomically decrement a menu's stock
    ///
    /// The decrement is conditional: "subtract `quantity` where the menu is
    /// active and `current_stock >= quantity`", rejecting with `OutOfStock`
    /// otherwise. On success the updated row is returned and an update event
    /// is broadcast. Stock never goes negative and there is no increment
    /// operation anywhere in the store.
    async fn reserve_stock(&self, menu_id: &str, quantity: u32) -> MarketResult<Menu>;

    /// Soft-remove a menu by clearing its `active` flag
    async fn deactivate_menu(&self, menu_id: &str) -> MarketResult<Menu>;

    // ==================== orders ====================

    /// Insert a new order in pending status
    async fn insert_order(&self, data: OrderCreate) -> MarketResult<Order>;

    /// Select orders matching a role filter
    async fn fetch_orders(&self, filter: OrderFilter) -> MarketResult<Vec<Order>>;

    /// Transition an order pending -> delivered
    ///
    /// Marking an already-delivered order is a no-op that returns the row
    /// unchanged, so double validation at the handoff counter is harmless.
    async fn mark_order_delivered(&self, order_id: &str) -> MarketResult<Order>;

    // ==================== subscriptions ====================

    /// Subscribe to all menu row changes
    fn subscribe_menus(&self) -> broadcast::Receiver<ChangeEvent<Menu>>;

    /// Subscribe to all order row changes
    ///
    /// The channel carries every order event; role filtering happens in the
    /// subscriber's event handler.
    fn subscribe_orders(&self) -> broadcast::Receiver<ChangeEvent<Order>>;
}
