//! Change-event reducers
//!
//! The synchronization layer is split transport-free: these functions fold a
//! single table change event into a local collection and are what the
//! session's listener tasks run for every pushed event. Insert upserts by id
//! (a session subscribes before its bulk fetch, so an insert published during
//! the fetch window can replay for a row the fetch already returned), update
//! replaces by id, delete removes by id. No cross-event ordering is assumed
//! beyond the store's own per-row last-write-wins.

use shared::ChangeEvent;
use shared::models::{Menu, Order, Role, User};

/// Which order events a session keeps
///
/// The order channel carries every row change; each role only materializes
/// its own side of the marketplace, matching the filter used for the initial
/// fetch (a vendor its `vendor_id`, a buyer its `buyer_id`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderScope {
    Vendor(String),
    Buyer(String),
}

impl OrderScope {
    /// Scope for the given session user
    pub fn for_user(user: &User) -> Self {
        match user.role {
            Role::Vendor => Self::Vendor(user.id.clone()),
            Role::Buyer => Self::Buyer(user.id.clone()),
        }
    }

    /// Whether an order row belongs in this scope's collection
    pub fn admits(&self, order: &Order) -> bool {
        match self {
            Self::Vendor(id) => order.vendor_id == *id,
            Self::Buyer(id) => order.buyer_id == *id,
        }
    }
}

/// Fold one menu change event into the local menu collection
pub fn apply_menu_event(menus: &mut Vec<Menu>, event: ChangeEvent<Menu>) {
    match event {
        ChangeEvent::Insert { new } => match menus.iter_mut().find(|m| m.id == new.id) {
            Some(existing) => *existing = new,
            None => menus.push(new),
        },
        ChangeEvent::Update { new } => {
            if let Some(existing) = menus.iter_mut().find(|m| m.id == new.id) {
                *existing = new;
            }
        }
        ChangeEvent::Delete { old } => menus.retain(|m| m.id != old.id),
    }
}

/// Fold one order change event into the local order collection
///
/// Events outside `scope` are dropped. Order rows are never deleted by the
/// store, so delete events are ignored outright.
pub fn apply_order_event(orders: &mut Vec<Order>, event: ChangeEvent<Order>, scope: &OrderScope) {
    if !scope.admits(event.row()) {
        return;
    }
    match event {
        ChangeEvent::Insert { new } => match orders.iter_mut().find(|o| o.id == new.id) {
            Some(existing) => *existing = new,
            None => orders.push(new),
        },
        ChangeEvent::Update { new } => {
            if let Some(existing) = orders.iter_mut().find(|o| o.id == new.id) {
                *existing = new;
            }
        }
        ChangeEvent::Delete { .. } => {}
    }
}
