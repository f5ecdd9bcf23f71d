//! Embedded in-memory store
//!
//! Backs tests and demos. Rows live in `DashMap`s keyed by id; each table
//! has one broadcast channel that fans every mutation out to subscribers.
//! The per-key entry guard of `DashMap` serializes the conditional stock
//! decrement, which is what closes the two-buyers-for-the-last-unit race.

use crate::store::{MarketStore, OrderFilter};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use shared::models::{Menu, MenuCreate, Order, OrderCreate, OrderStatus};
use shared::{ChangeEvent, MarketError, MarketResult};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Default broadcast channel capacity, overridable via [`MemoryStore::with_capacity`]
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// In-memory marketplace store
#[derive(Debug)]
pub struct MemoryStore {
    menus: DashMap<String, Menu>,
    orders: DashMap<String, Order>,
    menu_tx: broadcast::Sender<ChangeEvent<Menu>>,
    order_tx: broadcast::Sender<ChangeEvent<Order>>,
}

impl MemoryStore {
    /// Create a store with the default channel capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a store with a custom broadcast capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (menu_tx, _) = broadcast::channel(capacity);
        let (order_tx, _) = broadcast::channel(capacity);
        Self {
            menus: DashMap::new(),
            orders: DashMap::new(),
            menu_tx,
            order_tx,
        }
    }

    fn broadcast_menu(&self, event: ChangeEvent<Menu>) {
        // Send fails only when no subscriber is connected, which is fine.
        let _ = self.menu_tx.send(event);
    }

    fn broadcast_order(&self, event: ChangeEvent<Order>) {
        let _ = self.order_tx.send(event);
    }

    fn validate_menu(data: &MenuCreate) -> MarketResult<()> {
        if data.title.trim().is_empty() {
            return Err(MarketError::validation("title cannot be empty"));
        }
        if data.price < Decimal::ZERO {
            return Err(MarketError::validation("price cannot be negative"));
        }
        if data.vendor_id.trim().is_empty() {
            return Err(MarketError::validation("vendor_id cannot be empty"));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketStore for MemoryStore {
    async fn insert_menu(&self, data: MenuCreate) -> MarketResult<Menu> {
        Self::validate_menu(&data)?;

        let now = Utc::now();
        let menu = Menu {
            id: Uuid::new_v4().to_string(),
            vendor_id: data.vendor_id,
            title: data.title,
            price: data.price,
            initial_stock: data.initial_stock,
            current_stock: data.initial_stock,
            location: data.location,
            active: true,
            created_at: now,
            updated_at: now,
        };

        self.menus.insert(menu.id.clone(), menu.clone());
        tracing::info!(menu_id = %menu.id, stock = menu.initial_stock, "Menu created");
        self.broadcast_menu(ChangeEvent::Insert { new: menu.clone() });
        Ok(menu)
    }

    async fn fetch_active_menus(&self) -> MarketResult<Vec<Menu>> {
        Ok(self
            .menus
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn fetch_menu(&self, menu_id: &str) -> MarketResult<Option<Menu>> {
        Ok(self.menus.get(menu_id).map(|entry| entry.value().clone()))
    }

    async fn reserve_stock(&self, menu_id: &str, quantity: u32) -> MarketResult<Menu> {
        // The entry guard holds the shard lock for this key, so the
        // check-then-decrement below is atomic with respect to every other
        // reservation against the same menu.
        let updated = {
            let mut entry = self
                .menus
                .get_mut(menu_id)
                .ok_or_else(|| MarketError::not_found("menu"))?;

            if !entry.active {
                return Err(MarketError::MenuInactive);
            }
            if entry.current_stock < quantity {
                return Err(MarketError::OutOfStock);
            }

            entry.current_stock -= quantity;
            entry.updated_at = Utc::now();
            entry.value().clone()
        };

        tracing::debug!(
            menu_id = %updated.id,
            remaining = updated.current_stock,
            "Stock reserved"
        );
        self.broadcast_menu(ChangeEvent::Update {
            new: updated.clone(),
        });
        Ok(updated)
    }

    async fn deactivate_menu(&self, menu_id: &str) -> MarketResult<Menu> {
        let updated = {
            let mut entry = self
                .menus
                .get_mut(menu_id)
                .ok_or_else(|| MarketError::not_found("menu"))?;
            entry.active = false;
            entry.updated_at = Utc::now();
            entry.value().clone()
        };

        tracing::info!(menu_id = %updated.id, "Menu deactivated");
        self.broadcast_menu(ChangeEvent::Update {
            new: updated.clone(),
        });
        Ok(updated)
    }

    async fn insert_order(&self, data: OrderCreate) -> MarketResult<Order> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            secure_id: data.secure_id,
            menu_id: data.menu_id,
            buyer_id: data.buyer_id,
            buyer_name: data.buyer_name,
            vendor_id: data.vendor_id,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.orders.insert(order.id.clone(), order.clone());
        tracing::info!(order_id = %order.id, code = %order.secure_id, "Order created");
        self.broadcast_order(ChangeEvent::Insert { new: order.clone() });
        Ok(order)
    }

    async fn fetch_orders(&self, filter: OrderFilter) -> MarketResult<Vec<Order>> {
        Ok(self
            .orders
            .iter()
            .filter(|entry| filter.matches(entry))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn mark_order_delivered(&self, order_id: &str) -> MarketResult<Order> {
        let (updated, changed) = {
            let mut entry = self
                .orders
                .get_mut(order_id)
                .ok_or_else(|| MarketError::not_found("order"))?;

            if entry.status == OrderStatus::Delivered {
                // Already delivered: leave the row untouched.
                (entry.value().clone(), false)
            } else {
                entry.status = OrderStatus::Delivered;
                entry.updated_at = Utc::now();
                (entry.value().clone(), true)
            }
        };

        if changed {
            tracing::info!(order_id = %updated.id, "Order delivered");
            self.broadcast_order(ChangeEvent::Update {
                new: updated.clone(),
            });
        }
        Ok(updated)
    }

    fn subscribe_menus(&self) -> broadcast::Receiver<ChangeEvent<Menu>> {
        self.menu_tx.subscribe()
    }

    fn subscribe_orders(&self) -> broadcast::Receiver<ChangeEvent<Order>> {
        self.order_tx.subscribe()
    }
}
