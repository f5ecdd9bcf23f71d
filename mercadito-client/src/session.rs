//! Role-scoped marketplace session
//!
//! A session is the unit of presence: `open` performs the initial bulk fetch
//! and acquires the two change subscriptions as resources, `close` releases
//! them and clears local state. All lifecycle operations run against the
//! session's synchronized local collections plus the remote store.
//!
//! # Operation flow
//!
//! ```text
//! place_order(menu_id)
//!     ├─ 1. Guard: session open, buyer role, no pending order yet
//!     ├─ 2. reserve_stock(menu_id, 1), atomic conditional decrement
//!     │      sold out / gone / inactive  => Ok(None), nothing created
//!     ├─ 3. Pickup code, unique among local pending codes
//!     ├─ 4. insert_order(pending, vendor_id from the reserved row)
//!     └─ 5. Fold the new row into local state, then Ok(Some(order));
//!            the pushed insert replays later and upserts by id
//! ```

use crate::code::unique_pending_code;
use crate::config::Config;
use crate::sync::{OrderScope, apply_menu_event, apply_order_event};
use mercadito_store::{MarketStore, OrderFilter};
use parking_lot::RwLock;
use shared::models::{Location, Menu, MenuCreate, Order, OrderStatus, Role, User};
use shared::{ChangeEvent, MarketError, MarketResult};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

/// Local collections kept consistent with the store
#[derive(Debug, Default)]
struct LocalState {
    menus: RwLock<Vec<Menu>>,
    orders: RwLock<Vec<Order>>,
}

/// An open marketplace session for one user
pub struct Session {
    user: User,
    config: Config,
    store: Arc<dyn MarketStore>,
    state: Arc<LocalState>,
    cancel: CancellationToken,
    closed: AtomicBool,
}

impl Session {
    /// Open a session: bulk-fetch the user's view and start applying pushed
    /// changes to it
    ///
    /// Subscriptions are taken out before the fetch so no event published
    /// during the fetch window is lost; the reducers upsert by id, so a late
    /// replay of an already-fetched row is harmless.
    pub async fn open(
        store: Arc<dyn MarketStore>,
        user: User,
        config: Config,
    ) -> MarketResult<Self> {
        let scope = OrderScope::for_user(&user);
        let filter = match &scope {
            OrderScope::Vendor(id) => OrderFilter::ByVendor(id.clone()),
            OrderScope::Buyer(id) => OrderFilter::ByBuyer(id.clone()),
        };

        let mut menu_rx = store.subscribe_menus();
        let mut order_rx = store.subscribe_orders();

        let menus = store.fetch_active_menus().await?;
        let orders = store.fetch_orders(filter).await?;

        let state = Arc::new(LocalState {
            menus: RwLock::new(menus),
            orders: RwLock::new(orders),
        });
        let cancel = CancellationToken::new();

        // Menu listener
        {
            let state = state.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        event = menu_rx.recv() => match event {
                            Ok(event) => apply_menu_event(&mut state.menus.write(), event),
                            Err(RecvError::Lagged(missed)) => {
                                tracing::warn!(missed, "Menu subscription lagged");
                            }
                            Err(RecvError::Closed) => break,
                        },
                    }
                }
            });
        }

        // Order listener, role-filtered locally
        {
            let state = state.clone();
            let cancel = cancel.clone();
            let scope = scope.clone();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        event = order_rx.recv() => match event {
                            Ok(event) => {
                                apply_order_event(&mut state.orders.write(), event, &scope)
                            }
                            Err(RecvError::Lagged(missed)) => {
                                tracing::warn!(missed, "Order subscription lagged");
                            }
                            Err(RecvError::Closed) => break,
                        },
                    }
                }
            });
        }

        tracing::info!(user_id = %user.id, role = %user.role, "Session opened");
        Ok(Self {
            user,
            config,
            store,
            state,
            cancel,
            closed: AtomicBool::new(false),
        })
    }

    /// Close the session: stop the listeners and clear local state
    ///
    /// Safe to call more than once.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.cancel.cancel();
        self.state.menus.write().clear();
        self.state.orders.write().clear();
        tracing::info!(user_id = %self.user.id, "Session closed");
    }

    /// The session's user
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Snapshot of the synchronized menu collection
    pub fn menus(&self) -> Vec<Menu> {
        self.state.menus.read().clone()
    }

    /// Snapshot of the menus available at one pickup location
    pub fn menus_at(&self, location: Location) -> Vec<Menu> {
        self.state
            .menus
            .read()
            .iter()
            .filter(|m| m.location == location && m.active)
            .cloned()
            .collect()
    }

    /// Snapshot of the synchronized order collection
    pub fn orders(&self) -> Vec<Order> {
        self.state.orders.read().clone()
    }

    /// The buyer's currently pending order, if any
    pub fn pending_order(&self) -> Option<Order> {
        self.state
            .orders
            .read()
            .iter()
            .find(|o| o.buyer_id == self.user.id && o.status == OrderStatus::Pending)
            .cloned()
    }

    fn ensure_open(&self) -> MarketResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(MarketError::SessionClosed);
        }
        Ok(())
    }

    fn ensure_role(&self, role: Role) -> MarketResult<()> {
        if self.user.role != role {
            return Err(MarketError::RoleMismatch(self.user.role.to_string()));
        }
        Ok(())
    }

    /// Publish a new menu listing (vendor only)
    ///
    /// The created row reaches the local collection through the menu
    /// subscription like any other insert; it is not appended twice.
    pub async fn create_menu(
        &self,
        title: impl Into<String>,
        price: rust_decimal::Decimal,
        initial_stock: u32,
        location: Location,
    ) -> MarketResult<Menu> {
        self.ensure_open()?;
        self.ensure_role(Role::Vendor)?;

        self.store
            .insert_menu(MenuCreate {
                vendor_id: self.user.id.clone(),
                title: title.into(),
                price,
                initial_stock,
                location,
            })
            .await
    }

    /// Place an order for one unit of a menu (buyer only)
    ///
    /// Losing the race for the last unit is a normal outcome: sold-out,
    /// vanished and deactivated menus all come back as `Ok(None)`, with no
    /// order created and no state changed. Infrastructure faults propagate
    /// as `Err` so the caller can distinguish "try again" from "sold out".
    pub async fn place_order(&self, menu_id: &str) -> MarketResult<Option<Order>> {
        self.ensure_open()?;
        self.ensure_role(Role::Buyer)?;

        // One pending order per buyer, enforced here at the lifecycle layer
        // rather than only in the UI.
        if self.pending_order().is_some() {
            return Err(MarketError::PendingOrderExists);
        }

        let menu = match self.store.reserve_stock(menu_id, 1).await {
            Ok(menu) => menu,
            Err(err) if err.is_business_outcome() => {
                tracing::info!(menu_id, %err, "Order not created");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let taken: HashSet<String> = self
            .state
            .orders
            .read()
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .map(|o| o.secure_id.to_uppercase())
            .collect();
        let secure_id =
            unique_pending_code(self.config.code_length, self.config.code_retry_limit, &taken);

        let order = self
            .store
            .insert_order(shared::models::OrderCreate {
                secure_id,
                menu_id: menu.id.clone(),
                buyer_id: self.user.id.clone(),
                buyer_name: self.user.name.clone(),
                vendor_id: menu.vendor_id.clone(),
            })
            .await
            .inspect_err(|err| {
                // The reserved unit cannot be returned: the store has no
                // increment path. Surface loudly.
                tracing::error!(menu_id, %err, "Order insert failed after reservation");
            })?;

        // Fold the new row in right away so a back-to-back place_order hits
        // the pending guard without waiting on the push channel; the pushed
        // insert replays later and upserts by id.
        apply_order_event(
            &mut self.state.orders.write(),
            ChangeEvent::Insert { new: order.clone() },
            &OrderScope::for_user(&self.user),
        );

        Ok(Some(order))
    }

    /// Look up a pending order by pickup code (vendor only)
    ///
    /// Case-insensitive, pending orders only, resolved purely against the
    /// synchronized local set: validation happens face to face and must not
    /// wait on a remote round-trip. Delivered orders never match, even if a
    /// pending order re-drew their code.
    pub fn validate_code(&self, code: &str) -> MarketResult<Option<Order>> {
        self.ensure_open()?;
        self.ensure_role(Role::Vendor)?;

        Ok(self
            .state
            .orders
            .read()
            .iter()
            .find(|o| o.matches_code(code))
            .cloned())
    }

    /// Mark an order delivered after validating its code (vendor only)
    ///
    /// Already-delivered orders are returned unchanged; double validation at
    /// the counter is a no-op, not an error.
    pub async fn mark_delivered(&self, order_id: &str) -> MarketResult<Order> {
        self.ensure_open()?;
        self.ensure_role(Role::Vendor)?;

        let local = self
            .state
            .orders
            .read()
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
            .ok_or_else(|| MarketError::not_found("order"))?;

        if local.status == OrderStatus::Delivered {
            return Ok(local);
        }

        self.store.mark_order_delivered(order_id).await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Listener tasks must not outlive the session.
        self.close();
    }
}
