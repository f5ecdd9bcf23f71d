//! One market day end to end: a vendor lists a menu, a buyer orders, the
//! vendor validates the pickup code at the counter and hands the food over.
//!
//! Run with `cargo run -p mercadito-client --example market_day`. Set
//! `MERCADITO_LOG_DIR` to an existing directory to also write daily rolling
//! log files; `RUST_LOG` overrides the verbosity.

use mercadito_client::{Config, Session, init_logger, init_logger_with_file};
use mercadito_store::MemoryStore;
use rust_decimal::Decimal;
use shared::MarketResult;
use shared::models::{Location, Role, User};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> MarketResult<()> {
    match std::env::var("MERCADITO_LOG_DIR") {
        Ok(dir) => init_logger_with_file(Some("debug"), Some(&dir)),
        Err(_) => init_logger(),
    }

    let store = Arc::new(MemoryStore::new());

    let rosa = User::new("vendor-rosa", "Rosa", Role::Vendor);
    let carlos = User::new("buyer-carlos", "Carlos", Role::Buyer);

    let vendor = Session::open(store.clone(), rosa, Config::default()).await?;
    let menu = vendor
        .create_menu(
            "Menú criollo",
            Decimal::new(1250, 2),
            10,
            Location::Brena,
        )
        .await?;

    let buyer = Session::open(store, carlos, Config::default()).await?;
    let order = match buyer.place_order(&menu.id).await? {
        Some(order) => order,
        None => {
            tracing::warn!(menu_id = %menu.id, "Menu sold out before the order");
            return Ok(());
        }
    };
    tracing::info!(code = %order.secure_id, "Pickup code issued to the buyer");

    // Give the vendor's listener a moment to apply the pushed insert.
    for _ in 0..200 {
        if !vendor.orders().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // Codes are read aloud at the counter, so case does not matter.
    match vendor.validate_code(&order.secure_id.to_lowercase())? {
        Some(found) => {
            let delivered = vendor.mark_delivered(&found.id).await?;
            tracing::info!(order_id = %delivered.id, "Order handed over");
        }
        None => tracing::warn!(code = %order.secure_id, "Code did not match"),
    }

    vendor.close();
    buyer.close();
    Ok(())
}
