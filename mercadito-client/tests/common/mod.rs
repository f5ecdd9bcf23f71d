//! Shared fixtures for the integration suites
#![allow(dead_code)]

use mercadito_client::{Config, Session};
use mercadito_store::{MarketStore, MemoryStore};
use shared::models::{Location, Role, User};
use std::sync::Arc;
use std::time::Duration;

pub const VENDOR_ID: &str = "e4d2e7b1-1234-4a5b-b6c7-d8e9f0a1b2c3";
pub const BUYER_ID: &str = "b8c9d0e1-5678-4f9a-a0b1-c2d3e4f56677";

pub fn vendor() -> User {
    User::new(VENDOR_ID, "Sra. María", Role::Vendor)
}

pub fn buyer() -> User {
    User::new(BUYER_ID, "Carlos", Role::Buyer)
}

pub fn second_buyer() -> User {
    User::new("buyer-2", "Lucía", Role::Buyer)
}

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub async fn open_session(store: Arc<dyn MarketStore>, user: User) -> Session {
    Session::open(store, user, Config::default())
        .await
        .expect("session open")
}

/// Publish a menu through a throwaway vendor session
pub async fn publish_menu(store: Arc<MemoryStore>, stock: u32) -> shared::models::Menu {
    let session = open_session(store, vendor()).await;
    session
        .create_menu(
            "Menú criollo",
            "12.50".parse().unwrap(),
            stock,
            Location::SanIsidro,
        )
        .await
        .expect("create menu")
}

/// Poll until `cond` holds or the deadline passes
///
/// Local collections converge via the push channel, so assertions about
/// them have to wait for the listener task rather than read immediately.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !cond() {
        if tokio::time::Instant::now() > deadline {
            panic!("condition not reached within deadline");
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
