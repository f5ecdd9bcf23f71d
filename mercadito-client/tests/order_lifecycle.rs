//! Order lifecycle end to end: placement, code validation, delivery

mod common;

use common::*;
use mercadito_store::MarketStore;
use shared::MarketError;
use shared::models::OrderStatus;

#[tokio::test]
async fn round_trip_one_order() {
    let store = store();
    let menu = publish_menu(store.clone(), 20).await;

    let buyer_session = open_session(store.clone(), buyer()).await;
    let order = buyer_session
        .place_order(&menu.id)
        .await
        .unwrap()
        .expect("order created");

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.menu_id, menu.id);
    assert_eq!(order.vendor_id, menu.vendor_id);
    assert_eq!(order.buyer_name, "Carlos");
    assert_eq!(order.secure_id.len(), 4);

    // Stock went 20 -> 19, exactly one order exists
    let row = store.fetch_menu(&menu.id).await.unwrap().unwrap();
    assert_eq!(row.current_stock, 19);
    assert_eq!(row.initial_stock, 20);

    wait_until(|| buyer_session.orders().len() == 1).await;
}

#[tokio::test]
async fn sold_out_menu_creates_nothing() {
    let store = store();
    let menu = publish_menu(store.clone(), 0).await;

    let buyer_session = open_session(store.clone(), buyer()).await;
    let result = buyer_session.place_order(&menu.id).await.unwrap();
    assert!(result.is_none());
    assert!(buyer_session.orders().is_empty());
}

#[tokio::test]
async fn unknown_menu_is_a_normal_miss() {
    let store = store();
    let buyer_session = open_session(store.clone(), buyer()).await;
    let result = buyer_session.place_order("no-such-menu").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn deactivated_menu_rejects_orders() {
    let store = store();
    let menu = publish_menu(store.clone(), 5).await;
    store.deactivate_menu(&menu.id).await.unwrap();

    let buyer_session = open_session(store.clone(), buyer()).await;
    assert!(buyer_session.place_order(&menu.id).await.unwrap().is_none());
}

#[tokio::test]
async fn pickup_code_validates_case_insensitively() {
    let store = store();
    let menu = publish_menu(store.clone(), 5).await;

    let buyer_session = open_session(store.clone(), buyer()).await;
    let order = buyer_session.place_order(&menu.id).await.unwrap().unwrap();

    let vendor_session = open_session(store.clone(), vendor()).await;
    wait_until(|| vendor_session.orders().len() == 1).await;

    let lower = order.secure_id.to_lowercase();
    let found = vendor_session.validate_code(&lower).unwrap().unwrap();
    assert_eq!(found.id, order.id);

    assert!(vendor_session.validate_code("ZZZZ").unwrap().is_none());
}

#[tokio::test]
async fn delivered_orders_never_match_validation() {
    let store = store();
    let menu = publish_menu(store.clone(), 5).await;

    let buyer_session = open_session(store.clone(), buyer()).await;
    let order = buyer_session.place_order(&menu.id).await.unwrap().unwrap();

    let vendor_session = open_session(store.clone(), vendor()).await;
    wait_until(|| vendor_session.orders().len() == 1).await;

    let delivered = vendor_session.mark_delivered(&order.id).await.unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);

    wait_until(|| {
        vendor_session
            .orders()
            .first()
            .is_some_and(|o| o.status == OrderStatus::Delivered)
    })
    .await;

    assert!(
        vendor_session
            .validate_code(&order.secure_id)
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn double_delivery_is_a_noop() {
    let store = store();
    let menu = publish_menu(store.clone(), 5).await;

    let buyer_session = open_session(store.clone(), buyer()).await;
    let order = buyer_session.place_order(&menu.id).await.unwrap().unwrap();

    let vendor_session = open_session(store.clone(), vendor()).await;
    wait_until(|| vendor_session.orders().len() == 1).await;

    let first = vendor_session.mark_delivered(&order.id).await.unwrap();
    wait_until(|| {
        vendor_session
            .orders()
            .first()
            .is_some_and(|o| o.status == OrderStatus::Delivered)
    })
    .await;

    let second = vendor_session.mark_delivered(&order.id).await.unwrap();
    assert_eq!(second.status, OrderStatus::Delivered);
    assert_eq!(second.updated_at, first.updated_at);
}

#[tokio::test]
async fn buyer_holds_at_most_one_pending_order() {
    let store = store();
    let menu = publish_menu(store.clone(), 5).await;

    let buyer_session = open_session(store.clone(), buyer()).await;
    buyer_session
        .place_order(&menu.id)
        .await
        .unwrap()
        .expect("first order");
    wait_until(|| buyer_session.pending_order().is_some()).await;

    let err = buyer_session.place_order(&menu.id).await.unwrap_err();
    assert_eq!(err, MarketError::PendingOrderExists);

    // Stock moved exactly once
    let row = store.fetch_menu(&menu.id).await.unwrap().unwrap();
    assert_eq!(row.current_stock, 4);
}

#[tokio::test]
async fn immediate_reorder_hits_the_pending_guard() {
    let store = store();
    let menu = publish_menu(store.clone(), 5).await;

    let buyer_session = open_session(store.clone(), buyer()).await;
    buyer_session
        .place_order(&menu.id)
        .await
        .unwrap()
        .expect("first order");

    // No waiting for the push channel: the classic double-submit must be
    // rejected by the guard straight away.
    let err = buyer_session.place_order(&menu.id).await.unwrap_err();
    assert_eq!(err, MarketError::PendingOrderExists);

    // Stock moved exactly once
    let row = store.fetch_menu(&menu.id).await.unwrap().unwrap();
    assert_eq!(row.current_stock, 4);

    // The pushed insert replays the same row; it must not duplicate it.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(buyer_session.orders().len(), 1);
}

#[tokio::test]
async fn delivery_frees_the_buyer_for_the_next_order() {
    let store = store();
    let menu = publish_menu(store.clone(), 5).await;

    let buyer_session = open_session(store.clone(), buyer()).await;
    let order = buyer_session.place_order(&menu.id).await.unwrap().unwrap();
    wait_until(|| buyer_session.pending_order().is_some()).await;

    let vendor_session = open_session(store.clone(), vendor()).await;
    wait_until(|| vendor_session.orders().len() == 1).await;
    vendor_session.mark_delivered(&order.id).await.unwrap();

    wait_until(|| buyer_session.pending_order().is_none()).await;
    let second = buyer_session.place_order(&menu.id).await.unwrap();
    assert!(second.is_some());
}

#[tokio::test]
async fn roles_are_enforced_on_lifecycle_operations() {
    let store = store();
    let menu = publish_menu(store.clone(), 5).await;

    let vendor_session = open_session(store.clone(), vendor()).await;
    assert!(matches!(
        vendor_session.place_order(&menu.id).await.unwrap_err(),
        MarketError::RoleMismatch(_)
    ));

    let buyer_session = open_session(store.clone(), buyer()).await;
    assert!(matches!(
        buyer_session.validate_code("K9M2").unwrap_err(),
        MarketError::RoleMismatch(_)
    ));
    assert!(matches!(
        buyer_session.mark_delivered("order-1").await.unwrap_err(),
        MarketError::RoleMismatch(_)
    ));
    assert!(matches!(
        buyer_session
            .create_menu("x", "1".parse().unwrap(), 1, shared::models::Location::Brena)
            .await
            .unwrap_err(),
        MarketError::RoleMismatch(_)
    ));
}

#[tokio::test]
async fn two_buyers_race_for_the_last_unit() {
    let store = store();
    let menu = publish_menu(store.clone(), 1).await;

    let first = open_session(store.clone(), buyer()).await;
    let second = open_session(store.clone(), second_buyer()).await;

    let menu_id_a = menu.id.clone();
    let menu_id_b = menu.id.clone();
    let (a, b) = tokio::join!(first.place_order(&menu_id_a), second.place_order(&menu_id_b));

    let a = a.unwrap();
    let b = b.unwrap();
    assert!(
        a.is_some() ^ b.is_some(),
        "exactly one buyer must win the last unit"
    );

    let row = store.fetch_menu(&menu.id).await.unwrap().unwrap();
    assert_eq!(row.current_stock, 0);
}
