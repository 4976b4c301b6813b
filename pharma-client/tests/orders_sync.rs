// pharma-client/tests/orders_sync.rs
// Order list loading, single-order refresh, stale results and paging

mod common;

use common::*;
use pharma_client::orders::{OrderBoard, OrderDetail, SyncOutcome};
use pharma_client::{ClientError, NotificationBus, OrderStatus};
use std::sync::Arc;

fn board(api: &Arc<MockApi>) -> OrderBoard {
    OrderBoard::new(api.clone(), session(), 10)
}

fn ids(board: &OrderBoard) -> Vec<i64> {
    board.orders().iter().map(|o| o.order_id).collect()
}

async fn wait_for_calls(api: &MockApi, n: usize) {
    while Calls::get(&api.calls.orders) < n {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_load_all_replaces_collection() {
    let api = Arc::new(MockApi::new().with_orders(orders(3)));
    let board = board(&api);

    assert_eq!(board.load_all().await.unwrap(), SyncOutcome::Loaded(3));
    assert_eq!(ids(&board), vec![1, 2, 3]);
    assert!(!board.is_loading());

    api.set_orders(vec![order(9, OrderStatus::Preparing)]);
    assert_eq!(board.load_all().await.unwrap(), SyncOutcome::Loaded(1));
    assert_eq!(ids(&board), vec![9]);
}

#[tokio::test]
async fn test_load_failure_keeps_collection_and_reports() {
    let api = Arc::new(MockApi::new().with_orders(orders(2)));
    let board = board(&api);
    board.load_all().await.unwrap();

    api.fail(Endpoint::Orders);
    let err = board.load_all().await.unwrap_err();
    assert!(matches!(err, ClientError::Api { .. }));
    assert_eq!(ids(&board), vec![1, 2]);
    assert!(!board.is_loading());
    assert!(board.last_error().is_some());

    // Success clears the recorded error
    api.recover(Endpoint::Orders);
    board.load_all().await.unwrap();
    assert!(board.last_error().is_none());
}

#[tokio::test]
async fn test_refresh_one_replaces_in_place() {
    let api = Arc::new(MockApi::new().with_orders(orders(3)));
    let board = board(&api);
    board.load_all().await.unwrap();

    let mut fresh = orders(3);
    fresh[1].status = OrderStatus::Delivering;
    fresh[0].status = OrderStatus::Cancelled;
    api.set_orders(fresh);

    assert_eq!(board.refresh_one(2).await.unwrap(), SyncOutcome::Replaced);
    assert_eq!(ids(&board), vec![1, 2, 3]);
    assert_eq!(board.get(2).unwrap().status, OrderStatus::Delivering);
    // Only the requested order changes
    assert_eq!(board.get(1).unwrap().status, OrderStatus::Ordered);
}

#[tokio::test]
async fn test_refresh_one_missing_from_response_is_noop() {
    let api = Arc::new(MockApi::new().with_orders(orders(3)));
    let board = board(&api);
    board.load_all().await.unwrap();

    api.set_orders(vec![order(1, OrderStatus::Preparing)]);
    assert_eq!(board.refresh_one(3).await.unwrap(), SyncOutcome::Unchanged);
    assert_eq!(ids(&board), vec![1, 2, 3]);
    assert_eq!(board.get(1).unwrap().status, OrderStatus::Ordered);
}

#[tokio::test]
async fn test_refresh_unknown_order_reloads_all() {
    let api = Arc::new(MockApi::new().with_orders(orders(2)));
    let board = board(&api);
    board.load_all().await.unwrap();

    api.set_orders(orders(4));
    assert_eq!(board.refresh_one(4).await.unwrap(), SyncOutcome::Reloaded(4));
    assert_eq!(ids(&board), vec![1, 2, 3, 4]);
    assert_eq!(Calls::get(&api.calls.orders), 2);
}

#[tokio::test]
async fn test_superseded_load_is_discarded() {
    let api = Arc::new(MockApi::new());
    let board = Arc::new(board(&api));

    let slow_tx = api.hold_orders();
    let b = board.clone();
    let slow = tokio::spawn(async move { b.load_all().await });
    wait_for_calls(&api, 1).await;

    api.set_orders(orders(5));
    assert_eq!(board.load_all().await.unwrap(), SyncOutcome::Loaded(5));

    slow_tx.send(orders(1)).unwrap();
    assert_eq!(slow.await.unwrap().unwrap(), SyncOutcome::Stale);
    assert_eq!(ids(&board), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_refresh_older_than_load_is_discarded() {
    let api = Arc::new(MockApi::new().with_orders(orders(2)));
    let board = Arc::new(board(&api));
    board.load_all().await.unwrap();

    let slow_tx = api.hold_orders();
    let b = board.clone();
    let refresh = tokio::spawn(async move { b.refresh_one(2).await });
    wait_for_calls(&api, 2).await;

    let mut newer = orders(2);
    newer[1].status = OrderStatus::Delivered;
    api.set_orders(newer);
    board.load_all().await.unwrap();

    let mut stale = orders(2);
    stale[1].status = OrderStatus::Preparing;
    slow_tx.send(stale).unwrap();

    assert_eq!(refresh.await.unwrap().unwrap(), SyncOutcome::Stale);
    assert_eq!(board.get(2).unwrap().status, OrderStatus::Delivered);
}

#[tokio::test]
async fn test_refresh_applied_during_load_survives_it() {
    let api = Arc::new(MockApi::new().with_orders(orders(2)));
    let board = Arc::new(board(&api));
    board.load_all().await.unwrap();

    // Load issued first, answered last with an older view of order 2
    let load_tx = api.hold_orders();
    let b = board.clone();
    let load = tokio::spawn(async move { b.load_all().await });
    wait_for_calls(&api, 2).await;

    let mut fresh = orders(2);
    fresh[1].status = OrderStatus::Delivering;
    api.set_orders(fresh);
    assert_eq!(board.refresh_one(2).await.unwrap(), SyncOutcome::Replaced);

    load_tx.send(orders(2)).unwrap();
    assert_eq!(load.await.unwrap().unwrap(), SyncOutcome::Loaded(2));
    assert_eq!(board.get(2).unwrap().status, OrderStatus::Delivering);
    assert_eq!(board.get(1).unwrap().status, OrderStatus::Ordered);
}

#[tokio::test]
async fn test_pagination_over_23_orders() {
    let api = Arc::new(MockApi::new().with_orders(orders(23)));
    let board = board(&api);
    board.load_all().await.unwrap();

    assert_eq!(board.total_pages(), 3);
    assert_eq!(board.current_page(), 1);
    assert_eq!(board.page().len(), 10);

    assert!(board.go_to(3));
    let last: Vec<i64> = board.page().iter().map(|o| o.order_id).collect();
    assert_eq!(last, vec![21, 22, 23]);

    // Out of range is a no-op
    assert!(!board.go_to(4));
    assert!(!board.go_to(0));
    assert!(!board.next());
    assert_eq!(board.current_page(), 3);

    assert!(board.previous());
    assert!(board.previous());
    assert!(!board.previous());
    assert_eq!(board.current_page(), 1);
}

#[tokio::test]
async fn test_current_page_clamped_when_collection_shrinks() {
    let api = Arc::new(MockApi::new().with_orders(orders(23)));
    let board = board(&api);
    board.load_all().await.unwrap();
    assert!(board.go_to(3));

    api.set_orders(orders(12));
    board.load_all().await.unwrap();
    assert_eq!(board.current_page(), 2);
    assert_eq!(board.page().len(), 2);
}

#[tokio::test]
async fn test_status_change_reaches_board_through_bus() {
    let api = Arc::new(MockApi::new().with_orders(orders(3)));
    let bus = NotificationBus::new();
    let board = board(&api);
    let _sub = board.attach(&bus);
    board.load_all().await.unwrap();

    let detail = OrderDetail::new(api.clone(), session(), bus.clone());
    detail.load(2).await.unwrap();
    detail.update_status(OrderStatus::Preparing).await.unwrap();

    assert_eq!(board.pending_notifications(), 1);
    let results = board.process_notifications().await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, 2);
    assert_eq!(*results[0].1.as_ref().unwrap(), SyncOutcome::Replaced);
    assert_eq!(board.get(2).unwrap().status, OrderStatus::Preparing);
    assert_eq!(board.pending_notifications(), 0);
}

#[tokio::test]
async fn test_dropped_subscription_stops_updates() {
    let api = Arc::new(MockApi::new().with_orders(orders(1)));
    let bus = NotificationBus::new();
    let board = board(&api);
    let sub = board.attach(&bus);
    drop(sub);

    bus.publish(1);
    assert_eq!(board.pending_notifications(), 0);
}
