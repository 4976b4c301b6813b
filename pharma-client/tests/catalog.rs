// pharma-client/tests/catalog.rs
// Medicine catalog: paging, filters, trust-gated mutations

mod common;

use common::*;
use pharma_client::{BulkSubmitPolicy, ClientError, ErrorKind, MedicineCatalog};
use shared::ErrorCode;
use shared::models::{MedicineDetail, MedicineUpdate};
use std::sync::Arc;

fn stock() -> Vec<shared::models::Medicine> {
    vec![
        medicine(1, "Zyrtec", 1, 40.0, 5),
        medicine(2, "Paracetamol", 1, 10.0, 100),
        medicine(3, "Paraffin Cream", 0, 25.0, 8),
    ]
}

fn catalog(api: &Arc<MockApi>) -> MedicineCatalog {
    MedicineCatalog::new(api.clone(), session(), 10, BulkSubmitPolicy::Advisory)
}

fn displayed_ids(c: &MedicineCatalog) -> Vec<i64> {
    c.displayed().iter().map(|m| m.medicine_id).collect()
}

#[tokio::test]
async fn test_load_page_applies_filters() {
    let api = Arc::new(MockApi::new().with_medicines(stock()));
    let mut c = catalog(&api);

    assert_eq!(c.load_page(1).await.unwrap(), 3);
    assert_eq!(c.total_count(), 3);
    assert_eq!(displayed_ids(&c), vec![2, 3, 1]);
    assert_eq!(api.state.lock().requested_pages, vec![(1, 10)]);

    c.set_search("para");
    assert_eq!(displayed_ids(&c), vec![2, 3]);
    c.set_drug_filter(Some(1));
    assert_eq!(displayed_ids(&c), vec![2]);
    c.set_search("");
    assert_eq!(displayed_ids(&c), vec![2, 1]);

    // Filters survive a reload
    c.load_page(1).await.unwrap();
    assert_eq!(displayed_ids(&c), vec![2, 1]);
}

#[tokio::test]
async fn test_load_failure_keeps_snapshot() {
    let api = Arc::new(MockApi::new().with_medicines(stock()));
    let mut c = catalog(&api);
    c.load_page(1).await.unwrap();

    api.fail(Endpoint::MedicinePage);
    assert!(c.load_page(2).await.is_err());
    assert_eq!(c.page(), 1);
    assert_eq!(c.all().len(), 3);
}

#[tokio::test]
async fn test_page_navigation_is_clamped() {
    let api = Arc::new(MockApi::new().with_medicines(stock()));
    api.state.lock().total_pages = 2;
    let mut c = catalog(&api);
    c.load_page(1).await.unwrap();

    assert!(!c.prev_page().await.unwrap());
    assert!(c.next_page().await.unwrap());
    assert_eq!(c.page(), 2);
    assert!(!c.next_page().await.unwrap());
    assert_eq!(api.state.lock().requested_pages.len(), 2);
}

#[tokio::test]
async fn test_delete_requires_trust() {
    let api = Arc::new(MockApi::new().with_medicines(stock()));
    api.set_trusted(false);
    let mut c = catalog(&api);
    c.load_page(1).await.unwrap();

    // Never refreshed: untrusted
    let err = c.delete(2).await.unwrap_err();
    assert!(matches!(err, ClientError::NotTrusted));

    assert!(!c.refresh_trust().await);
    let err = c.delete(2).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(Calls::get(&api.calls.delete_medicine), 0);
    assert_eq!(c.total_count(), 3);
}

#[tokio::test]
async fn test_trust_fetch_failure_means_untrusted() {
    let api = Arc::new(MockApi::new().with_medicines(stock()));
    api.fail(Endpoint::Warehouse);
    let mut c = catalog(&api);

    assert!(!c.refresh_trust().await);
    assert!(!c.is_trusted());
}

#[tokio::test]
async fn test_delete_removes_and_decrements() {
    let api = Arc::new(MockApi::new().with_medicines(stock()));
    let mut c = catalog(&api);
    c.load_page(1).await.unwrap();
    assert!(c.refresh_trust().await);

    c.delete(2).await.unwrap();
    assert_eq!(api.state.lock().deleted, vec![2]);
    assert_eq!(c.total_count(), 2);
    assert!(c.all().iter().all(|m| m.medicine_id != 2));
    assert_eq!(displayed_ids(&c), vec![3, 1]);
}

#[tokio::test]
async fn test_delete_failure_keeps_snapshot() {
    let api = Arc::new(MockApi::new().with_medicines(stock()));
    api.fail(Endpoint::DeleteMedicine);
    let mut c = catalog(&api);
    c.load_page(1).await.unwrap();
    c.refresh_trust().await;

    assert!(c.delete(2).await.is_err());
    assert_eq!(c.total_count(), 3);
    assert_eq!(c.all().len(), 3);
    assert_eq!(c.displayed().len(), 3);
}

#[tokio::test]
async fn test_edit_validates_before_sending() {
    let api = Arc::new(MockApi::new().with_medicines(stock()));
    let mut c = catalog(&api);
    c.load_page(1).await.unwrap();
    c.refresh_trust().await;

    let err = c.edit(2, 10_000, 5.0).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::QuantityOutOfRange);
    let err = c.edit(2, -1, 5.0).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::QuantityOutOfRange);
    let err = c.edit(2, 10, 100.5).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DiscountOutOfRange);
    let err = c.edit(2, 10, f64::NAN).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(Calls::get(&api.calls.update_medicine), 0);
}

#[tokio::test]
async fn test_edit_requires_trust() {
    let api = Arc::new(MockApi::new().with_medicines(stock()));
    api.set_trusted(false);
    let mut c = catalog(&api);
    c.refresh_trust().await;

    assert!(matches!(c.edit(2, 10, 5.0).await, Err(ClientError::NotTrusted)));
    assert_eq!(Calls::get(&api.calls.update_medicine), 0);
}

#[tokio::test]
async fn test_edit_patches_local_record() {
    let api = Arc::new(MockApi::new().with_medicines(stock()));
    let mut c = catalog(&api);
    c.load_page(1).await.unwrap();
    c.refresh_trust().await;

    assert_eq!(c.edit(2, 9999, 20.0).await.unwrap(), "updated");
    assert_eq!(
        api.state.lock().medicine_updates,
        vec![(2, MedicineUpdate { quantity: 9999, discount: 20.0 })]
    );
    let m = c.all().iter().find(|m| m.medicine_id == 2).unwrap();
    assert_eq!(m.quantity, 9999);
    assert_eq!(m.discount, 20.0);
    assert!((m.final_price - 8.0).abs() < 1e-9);
    let shown = c.displayed().iter().find(|m| m.medicine_id == 2).unwrap();
    assert!((shown.final_price - 8.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_fetch_detail_discount_fallback() {
    let api = Arc::new(MockApi::new());
    api.state.lock().medicine_detail.insert(
        4,
        MedicineDetail {
            quantity: 12,
            discount: None,
            discount_percentage: Some(7.5),
        },
    );
    let c = catalog(&api);

    let d = c.fetch_detail(4).await.unwrap();
    assert_eq!(d.quantity, 12);
    assert_eq!(d.effective_discount(), 7.5);
    assert_eq!(c.fetch_detail(5).await.unwrap().effective_discount(), 0.0);
}
