// pharma-client/tests/common/mod.rs
// In-memory WarehouseApi for controller tests

#![allow(dead_code)]

use async_trait::async_trait;
use http::StatusCode;
use parking_lot::Mutex;
use pharma_client::{ClientError, ClientResult, Session, WarehouseApi};
use rust_decimal::Decimal;
use shared::client::{LoginResponse, WarehouseRef};
use shared::models::{
    BulkUpdateItem, InvoiceItem, Medicine, MedicineDetail, MedicineInfo, MedicinePage,
    MedicineUpdate, Order, Warehouse,
};
use shared::order::OrderStatus;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

pub const WAREHOUSE_ID: i64 = 7;
pub const PASSWORD: &str = "secret";

pub fn session() -> Session {
    Session::new("test-token", WAREHOUSE_ID)
}

pub fn order(id: i64, status: OrderStatus) -> Order {
    Order {
        order_id: id,
        total_price: 100.0 + id as f64,
        quantity: 2,
        status,
        pharmacy_id: 3,
        pharmacy_name: format!("Pharmacy {id}"),
        order_date: Some("2025-05-01T09:30:00".to_string()),
        medicines: Vec::new(),
    }
}

pub fn orders(n: i64) -> Vec<Order> {
    (1..=n).map(|id| order(id, OrderStatus::Ordered)).collect()
}

pub fn medicine(id: i64, name: &str, drug: i32, price: f64, quantity: i64) -> Medicine {
    Medicine {
        medicine_id: id,
        english_medicine_name: Some(name.to_string()),
        arabic_medicine_name: None,
        drug,
        price,
        quantity,
        discount: 0.0,
        final_price: price,
        extra: Default::default(),
    }
}

pub fn invoice_item(name: &str, before: i64, discount: i64) -> InvoiceItem {
    InvoiceItem {
        medicine_name: name.to_string(),
        arabic_medicine_name: format!("{name}-ar"),
        medicine_image: None,
        medicine_price: Decimal::from(before),
        quantity: 1,
        total_before_discount: Decimal::from(before),
        total_after_discount: Decimal::from(before - discount),
        discount_amount: Decimal::from(discount),
        discount_percentage: Decimal::ZERO,
        pharmacy_name: "Cure".to_string(),
        warehouse_name: "Nile".to_string(),
        pharmacy_number: "0100".to_string(),
        pharmacy_address: "Cairo".to_string(),
    }
}

pub fn server_error() -> ClientError {
    ClientError::Api {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "boom".to_string(),
    }
}

/// Endpoints that can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Warehouse,
    Orders,
    StatusUpdate,
    Invoice,
    MedicinePage,
    MedicineDetail,
    UpdateMedicine,
    DeleteMedicine,
    BulkUpdate,
}

#[derive(Debug, Default)]
pub struct Calls {
    pub login: AtomicUsize,
    pub warehouse: AtomicUsize,
    pub orders: AtomicUsize,
    pub status_update: AtomicUsize,
    pub invoice: AtomicUsize,
    pub medicine_page: AtomicUsize,
    pub medicine_info: AtomicUsize,
    pub medicine_detail: AtomicUsize,
    pub update_medicine: AtomicUsize,
    pub delete_medicine: AtomicUsize,
    pub bulk_update: AtomicUsize,
}

impl Calls {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    pub warehouse: Warehouse,
    pub orders: Vec<Order>,
    pub invoice: Vec<InvoiceItem>,
    pub medicines: Vec<Medicine>,
    pub total_pages: u32,
    pub total_count: u64,
    pub medicine_info: HashMap<i64, MedicineInfo>,
    pub medicine_detail: HashMap<i64, MedicineDetail>,
    pub failing: HashSet<Endpoint>,

    // Recorded requests
    pub status_updates: Vec<(i64, OrderStatus)>,
    pub medicine_updates: Vec<(i64, MedicineUpdate)>,
    pub deleted: Vec<i64>,
    pub bulk_bodies: Vec<Vec<BulkUpdateItem>>,
    pub requested_pages: Vec<(u32, usize)>,
}

/// Scripted [`WarehouseApi`]
#[derive(Default)]
pub struct MockApi {
    pub state: Mutex<MockState>,
    pub calls: Calls,
    /// Queued responses for order list calls; each call takes the next
    /// receiver, if any, and waits for the test to send its result
    order_gates: Mutex<VecDeque<oneshot::Receiver<Vec<Order>>>>,
    /// Held status updates; the call waits until the sender fires or drops
    status_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl MockApi {
    pub fn new() -> Self {
        let api = Self::default();
        {
            let mut s = api.state.lock();
            s.warehouse = Warehouse {
                id: WAREHOUSE_ID,
                name: "Nile".to_string(),
                is_trusted: true,
                ..Default::default()
            };
            s.total_pages = 1;
        }
        api
    }

    pub fn with_orders(self, orders: Vec<Order>) -> Self {
        self.set_orders(orders);
        self
    }

    pub fn with_medicines(self, medicines: Vec<Medicine>) -> Self {
        {
            let mut s = self.state.lock();
            s.total_count = medicines.len() as u64;
            s.medicines = medicines;
        }
        self
    }

    pub fn set_orders(&self, orders: Vec<Order>) {
        self.state.lock().orders = orders;
    }

    pub fn set_trusted(&self, trusted: bool) {
        self.state.lock().warehouse.is_trusted = trusted;
    }

    pub fn set_info(&self, id: i64, price: f64, drug: i32) {
        self.state
            .lock()
            .medicine_info
            .insert(id, MedicineInfo { price, drug });
    }

    pub fn fail(&self, endpoint: Endpoint) {
        self.state.lock().failing.insert(endpoint);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.state.lock().failing.remove(&endpoint);
    }

    /// Make the next order list call wait for a response sent by the test
    pub fn hold_orders(&self) -> oneshot::Sender<Vec<Order>> {
        let (tx, rx) = oneshot::channel();
        self.order_gates.lock().push_back(rx);
        tx
    }

    /// Make the next status update wait until the returned sender fires
    pub fn hold_status_update(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.status_gate.lock() = Some(rx);
        tx
    }

    fn check(&self, endpoint: Endpoint) -> ClientResult<()> {
        if self.state.lock().failing.contains(&endpoint) {
            Err(server_error())
        } else {
            Ok(())
        }
    }

    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl WarehouseApi for MockApi {
    async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        Self::bump(&self.calls.login);
        if password != PASSWORD {
            return Err(ClientError::InvalidCredentials);
        }
        Ok(LoginResponse {
            token: format!("token-for-{email}"),
            warehouse: WarehouseRef {
                id: WAREHOUSE_ID,
                name: Some("Nile".to_string()),
            },
        })
    }

    async fn warehouse(&self, _session: &Session) -> ClientResult<Warehouse> {
        Self::bump(&self.calls.warehouse);
        self.check(Endpoint::Warehouse)?;
        Ok(self.state.lock().warehouse.clone())
    }

    async fn warehouse_orders(&self, _session: &Session) -> ClientResult<Vec<Order>> {
        Self::bump(&self.calls.orders);
        let gate = self.order_gates.lock().pop_front();
        if let Some(rx) = gate {
            return rx.await.map_err(|_| server_error());
        }
        self.check(Endpoint::Orders)?;
        Ok(self.state.lock().orders.clone())
    }

    async fn update_order_status(
        &self,
        _session: &Session,
        order_id: i64,
        status: OrderStatus,
    ) -> ClientResult<()> {
        Self::bump(&self.calls.status_update);
        let gate = self.status_gate.lock().take();
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        self.check(Endpoint::StatusUpdate)?;
        let mut s = self.state.lock();
        s.status_updates.push((order_id, status));
        if let Some(o) = s.orders.iter_mut().find(|o| o.order_id == order_id) {
            o.status = status;
        }
        Ok(())
    }

    async fn invoice_items(&self, _session: &Session, _order_id: i64) -> ClientResult<Vec<InvoiceItem>> {
        Self::bump(&self.calls.invoice);
        self.check(Endpoint::Invoice)?;
        Ok(self.state.lock().invoice.clone())
    }

    async fn medicine_page(
        &self,
        _session: &Session,
        page: u32,
        page_size: usize,
    ) -> ClientResult<MedicinePage> {
        Self::bump(&self.calls.medicine_page);
        self.check(Endpoint::MedicinePage)?;
        let mut s = self.state.lock();
        s.requested_pages.push((page, page_size));
        Ok(MedicinePage {
            items: s.medicines.clone(),
            total_pages: s.total_pages,
            total_count: s.total_count,
        })
    }

    async fn medicine_info(&self, _session: &Session, medicine_id: i64) -> ClientResult<MedicineInfo> {
        Self::bump(&self.calls.medicine_info);
        self.state
            .lock()
            .medicine_info
            .get(&medicine_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("medicine {medicine_id}")))
    }

    async fn medicine_detail(
        &self,
        _session: &Session,
        medicine_id: i64,
    ) -> ClientResult<MedicineDetail> {
        Self::bump(&self.calls.medicine_detail);
        self.check(Endpoint::MedicineDetail)?;
        Ok(self
            .state
            .lock()
            .medicine_detail
            .get(&medicine_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_medicine(
        &self,
        _session: &Session,
        medicine_id: i64,
        update: MedicineUpdate,
    ) -> ClientResult<String> {
        Self::bump(&self.calls.update_medicine);
        self.check(Endpoint::UpdateMedicine)?;
        self.state.lock().medicine_updates.push((medicine_id, update));
        Ok("updated".to_string())
    }

    async fn delete_medicine(&self, _session: &Session, medicine_id: i64) -> ClientResult<()> {
        Self::bump(&self.calls.delete_medicine);
        self.check(Endpoint::DeleteMedicine)?;
        self.state.lock().deleted.push(medicine_id);
        Ok(())
    }

    async fn bulk_update_medicines(
        &self,
        _session: &Session,
        items: &[BulkUpdateItem],
    ) -> ClientResult<()> {
        Self::bump(&self.calls.bulk_update);
        self.state.lock().bulk_bodies.push(items.to_vec());
        self.check(Endpoint::BulkUpdate)
    }
}
