//! Warehouse REST API
//!
//! [`WarehouseApi`] is the seam between the controllers and the remote
//! service: one method per endpoint, every privileged call taking the
//! [`Session`] it acts for.

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;
use shared::client::{LoginErrorBody, LoginRequest, LoginResponse};
use shared::models::{
    BulkUpdateItem, InvoiceItem, InvoiceResponse, MedicineDetail, MedicineInfo, MedicinePage,
    MedicineUpdate, Order, Warehouse,
};
use shared::order::OrderStatus;
use shared::response::ListEnvelope;
use shared::AppError;

use crate::http::{HttpClient, NetworkHttpClient};
use crate::{ClientConfig, ClientError, ClientResult, Session};

/// Remote operations used by the dashboard
#[async_trait]
pub trait WarehouseApi: Send + Sync {
    /// `POST /Warehouse/login`
    async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse>;

    /// `GET /Warehouse/Getbyid/{warehouseId}`
    async fn warehouse(&self, session: &Session) -> ClientResult<Warehouse>;

    /// `GET /Order/warehouse/{warehouseId}`
    async fn warehouse_orders(&self, session: &Session) -> ClientResult<Vec<Order>>;

    /// `PUT /Order/update-status/{orderId}?newStatus={code}`
    async fn update_order_status(
        &self,
        session: &Session,
        order_id: i64,
        status: OrderStatus,
    ) -> ClientResult<()>;

    /// `GET /Order/getAllOrderDetailsForAdminDashboard/{orderId}`
    async fn invoice_items(&self, session: &Session, order_id: i64)
    -> ClientResult<Vec<InvoiceItem>>;

    /// `GET /Warehouse/GetWarehousMedicines/{warehouseId}/medicines?page&pageSize`
    async fn medicine_page(
        &self,
        session: &Session,
        page: u32,
        page_size: usize,
    ) -> ClientResult<MedicinePage>;

    /// `GET /Warehouse/GetMedicine/{id}`
    async fn medicine_info(&self, session: &Session, medicine_id: i64)
    -> ClientResult<MedicineInfo>;

    /// `GET /WarehouseMedicine/GetMedicineById?medicineId&warehouseId`
    async fn medicine_detail(
        &self,
        session: &Session,
        medicine_id: i64,
    ) -> ClientResult<MedicineDetail>;

    /// `PUT /WarehouseMedicine/UpdateMedicine/{id}?warehouseId`
    async fn update_medicine(
        &self,
        session: &Session,
        medicine_id: i64,
        update: MedicineUpdate,
    ) -> ClientResult<String>;

    /// `DELETE /WarehouseMedicine/DeleteMedicine/{id}?warehouseId`
    async fn delete_medicine(&self, session: &Session, medicine_id: i64) -> ClientResult<()>;

    /// `POST /Warehouse/UpdateWarehouseMedicines/{warehouseId}`
    async fn bulk_update_medicines(
        &self,
        session: &Session,
        items: &[BulkUpdateItem],
    ) -> ClientResult<()>;
}

/// [`WarehouseApi`] over an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct PharmaApi<H> {
    http: H,
}

impl PharmaApi<NetworkHttpClient> {
    /// Network client built from configuration
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(NetworkHttpClient::new(config)?))
    }
}

impl<H: HttpClient> PharmaApi<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &H {
        &self.http
    }
}

/// Decode a JSON value, reporting shape mismatches as invalid responses
fn decode<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> ClientResult<T> {
    serde_json::from_value(value)
        .map_err(|e| ClientError::InvalidResponse(format!("{what}: {e}")))
}

#[async_trait]
impl<H: HttpClient + 'static> WarehouseApi for PharmaApi<H> {
    async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.http.post::<Value, _>("Warehouse/login", &req, None).await {
            Ok(value) => decode(value, "login response"),
            Err(ClientError::Unauthorized) => Err(ClientError::InvalidCredentials),
            Err(ClientError::Api { status, body }) if status == StatusCode::BAD_REQUEST => {
                let message = serde_json::from_str::<LoginErrorBody>(&body)
                    .ok()
                    .and_then(|b| b.message)
                    .unwrap_or_else(|| "invalid login data".to_string());
                Err(AppError::validation(message).into())
            }
            Err(e) => Err(e),
        }
    }

    async fn warehouse(&self, session: &Session) -> ClientResult<Warehouse> {
        let path = format!("Warehouse/Getbyid/{}", session.warehouse_id());
        let value: Value = self.http.get(&path, session.token()).await?;
        decode(value, "warehouse")
    }

    async fn warehouse_orders(&self, session: &Session) -> ClientResult<Vec<Order>> {
        let path = format!("Order/warehouse/{}", session.warehouse_id());
        let value: Value = self.http.get(&path, session.token()).await?;
        decode::<ListEnvelope<Order>>(value, "order list").map(ListEnvelope::into_vec)
    }

    async fn update_order_status(
        &self,
        session: &Session,
        order_id: i64,
        status: OrderStatus,
    ) -> ClientResult<()> {
        let path = format!("Order/update-status/{order_id}?newStatus={}", status.code());
        self.http.put_empty(&path, session.token()).await
    }

    async fn invoice_items(
        &self,
        session: &Session,
        order_id: i64,
    ) -> ClientResult<Vec<InvoiceItem>> {
        let path = format!("Order/getAllOrderDetailsForAdminDashboard/{order_id}");
        let value: Value = self.http.get(&path, session.token()).await?;
        decode::<InvoiceResponse>(value, "invoice").map(|r| r.result)
    }

    async fn medicine_page(
        &self,
        session: &Session,
        page: u32,
        page_size: usize,
    ) -> ClientResult<MedicinePage> {
        let path = format!(
            "Warehouse/GetWarehousMedicines/{}/medicines?page={page}&pageSize={page_size}",
            session.warehouse_id()
        );
        let value: Value = self.http.get(&path, session.token()).await?;
        decode(value, "medicine page")
    }

    async fn medicine_info(
        &self,
        session: &Session,
        medicine_id: i64,
    ) -> ClientResult<MedicineInfo> {
        let path = format!("Warehouse/GetMedicine/{medicine_id}");
        let value: Value = self.http.get(&path, session.token()).await?;
        decode(value, "medicine")
    }

    async fn medicine_detail(
        &self,
        session: &Session,
        medicine_id: i64,
    ) -> ClientResult<MedicineDetail> {
        let path = format!(
            "WarehouseMedicine/GetMedicineById?medicineId={medicine_id}&warehouseId={}",
            session.warehouse_id()
        );
        let value: Value = self.http.get(&path, session.token()).await?;
        decode(value, "medicine detail")
    }

    async fn update_medicine(
        &self,
        session: &Session,
        medicine_id: i64,
        update: MedicineUpdate,
    ) -> ClientResult<String> {
        let path = format!(
            "WarehouseMedicine/UpdateMedicine/{medicine_id}?warehouseId={}",
            session.warehouse_id()
        );
        self.http.put_text(&path, &update, session.token()).await
    }

    async fn delete_medicine(&self, session: &Session, medicine_id: i64) -> ClientResult<()> {
        let path = format!(
            "WarehouseMedicine/DeleteMedicine/{medicine_id}?warehouseId={}",
            session.warehouse_id()
        );
        self.http.delete(&path, session.token()).await
    }

    async fn bulk_update_medicines(
        &self,
        session: &Session,
        items: &[BulkUpdateItem],
    ) -> ClientResult<()> {
        let path = format!(
            "Warehouse/UpdateWarehouseMedicines/{}",
            session.warehouse_id()
        );
        self.http.post_unit(&path, &items, session.token()).await
    }
}
