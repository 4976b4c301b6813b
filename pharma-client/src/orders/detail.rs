//! Single order view
//!
//! Loads one order, advances its status through the state machine and
//! announces successful changes on the notification bus.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use parking_lot::Mutex;
use shared::models::Order;
use shared::order::OrderStatus;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument, warn};

use crate::api::WarehouseApi;
use crate::bus::NotificationBus;
use crate::invoice::Invoice;
use crate::{ClientError, ClientResult, Session};

/// Display form of an order date
///
/// Accepts RFC 3339 or the API's offset-less `YYYY-MM-DDTHH:MM:SS[.f]`.
pub fn format_order_date(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return "تاريخ غير متوفر".to_string();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%Y-%m-%d").to_string();
    }
    "تاريخ غير صحيح".to_string()
}

/// Clears the in-flight flag when an update finishes, however it ends
struct UpdateGuard<'a>(&'a AtomicBool);

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Order detail controller
pub struct OrderDetail {
    api: Arc<dyn WarehouseApi>,
    session: Session,
    bus: NotificationBus,
    order: Mutex<Option<Order>>,
    updating: AtomicBool,
}

impl OrderDetail {
    pub fn new(api: Arc<dyn WarehouseApi>, session: Session, bus: NotificationBus) -> Self {
        Self {
            api,
            session,
            bus,
            order: Mutex::new(None),
            updating: AtomicBool::new(false),
        }
    }

    /// Fetch the warehouse's orders and select `order_id`
    #[instrument(skip(self), fields(warehouse_id = self.session.warehouse_id()))]
    pub async fn load(&self, order_id: i64) -> ClientResult<Order> {
        let orders = self.api.warehouse_orders(&self.session).await?;
        let mut order = orders
            .into_iter()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| ClientError::NotFound(format!("order {order_id}")))?;

        if order.order_date.is_none() {
            order.order_date = Some(Utc::now().to_rfc3339());
        }

        *self.order.lock() = Some(order.clone());
        info!(order_id, status = %order.status, "Order loaded");
        Ok(order)
    }

    pub fn order(&self) -> Option<Order> {
        self.order.lock().clone()
    }

    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::Acquire)
    }

    /// Statuses the loaded order may move to
    pub fn allowed_transitions(&self) -> Vec<OrderStatus> {
        self.order
            .lock()
            .as_ref()
            .map(|o| o.status.allowed_transitions())
            .unwrap_or_default()
    }

    /// Move the loaded order to `new_status`
    ///
    /// The transition is validated before any request. On success the
    /// change is published and the local record updated if it still holds
    /// the same order; on failure the record is left as it was.
    #[instrument(skip(self), fields(warehouse_id = self.session.warehouse_id()))]
    pub async fn update_status(&self, new_status: OrderStatus) -> ClientResult<Order> {
        let mut updated = self
            .order
            .lock()
            .clone()
            .ok_or_else(|| ClientError::NotFound("no order loaded".into()))?;
        let (order_id, current) = (updated.order_id, updated.status);

        if self
            .updating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ClientError::Busy(format!("order {order_id}")));
        }
        let _guard = UpdateGuard(&self.updating);

        current.check_transition(new_status)?;

        if let Err(e) = self
            .api
            .update_order_status(&self.session, order_id, new_status)
            .await
        {
            warn!(order_id, from = %current, to = %new_status, error = %e, "Status update failed");
            return Err(ClientError::UpdateFailed(Box::new(e)));
        }

        updated.status = new_status;
        match self.order.lock().as_mut() {
            Some(order) if order.order_id == order_id => order.status = new_status,
            _ => info!(order_id, "Selection changed during update, local record left as is"),
        }

        info!(order_id, from = %current, to = %new_status, "Order status updated");
        self.bus.publish(order_id);
        Ok(updated)
    }

    /// Fetch the invoice lines of the loaded order and compose the invoice
    #[instrument(skip(self), fields(warehouse_id = self.session.warehouse_id()))]
    pub async fn load_invoice(&self) -> ClientResult<Invoice> {
        let (order_id, order_date) = {
            let order = self.order.lock();
            let order = order
                .as_ref()
                .ok_or_else(|| ClientError::NotFound("no order loaded".into()))?;
            (order.order_id, order.order_date.clone())
        };
        let items = self.api.invoice_items(&self.session, order_id).await?;
        Invoice::compose(order_id, order_date.as_deref(), items)
    }
}
