//! Order list of the active warehouse
//!
//! Keeps the in-memory order collection, refreshes it wholesale or one
//! order at a time, and pages over it locally.
//!
//! Every fetch takes a ticket from a monotonic counter. A full load is
//! applied only if no newer full load was issued after it; a single-order
//! refresh is applied only if no full load and no newer refresh of the
//! same order was issued after it. Late results are discarded.

use parking_lot::Mutex;
use shared::models::Order;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::api::WarehouseApi;
use crate::bus::{NotificationBus, Subscription};
use crate::{ClientResult, Session};

/// What a sync call did to the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Full load applied, with the new order count
    Loaded(usize),
    /// Single order replaced in place
    Replaced,
    /// Fetch succeeded but the order was not in the response
    Unchanged,
    /// Order was not local; a full load ran instead
    Reloaded(usize),
    /// A newer fetch superseded this one; result discarded
    Stale,
}

/// `[(page-1)*size, page*size)` of `orders`, empty when out of range
pub fn paginate(orders: &[Order], page: usize, page_size: usize) -> &[Order] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= orders.len() {
        return &[];
    }
    let end = (start + page_size).min(orders.len());
    &orders[start..end]
}

/// `ceil(count / page_size)`
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

#[derive(Debug, Default)]
struct BoardState {
    orders: Vec<Order>,
    loading: bool,
    last_error: Option<String>,
    current_page: usize,
    /// Last ticket handed out
    issued: u64,
    /// Ticket of the newest full load issued
    latest_load: u64,
    /// Ticket of the newest refresh issued, per order
    latest_refresh: HashMap<i64, u64>,
    /// Ticket of the newest refresh applied, per order
    applied_refresh: HashMap<i64, u64>,
}

impl BoardState {
    fn next_ticket(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }
}

/// Order list controller
pub struct OrderBoard {
    api: Arc<dyn WarehouseApi>,
    session: Session,
    page_size: usize,
    state: Mutex<BoardState>,
    notify_tx: mpsc::UnboundedSender<i64>,
    notify_rx: Mutex<mpsc::UnboundedReceiver<i64>>,
}

impl OrderBoard {
    pub fn new(api: Arc<dyn WarehouseApi>, session: Session, page_size: usize) -> Self {
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        Self {
            api,
            session,
            page_size: page_size.max(1),
            state: Mutex::new(BoardState {
                current_page: 1,
                ..Default::default()
            }),
            notify_tx,
            notify_rx: Mutex::new(notify_rx),
        }
    }

    // ========== Sync ==========

    /// Replace the collection with the warehouse's full order set
    ///
    /// On failure the collection keeps its previous value, the error is
    /// recorded and returned.
    #[instrument(skip(self), fields(warehouse_id = self.session.warehouse_id()))]
    pub async fn load_all(&self) -> ClientResult<SyncOutcome> {
        let ticket = {
            let mut state = self.state.lock();
            let ticket = state.next_ticket();
            state.latest_load = ticket;
            state.loading = true;
            ticket
        };

        let result = self.api.warehouse_orders(&self.session).await;

        let mut state = self.state.lock();
        if ticket != state.latest_load {
            debug!(ticket, latest = state.latest_load, "Discarding superseded order load");
            return result.map(|_| SyncOutcome::Stale);
        }
        state.loading = false;

        match result {
            Ok(fetched) => {
                let kept = Self::merge_load(&mut state, fetched, ticket);
                let count = state.orders.len();
                let pages = total_pages(count, self.page_size).max(1);
                if state.current_page > pages {
                    state.current_page = pages;
                }
                state.last_error = None;
                info!(count, kept, "Orders loaded");
                Ok(SyncOutcome::Loaded(count))
            }
            Err(e) => {
                warn!(error = %e, "Failed to load orders");
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Install a full load, keeping entries refreshed after it was issued.
    /// Returns how many local entries were kept.
    fn merge_load(state: &mut BoardState, mut fetched: Vec<Order>, ticket: u64) -> usize {
        let mut kept = 0;
        for order in fetched.iter_mut() {
            let newer = state
                .applied_refresh
                .get(&order.order_id)
                .is_some_and(|t| *t > ticket);
            if !newer {
                continue;
            }
            if let Some(local) = state.orders.iter().find(|o| o.order_id == order.order_id) {
                *order = local.clone();
                kept += 1;
            }
        }
        state.orders = fetched;
        state.latest_refresh.retain(|_, t| *t > ticket);
        state.applied_refresh.retain(|_, t| *t > ticket);
        kept
    }

    /// Re-fetch one order and replace it in place
    ///
    /// Falls back to [`OrderBoard::load_all`] when the order is not local.
    #[instrument(skip(self), fields(warehouse_id = self.session.warehouse_id()))]
    pub async fn refresh_one(&self, order_id: i64) -> ClientResult<SyncOutcome> {
        let ticket = {
            let mut state = self.state.lock();
            if !state.orders.iter().any(|o| o.order_id == order_id) {
                None
            } else {
                let ticket = state.next_ticket();
                state.latest_refresh.insert(order_id, ticket);
                Some(ticket)
            }
        };

        let Some(ticket) = ticket else {
            debug!(order_id, "Order not loaded, reloading all");
            return match self.load_all().await? {
                SyncOutcome::Loaded(n) => Ok(SyncOutcome::Reloaded(n)),
                other => Ok(other),
            };
        };

        let fetched = self.api.warehouse_orders(&self.session).await?;
        let Some(fresh) = fetched.into_iter().find(|o| o.order_id == order_id) else {
            debug!(order_id, "Order missing from response");
            return Ok(SyncOutcome::Unchanged);
        };

        let mut state = self.state.lock();
        let superseded = state.latest_load > ticket
            || state.latest_refresh.get(&order_id).is_some_and(|t| *t > ticket);
        if superseded {
            debug!(order_id, ticket, "Discarding superseded order refresh");
            return Ok(SyncOutcome::Stale);
        }

        match state.orders.iter_mut().find(|o| o.order_id == order_id) {
            Some(slot) => {
                *slot = fresh;
                state.applied_refresh.insert(order_id, ticket);
                info!(order_id, "Order refreshed");
                Ok(SyncOutcome::Replaced)
            }
            None => Ok(SyncOutcome::Unchanged),
        }
    }

    // ========== Notifications ==========

    /// Queue bus events for this board; drained by [`OrderBoard::process_notifications`]
    pub fn attach(&self, bus: &NotificationBus) -> Subscription {
        let tx = self.notify_tx.clone();
        bus.subscribe(move |event| {
            if tx.send(event.order_id).is_err() {
                debug!(order_id = event.order_id, "Order board gone, dropping update");
            }
            Ok(())
        })
    }

    /// Number of queued, unprocessed notifications
    pub fn pending_notifications(&self) -> usize {
        self.notify_rx.lock().len()
    }

    /// Refresh every order named by queued notifications, in arrival order
    pub async fn process_notifications(&self) -> Vec<(i64, ClientResult<SyncOutcome>)> {
        let ids: Vec<i64> = {
            let mut rx = self.notify_rx.lock();
            std::iter::from_fn(|| rx.try_recv().ok()).collect()
        };

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let outcome = self.refresh_one(id).await;
            if let Err(e) = &outcome {
                warn!(order_id = id, error = %e, "Notification refresh failed");
            }
            results.push((id, outcome));
        }
        results
    }

    // ========== Pagination ==========

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.state.lock().current_page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.state.lock().orders.len(), self.page_size)
    }

    /// Orders on the current page
    pub fn page(&self) -> Vec<Order> {
        let state = self.state.lock();
        paginate(&state.orders, state.current_page, self.page_size).to_vec()
    }

    /// Jump to `page`; out-of-range pages leave the current page unchanged
    pub fn go_to(&self, page: usize) -> bool {
        let mut state = self.state.lock();
        let pages = total_pages(state.orders.len(), self.page_size);
        if page < 1 || page > pages {
            return false;
        }
        state.current_page = page;
        true
    }

    pub fn next(&self) -> bool {
        let page = self.current_page();
        self.go_to(page + 1)
    }

    pub fn previous(&self) -> bool {
        let page = self.current_page();
        page > 1 && self.go_to(page - 1)
    }

    // ========== Accessors ==========

    pub fn orders(&self) -> Vec<Order> {
        self.state.lock().orders.clone()
    }

    pub fn get(&self, order_id: i64) -> Option<Order> {
        self.state
            .lock()
            .orders
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
