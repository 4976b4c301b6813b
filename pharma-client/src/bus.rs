//! Order notification bus
//!
//! # Architecture
//!
//! ```text
//! OrderDetail ──▶ publish(order_id) ──▶ snapshot of handlers (id order)
//!                                          │
//!                      ┌───────────────────┼───────────────────┐
//!                      ▼                   ▼                   ▼
//!                  handler #1          handler #2          handler #3
//!                 (OrderBoard)        (other view)          (...)
//! ```
//!
//! Delivery is synchronous and in subscription order. A handler that
//! returns an error or panics is logged and skipped; the remaining
//! handlers still run. Events are not buffered: a handler subscribed after
//! a publish never sees it.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, error};
use uuid::Uuid;

use crate::ClientResult;

/// "Order X changed"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderUpdated {
    pub order_id: i64,
    /// Unique per publish, for log correlation
    pub event_id: Uuid,
}

impl OrderUpdated {
    pub fn new(order_id: i64) -> Self {
        Self {
            order_id,
            event_id: Uuid::new_v4(),
        }
    }
}

type Handler = Arc<dyn Fn(&OrderUpdated) -> ClientResult<()> + Send + Sync>;

/// Subscriber id, increasing in subscription order
pub type SubscriberId = u64;

struct Inner {
    next_id: AtomicU64,
    handlers: RwLock<BTreeMap<SubscriberId, Handler>>,
}

/// Outcome of one publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    pub delivered: usize,
    pub failed: usize,
}

/// Process-local publish/subscribe channel for order changes
#[derive(Clone)]
pub struct NotificationBus {
    inner: Arc<Inner>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(1),
                handlers: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    /// Register a handler; it stays active until the returned guard drops
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&OrderUpdated) -> ClientResult<()> + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.handlers.write().insert(id, Arc::new(handler));
        debug!(subscriber = id, "Subscribed to order updates");
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Remove a handler by id; returns whether it was registered
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.inner.handlers.write().remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers.read().len()
    }

    /// Deliver `order_id` to every current subscriber
    pub fn publish(&self, order_id: i64) -> Delivery {
        let event = OrderUpdated::new(order_id);
        // Handlers may subscribe or unsubscribe while running
        let handlers: Vec<(SubscriberId, Handler)> = self
            .inner
            .handlers
            .read()
            .iter()
            .map(|(id, h)| (*id, Arc::clone(h)))
            .collect();

        let mut delivery = Delivery::default();
        for (id, handler) in handlers {
            if !self.inner.handlers.read().contains_key(&id) {
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(Ok(())) => delivery.delivered += 1,
                Ok(Err(e)) => {
                    delivery.failed += 1;
                    error!(subscriber = id, order_id, event_id = %event.event_id, error = %e, "Order update handler failed");
                }
                Err(_) => {
                    delivery.failed += 1;
                    error!(subscriber = id, order_id, event_id = %event.event_id, "Order update handler panicked");
                }
            }
        }
        debug!(order_id, delivered = delivery.delivered, failed = delivery.failed, "Published order update");
        delivery
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Active subscription; unsubscribes on drop
#[derive(Debug)]
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: SubscriberId,
    bus: Weak<Inner>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            inner.handlers.write().remove(&self.id);
            debug!(subscriber = self.id, "Unsubscribed from order updates");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use parking_lot::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<(u8, i64)>>>, impl Fn(u8) -> Box<dyn Fn(&OrderUpdated) -> ClientResult<()> + Send + Sync>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = Arc::clone(&log);
        let make = move |tag: u8| {
            let l = Arc::clone(&l);
            Box::new(move |e: &OrderUpdated| {
                l.lock().push((tag, e.order_id));
                Ok(())
            }) as Box<dyn Fn(&OrderUpdated) -> ClientResult<()> + Send + Sync>
        };
        (log, make)
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let bus = NotificationBus::new();
        let (log, make) = recorder();
        let _a = bus.subscribe(make(1));
        let _b = bus.subscribe(make(2));
        let _c = bus.subscribe(make(3));

        let d = bus.publish(9);
        assert_eq!(d, Delivery { delivered: 3, failed: 0 });
        assert_eq!(*log.lock(), vec![(1, 9), (2, 9), (3, 9)]);
    }

    #[test]
    fn test_no_buffering() {
        let bus = NotificationBus::new();
        bus.publish(1);

        let (log, make) = recorder();
        let _s = bus.subscribe(make(1));
        assert!(log.lock().is_empty());

        bus.publish(2);
        assert_eq!(*log.lock(), vec![(1, 2)]);
    }

    #[test]
    fn test_failing_handler_is_isolated() {
        let bus = NotificationBus::new();
        let (log, make) = recorder();
        let _a = bus.subscribe(|_| Err(ClientError::Busy("test".into())));
        let _b = bus.subscribe(|_| panic!("handler bug"));
        let _c = bus.subscribe(make(3));

        let d = bus.publish(4);
        assert_eq!(d, Delivery { delivered: 1, failed: 2 });
        assert_eq!(*log.lock(), vec![(3, 4)]);

        // Bus stays usable after a panic
        let d = bus.publish(5);
        assert_eq!(d.delivered, 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = NotificationBus::new();
        let (log, make) = recorder();
        let sub = bus.subscribe(make(1));
        assert_eq!(bus.subscriber_count(), 1);

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(1);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_unsubscribe_by_id() {
        let bus = NotificationBus::new();
        let sub = bus.subscribe(|_| Ok(()));
        assert!(bus.unsubscribe(sub.id()));
        assert!(!bus.unsubscribe(sub.id()));
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_bus() {
        let bus = NotificationBus::new();
        let sub = bus.subscribe(|_| Ok(()));
        drop(bus);
        drop(sub);
    }

    #[test]
    fn test_handler_may_subscribe_during_publish() {
        let bus = NotificationBus::new();
        let inner_bus = bus.clone();
        let held = Arc::new(Mutex::new(Vec::new()));
        let h = Arc::clone(&held);
        let _s = bus.subscribe(move |_| {
            h.lock().push(inner_bus.subscribe(|_| Ok(())));
            Ok(())
        });

        assert_eq!(bus.publish(1).delivered, 1);
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_handler_removed_mid_publish_is_skipped() {
        let bus = NotificationBus::new();
        let (log, make) = recorder();
        let target = Arc::new(Mutex::new(None::<SubscriberId>));
        let t = Arc::clone(&target);
        let inner_bus = bus.clone();
        let _a = bus.subscribe(move |_| {
            if let Some(id) = t.lock().take() {
                inner_bus.unsubscribe(id);
            }
            Ok(())
        });
        let b = bus.subscribe(make(2));
        let _c = bus.subscribe(make(3));
        *target.lock() = Some(b.id());

        let d = bus.publish(7);
        assert_eq!(d, Delivery { delivered: 2, failed: 0 });
        assert_eq!(*log.lock(), vec![(3, 7)]);
    }
}
