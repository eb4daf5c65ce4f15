//! Internal event system for asynchronous side effects
//!
//! Services publish domain events after a transaction commits. Consumers
//! (the notification worker, tests) subscribe to the bus. Publishing is
//! fire-and-forget: it never blocks and never fails a request.
//!
//! ```text
//! CartService / OrderService / InvoiceService ──▶ EventBus::publish()
//!                                                        │
//!                                    broadcast channel ──┴──▶ notification worker
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Domain events emitted by the ordering services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OrderEvent {
    OrderPlaced {
        order_id: Uuid,
        organization_id: Uuid,
        order_number: String,
        kind: String,
        grand_total: f64,
        delivery_date: NaiveDate,
    },
    OrderStatusChanged {
        order_id: Uuid,
        organization_id: Uuid,
        from: String,
        to: String,
    },
    ItemsReturned {
        order_id: Uuid,
        organization_id: Uuid,
        amount: f64,
    },
    StockAdjusted {
        stock_id: Uuid,
        delta: i64,
        orderable_quantity: u32,
        reason: String,
    },
    InvoiceGroupCreated {
        invoice_group_id: Uuid,
        organization_id: Uuid,
        total_amount: f64,
    },
    InvoiceSettled {
        invoice_group_id: Uuid,
        organization_id: Uuid,
        amount: f64,
        due_amount: f64,
    },
}

impl OrderEvent {
    /// Event name as serialized
    pub fn name(&self) -> &'static str {
        match self {
            OrderEvent::OrderPlaced { .. } => "order_placed",
            OrderEvent::OrderStatusChanged { .. } => "order_status_changed",
            OrderEvent::ItemsReturned { .. } => "items_returned",
            OrderEvent::StockAdjusted { .. } => "stock_adjusted",
            OrderEvent::InvoiceGroupCreated { .. } => "invoice_group_created",
            OrderEvent::InvoiceSettled { .. } => "invoice_settled",
        }
    }

    /// Customer organization the event concerns, if any
    pub fn organization_id(&self) -> Option<Uuid> {
        match self {
            OrderEvent::OrderPlaced {
                organization_id, ..
            }
            | OrderEvent::OrderStatusChanged {
                organization_id, ..
            }
            | OrderEvent::ItemsReturned {
                organization_id, ..
            }
            | OrderEvent::InvoiceGroupCreated {
                organization_id, ..
            }
            | OrderEvent::InvoiceSettled {
                organization_id, ..
            } => Some(*organization_id),
            OrderEvent::StockAdjusted { .. } => None,
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: OrderEvent,
}

impl EventEnvelope {
    pub fn new(event: OrderEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; all clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per slow receiver
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of receivers that will see it (0 when nobody listens).
    pub fn publish(&self, event: OrderEvent) -> usize {
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// Consume events until the bus closes, logging the notification each one triggers
///
/// Stands in for the SMS / chat dispatch jobs, which are external.
pub async fn run_notification_worker(mut rx: broadcast::Receiver<EventEnvelope>) {
    loop {
        match rx.recv().await {
            Ok(envelope) => {
                tracing::info!(
                    event_id = %envelope.id,
                    event = envelope.event.name(),
                    organization_id = ?envelope.event.organization_id(),
                    "dispatching notification"
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notification worker lagged behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed() -> OrderEvent {
        OrderEvent::OrderPlaced {
            order_id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            order_number: "ORD-000001".to_string(),
            kind: "regular".to_string(),
            grand_total: 120.5,
            delivery_date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
        }
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_value(placed()).unwrap();
        assert_eq!(json["event"], "order_placed");
        assert_eq!(json["order_number"], "ORD-000001");
    }

    #[test]
    fn test_stock_events_have_no_organization() {
        let event = OrderEvent::StockAdjusted {
            stock_id: Uuid::new_v4(),
            delta: -3,
            orderable_quantity: 7,
            reason: "damaged".to_string(),
        };
        assert_eq!(event.organization_id(), None);
        assert_eq!(event.name(), "stock_adjusted");
    }

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let event = placed();
        assert_eq!(bus.publish(event.clone()), 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event, event);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(placed()), 0);
    }

    #[tokio::test]
    async fn test_worker_stops_when_bus_dropped() {
        let bus = EventBus::new(4);
        let worker = tokio::spawn(run_notification_worker(bus.subscribe()));
        bus.publish(placed());
        drop(bus);
        worker.await.unwrap();
    }
}
