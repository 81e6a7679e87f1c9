//! Domain events
//!
//! Events are published to NATS after the transaction that produced them has
//! committed. Without a NATS connection they are dropped.
use serde::Serialize;
use crate::domain::aggregates::{AlertType, MovementType, OrderStatus};

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    OrderPlaced { order_id: i64, total_amount: i64, item_count: usize },
    OrderStatusChanged { order_id: i64, from: OrderStatus, to: OrderStatus },
    StockAdjusted { product_id: i64, movement_type: MovementType, quantity: i32, new_quantity: i32, reference_id: Option<String> },
    StockAlertRaised { product_id: i64, alert_type: AlertType, quantity: i32 },
    StockAlertResolved { product_id: i64, alert_id: i64, quantity: i32 },
}

impl DomainEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::OrderPlaced { .. } => "visage.orders.placed",
            Self::OrderStatusChanged { .. } => "visage.orders.status_changed",
            Self::StockAdjusted { .. } => "visage.stock.adjusted",
            Self::StockAlertRaised { .. } => "visage.stock.alert_raised",
            Self::StockAlertResolved { .. } => "visage.stock.alert_resolved",
        }
    }
}

#[derive(Clone, Default)]
pub struct EventPublisher { nats: Option<async_nats::Client> }

impl EventPublisher {
    pub fn new(nats: Option<async_nats::Client>) -> Self { Self { nats } }
    pub fn disabled() -> Self { Self { nats: None } }

    pub async fn publish(&self, event: &DomainEvent) {
        let Some(client) = &self.nats else {
            tracing::debug!(subject = event.subject(), "NATS not configured, dropping event");
            return;
        };
        let payload = match serde_json::to_vec(event) {
            Ok(bytes) => bytes,
            Err(e) => { tracing::warn!(error = %e, "failed to serialize domain event"); return; }
        };
        if let Err(e) = client.publish(event.subject().to_string(), payload.into()).await {
            tracing::warn!(subject = event.subject(), error = %e, "failed to publish domain event");
        }
    }

    pub async fn publish_all(&self, events: &[DomainEvent]) {
        for event in events { self.publish(event).await; }
    }
}
