//! Back-office order management. Orders are only created by checkout.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::WriteTx;
use crate::domain::aggregates::{Order, OrderItem, OrderStatus};
use crate::domain::events::{DomainEvent, EventPublisher};
use crate::error::{Result, StoreError};
use crate::repository::order as order_repo;
use crate::services::inventory;

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub status_label: &'static str,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderChanges { pub customer_name: Option<String>, pub customer_phone: Option<String>, pub status: Option<OrderStatus> }

pub async fn list(pool: &SqlitePool, status: Option<OrderStatus>, limit: i64, offset: i64) -> Result<(Vec<Order>, i64)> {
    let rows = order_repo::list(pool, status, limit, offset).await?;
    let total = order_repo::count(pool, status).await?;
    Ok((rows, total))
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<OrderDetail> {
    let order = order_repo::find_by_id(pool, id).await?.ok_or(StoreError::NotFound("Order"))?;
    let items = order_repo::items(pool, id).await?;
    Ok(OrderDetail { status_label: order.status.label(), order, items })
}

/// Applies admin edits. Moving an order to `cancelled` puts its items back
/// on the shelf in the same transaction.
pub async fn update(pool: &SqlitePool, events: &EventPublisher, id: i64, changes: OrderChanges, actor: &str) -> Result<OrderDetail> {
    let mut tx = WriteTx::begin(pool).await?;
    let order = order_repo::find_by_id(&mut *tx, id).await?.ok_or(StoreError::NotFound("Order"))?;
    let previous = order.status;
    let next = match changes.status {
        Some(status) => previous.transition_to(status)?,
        None => previous,
    };

    let mut pending = Vec::new();
    if next == OrderStatus::Cancelled && previous != OrderStatus::Cancelled {
        let reason = format!("Cancelamento - Pedido #{}", id);
        let reference = id.to_string();
        for item in order_repo::items(&mut *tx, id).await? {
            let update = inventory::apply_stock_change(&mut tx, item.product_id, item.quantity, &reason, Some(&reference), actor).await?;
            pending.extend(update.events);
        }
    }

    let name = changes.customer_name.unwrap_or(order.customer_name);
    let phone = match changes.customer_phone {
        Some(p) if p.trim().is_empty() => None,
        Some(p) => Some(p),
        None => order.customer_phone,
    };
    order_repo::update(&mut *tx, id, &name, phone.as_deref(), next).await?;
    tx.commit().await?;

    if next != previous {
        tracing::info!(order_id = id, from = %previous, to = %next, "order status changed");
        pending.insert(0, DomainEvent::OrderStatusChanged { order_id: id, from: previous, to: next });
    }
    events.publish_all(&pending).await;
    get(pool, id).await
}
