//! Turns a session cart into an order.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::WriteTx;
use crate::domain::aggregates::inventory::SYSTEM_ACTOR;
use crate::domain::aggregates::{CartLine, Order, OrderItem};
use crate::domain::events::{DomainEvent, EventPublisher};
use crate::error::{Result, StoreError};
use crate::notify;
use crate::repository::{cart as cart_repo, order as order_repo};
use crate::services::inventory;

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt { pub order: Order, pub items: Vec<OrderItem>, pub whatsapp_url: String }

pub struct Customer<'a> { pub name: &'a str, pub phone: Option<&'a str> }

/// Order, order items, stock decrements, movements and cart cleanup share
/// one transaction; any insufficient line rolls all of it back.
pub async fn checkout(
    pool: &SqlitePool,
    events: &EventPublisher,
    whatsapp_number: &str,
    session_id: &str,
    customer: Customer<'_>,
) -> Result<CheckoutReceipt> {
    let mut tx = WriteTx::begin(pool).await?;
    let lines = cart_repo::lines_for_session(&mut *tx, session_id).await?;
    if lines.is_empty() { return Err(StoreError::EmptyCart); }

    let total = CartLine::total(&lines)?;
    let order = order_repo::insert(&mut *tx, customer.name, customer.phone, total, Utc::now()).await?;
    let reason = format!("Venda - Pedido #{}", order.id);
    let reference = order.id.to_string();

    let mut pending = vec![DomainEvent::OrderPlaced { order_id: order.id, total_amount: total.cents(), item_count: lines.len() }];
    for line in &lines {
        if line.quantity > line.stock_quantity {
            tracing::warn!(order_id = order.id, product_id = line.product_id, requested = line.quantity, available = line.stock_quantity, "checkout rejected");
            return Err(StoreError::insufficient(&line.name, line.stock_quantity));
        }
        order_repo::insert_item(&mut *tx, order.id, line.product_id, line.quantity, line.unit_price).await?;
        let update = inventory::apply_stock_change(&mut tx, line.product_id, -line.quantity, &reason, Some(&reference), SYSTEM_ACTOR).await?;
        pending.extend(update.events);
    }
    cart_repo::clear(&mut *tx, session_id).await?;
    tx.commit().await?;

    let items = order_repo::items(pool, order.id).await?;
    let whatsapp_url = notify::whatsapp_url(whatsapp_number, &order, &items)?;
    let order = order_repo::mark_notified(pool, order.id).await?;
    tracing::info!(order_id = order.id, total = %order.total_amount, items = items.len(), "order placed");

    events.publish_all(&pending).await;
    Ok(CheckoutReceipt { order, items, whatsapp_url })
}
