//! Stock bookkeeping.
//!
//! Every change to `products.stock_quantity` goes through
//! [`apply_stock_change`], which writes the new quantity and `in_stock`
//! flag, appends a movement and reconciles the product's alert on the
//! caller's connection, so it commits or rolls back with the caller.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::WriteTx;
use crate::domain::aggregates::inventory::evaluate_alert;
use crate::domain::aggregates::{AlertAction, Product, ProductError, StockAlert, StockMovement};
use crate::domain::events::{DomainEvent, EventPublisher};
use crate::error::{Result, StoreError};
use crate::repository::inventory::{self as inventory_repo, NewMovement};
use crate::repository::product as product_repo;

pub const MANUAL_ADJUSTMENT: &str = "Ajuste manual";

#[derive(Debug, Clone)]
pub struct StockUpdate {
    pub product: Product,
    pub movement: StockMovement,
    pub events: Vec<DomainEvent>,
}

pub async fn apply_stock_change(
    conn: &mut SqliteConnection,
    product_id: i64,
    change: i32,
    reason: &str,
    reference_id: Option<&str>,
    actor: &str,
) -> Result<StockUpdate> {
    let mut product = product_repo::find_by_id(&mut *conn, product_id).await?.ok_or(StoreError::NotFound("Product"))?;
    let planned = product.plan_stock_change(change).map_err(|e| match e {
        ProductError::InsufficientStock { available } => StoreError::insufficient(&product.name, available),
        other => StoreError::InvalidQuantity(other.to_string()),
    })?;

    let now = Utc::now();
    if !product_repo::set_stock(&mut *conn, product.id, planned.old_quantity, planned.new_quantity, now).await? {
        return Err(StoreError::Conflict(format!("Stock for {} changed concurrently, retry", product.name)));
    }
    product.stock_quantity = planned.new_quantity;
    product.in_stock = planned.in_stock();
    product.updated_at = now;

    let movement = inventory_repo::insert_movement(
        &mut *conn,
        &NewMovement { product_id, change: planned, reason, reference_id, created_by: actor },
        now,
    )
    .await?;
    tracing::info!(
        product_id, movement = ?planned.movement_type, quantity = planned.quantity,
        old = planned.old_quantity, new = planned.new_quantity, reason, actor, "stock updated"
    );

    let mut events = vec![DomainEvent::StockAdjusted {
        product_id,
        movement_type: planned.movement_type,
        quantity: planned.quantity,
        new_quantity: planned.new_quantity,
        reference_id: reference_id.map(String::from),
    }];
    events.extend(reconcile_alert(conn, &product).await?);
    Ok(StockUpdate { product, movement, events })
}

/// Bring the product's open alert in line with its current stock.
pub async fn reconcile_alert(conn: &mut SqliteConnection, product: &Product) -> Result<Option<DomainEvent>> {
    let open = inventory_repo::find_open_alert(&mut *conn, product.id).await?;
    let now = Utc::now();
    let event = match evaluate_alert(&product.name, product.stock_quantity, product.min_stock_level, open.as_ref()) {
        AlertAction::Keep => None,
        AlertAction::Raise { alert_type, message } => {
            inventory_repo::insert_alert(&mut *conn, product.id, alert_type, &message, now).await?;
            tracing::warn!(product_id = product.id, ?alert_type, quantity = product.stock_quantity, "stock alert raised");
            Some(DomainEvent::StockAlertRaised { product_id: product.id, alert_type, quantity: product.stock_quantity })
        }
        AlertAction::Retype { alert_id, alert_type, message } => {
            inventory_repo::retype_alert(&mut *conn, alert_id, alert_type, &message).await?;
            Some(DomainEvent::StockAlertRaised { product_id: product.id, alert_type, quantity: product.stock_quantity })
        }
        AlertAction::Resolve { alert_id, note } => {
            inventory_repo::resolve_alert(&mut *conn, alert_id, &note, now).await?;
            tracing::info!(product_id = product.id, alert_id, "stock alert resolved");
            Some(DomainEvent::StockAlertResolved { product_id: product.id, alert_id, quantity: product.stock_quantity })
        }
    };
    Ok(event)
}

pub async fn adjust_stock(
    pool: &SqlitePool,
    events: &EventPublisher,
    product_id: i64,
    change: i32,
    reason: Option<&str>,
    actor: &str,
) -> Result<StockUpdate> {
    let reason = reason.map(str::trim).filter(|r| !r.is_empty()).unwrap_or(MANUAL_ADJUSTMENT);
    let mut tx = WriteTx::begin(pool).await?;
    let update = apply_stock_change(&mut tx, product_id, change, reason, None, actor).await?;
    tx.commit().await?;
    events.publish_all(&update.events).await;
    Ok(update)
}

pub async fn movements(pool: &SqlitePool, product_id: Option<i64>, limit: i64, offset: i64) -> Result<(Vec<StockMovement>, i64)> {
    if let Some(id) = product_id {
        product_repo::find_by_id(pool, id).await?.ok_or(StoreError::NotFound("Product"))?;
    }
    let rows = inventory_repo::movements(pool, product_id, limit, offset).await?;
    let total = inventory_repo::count_movements(pool, product_id).await?;
    Ok((rows, total))
}

pub async fn alerts(pool: &SqlitePool, include_resolved: bool) -> Result<Vec<StockAlert>> {
    Ok(inventory_repo::alerts(pool, include_resolved).await?)
}
