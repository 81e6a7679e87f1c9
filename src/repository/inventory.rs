//! Stock movement log and stock alerts.
//!
//! Movements are insert-only: nothing in this module updates or deletes them.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::domain::aggregates::{AlertType, StockAlert, StockChange, StockMovement};

pub struct NewMovement<'a> {
    pub product_id: i64,
    pub change: StockChange,
    pub reason: &'a str,
    pub reference_id: Option<&'a str>,
    pub created_by: &'a str,
}

pub async fn insert_movement<'e, E: SqliteExecutor<'e>>(ex: E, m: &NewMovement<'_>, now: DateTime<Utc>) -> sqlx::Result<StockMovement> {
    sqlx::query_as::<_, StockMovement>(
        r#"
        INSERT INTO stock_movements (product_id, movement_type, quantity, old_quantity, new_quantity, reason, reference_id, created_at, created_by)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(m.product_id).bind(m.change.movement_type).bind(m.change.quantity)
    .bind(m.change.old_quantity).bind(m.change.new_quantity)
    .bind(m.reason).bind(m.reference_id).bind(now).bind(m.created_by)
    .fetch_one(ex).await
}

pub async fn movements<'e, E: SqliteExecutor<'e>>(ex: E, product_id: Option<i64>, limit: i64, offset: i64) -> sqlx::Result<Vec<StockMovement>> {
    sqlx::query_as::<_, StockMovement>("SELECT * FROM stock_movements WHERE (?1 IS NULL OR product_id = ?1) ORDER BY id DESC LIMIT ?2 OFFSET ?3")
        .bind(product_id).bind(limit).bind(offset).fetch_all(ex).await
}

pub async fn count_movements<'e, E: SqliteExecutor<'e>>(ex: E, product_id: Option<i64>) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements WHERE (?1 IS NULL OR product_id = ?1)").bind(product_id).fetch_one(ex).await
}

pub async fn find_open_alert<'e, E: SqliteExecutor<'e>>(ex: E, product_id: i64) -> sqlx::Result<Option<StockAlert>> {
    sqlx::query_as::<_, StockAlert>("SELECT * FROM stock_alerts WHERE product_id = ? AND is_resolved = 0").bind(product_id).fetch_optional(ex).await
}

pub async fn insert_alert<'e, E: SqliteExecutor<'e>>(ex: E, product_id: i64, alert_type: AlertType, message: &str, now: DateTime<Utc>) -> sqlx::Result<StockAlert> {
    sqlx::query_as::<_, StockAlert>("INSERT INTO stock_alerts (product_id, alert_type, message, is_resolved, created_at) VALUES (?, ?, ?, 0, ?) RETURNING *")
        .bind(product_id).bind(alert_type).bind(message).bind(now).fetch_one(ex).await
}

pub async fn retype_alert<'e, E: SqliteExecutor<'e>>(ex: E, alert_id: i64, alert_type: AlertType, message: &str) -> sqlx::Result<()> {
    sqlx::query("UPDATE stock_alerts SET alert_type = ?, message = ? WHERE id = ? AND is_resolved = 0")
        .bind(alert_type).bind(message).bind(alert_id).execute(ex).await?;
    Ok(())
}

pub async fn resolve_alert<'e, E: SqliteExecutor<'e>>(ex: E, alert_id: i64, note: &str, now: DateTime<Utc>) -> sqlx::Result<()> {
    sqlx::query("UPDATE stock_alerts SET is_resolved = 1, resolved_at = ?, resolution_note = ? WHERE id = ? AND is_resolved = 0")
        .bind(now).bind(note).bind(alert_id).execute(ex).await?;
    Ok(())
}

pub async fn alerts<'e, E: SqliteExecutor<'e>>(ex: E, include_resolved: bool) -> sqlx::Result<Vec<StockAlert>> {
    sqlx::query_as::<_, StockAlert>("SELECT * FROM stock_alerts WHERE (?1 OR is_resolved = 0) ORDER BY id DESC")
        .bind(include_resolved).fetch_all(ex).await
}

pub async fn count_open_alerts<'e, E: SqliteExecutor<'e>>(ex: E) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM stock_alerts WHERE is_resolved = 0").fetch_one(ex).await
}
