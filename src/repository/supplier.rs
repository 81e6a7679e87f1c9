//! Supplier queries

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::domain::aggregates::Supplier;

#[derive(Debug, Clone)]
pub struct SupplierDetails {
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
}

pub async fn list<'e, E: SqliteExecutor<'e>>(ex: E) -> sqlx::Result<Vec<Supplier>> {
    sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY name").fetch_all(ex).await
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> sqlx::Result<Option<Supplier>> {
    sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = ?").bind(id).fetch_optional(ex).await
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(ex: E, d: &SupplierDetails, now: DateTime<Utc>) -> sqlx::Result<Supplier> {
    sqlx::query_as::<_, Supplier>(
        "INSERT INTO suppliers (name, contact_person, email, phone, address, is_active, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(&d.name).bind(&d.contact_person).bind(&d.email).bind(&d.phone).bind(&d.address).bind(d.is_active).bind(now)
    .fetch_one(ex).await
}

pub async fn update<'e, E: SqliteExecutor<'e>>(ex: E, id: i64, d: &SupplierDetails) -> sqlx::Result<Option<Supplier>> {
    sqlx::query_as::<_, Supplier>(
        "UPDATE suppliers SET name = ?, contact_person = ?, email = ?, phone = ?, address = ?, is_active = ? WHERE id = ? RETURNING *",
    )
    .bind(&d.name).bind(&d.contact_person).bind(&d.email).bind(&d.phone).bind(&d.address).bind(d.is_active).bind(id)
    .fetch_optional(ex).await
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM suppliers WHERE id = ?").bind(id).execute(ex).await?;
    Ok(result.rows_affected() > 0)
}
