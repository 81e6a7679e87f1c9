//! Supplier directory. Products reference suppliers by id and keep a
//! free-text name of their own.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::aggregates::Supplier;
use crate::error::{Result, StoreError};
use crate::repository::supplier::{self as supplier_repo, SupplierDetails};

pub async fn list(pool: &SqlitePool) -> Result<Vec<Supplier>> {
    Ok(supplier_repo::list(pool).await?)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Supplier> {
    supplier_repo::find_by_id(pool, id).await?.ok_or(StoreError::NotFound("Supplier"))
}

pub async fn create(pool: &SqlitePool, details: &SupplierDetails) -> Result<Supplier> {
    let supplier = supplier_repo::insert(pool, details, Utc::now()).await?;
    tracing::info!(supplier_id = supplier.id, name = %supplier.name, "supplier created");
    Ok(supplier)
}

pub async fn update(pool: &SqlitePool, id: i64, details: &SupplierDetails) -> Result<Supplier> {
    supplier_repo::update(pool, id, details).await?.ok_or(StoreError::NotFound("Supplier"))
}

/// Products pointing at the supplier keep their free-text supplier name.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    if !supplier_repo::delete(pool, id).await? {
        return Err(StoreError::NotFound("Supplier"));
    }
    tracing::info!(supplier_id = id, "supplier deleted");
    Ok(())
}
