//! Anonymous session carts.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::WriteTx;
use crate::domain::aggregates::cart::{quantity_after_add, quantity_for_update};
use crate::domain::aggregates::{Cart, CartItem};
use crate::error::{Result, StoreError};
use crate::repository::{cart as cart_repo, product as product_repo};

pub fn new_session_id() -> String { Uuid::new_v4().to_string() }

pub fn check_session_id(session_id: &str) -> Result<()> {
    if session_id.trim().is_empty() || session_id.len() > 255 {
        return Err(StoreError::Validation("session id must be 1 to 255 characters".into()));
    }
    Ok(())
}

pub async fn view(pool: &SqlitePool, session_id: &str) -> Result<Cart> {
    let lines = cart_repo::lines_for_session(pool, session_id).await?;
    Ok(Cart::from_lines(session_id, lines)?)
}

pub async fn count(pool: &SqlitePool, session_id: &str) -> Result<i64> {
    Ok(cart_repo::count(pool, session_id).await?)
}

pub async fn add(pool: &SqlitePool, session_id: &str, product_id: i64, quantity: Option<i32>) -> Result<CartItem> {
    let mut tx = WriteTx::begin(pool).await?;
    let product = product_repo::find_by_id(&mut *tx, product_id).await?.ok_or(StoreError::NotFound("Product"))?;
    let existing = cart_repo::find_for_product(&mut *tx, session_id, product_id).await?;
    let quantity = quantity_after_add(existing.as_ref().map(|i| i.quantity), quantity.unwrap_or(1), product.stock_quantity)
        .map_err(|e| StoreError::from_cart(e, &product.name))?;
    let item = match existing {
        Some(item) => cart_repo::set_quantity(&mut *tx, item.id, quantity).await?,
        None => cart_repo::insert(&mut *tx, session_id, product_id, quantity, Utc::now()).await?,
    };
    tx.commit().await?;
    tracing::info!(product_id, quantity = item.quantity, "product added to cart");
    Ok(item)
}

pub async fn update(pool: &SqlitePool, session_id: &str, item_id: i64, quantity: i32) -> Result<CartItem> {
    let mut tx = WriteTx::begin(pool).await?;
    let item = cart_repo::find_item(&mut *tx, session_id, item_id).await?.ok_or(StoreError::NotFound("Cart item"))?;
    let product = product_repo::find_by_id(&mut *tx, item.product_id).await?.ok_or(StoreError::NotFound("Product"))?;
    let quantity = quantity_for_update(quantity, product.stock_quantity).map_err(|e| StoreError::from_cart(e, &product.name))?;
    let item = cart_repo::set_quantity(&mut *tx, item.id, quantity).await?;
    tx.commit().await?;
    Ok(item)
}

pub async fn remove(pool: &SqlitePool, session_id: &str, item_id: i64) -> Result<()> {
    if !cart_repo::delete_item(pool, session_id, item_id).await? {
        return Err(StoreError::NotFound("Cart item"));
    }
    Ok(())
}

pub async fn clear(pool: &SqlitePool, session_id: &str) -> Result<u64> {
    Ok(cart_repo::clear(pool, session_id).await?)
}
