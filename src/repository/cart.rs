//! Cart item queries, always scoped to a session id.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::domain::aggregates::{CartItem, CartLine};

pub async fn lines_for_session<'e, E: SqliteExecutor<'e>>(ex: E, session_id: &str) -> sqlx::Result<Vec<CartLine>> {
    sqlx::query_as::<_, CartLine>(
        r#"
        SELECT c.id AS item_id, c.product_id, p.name, p.price AS unit_price, c.quantity, p.stock_quantity
        FROM cart_items c JOIN products p ON p.id = c.product_id
        WHERE c.session_id = ?
        ORDER BY c.id
        "#,
    )
    .bind(session_id).fetch_all(ex).await
}

pub async fn find_for_product<'e, E: SqliteExecutor<'e>>(ex: E, session_id: &str, product_id: i64) -> sqlx::Result<Option<CartItem>> {
    sqlx::query_as::<_, CartItem>("SELECT * FROM cart_items WHERE session_id = ? AND product_id = ?")
        .bind(session_id).bind(product_id).fetch_optional(ex).await
}

pub async fn find_item<'e, E: SqliteExecutor<'e>>(ex: E, session_id: &str, item_id: i64) -> sqlx::Result<Option<CartItem>> {
    sqlx::query_as::<_, CartItem>("SELECT * FROM cart_items WHERE session_id = ? AND id = ?")
        .bind(session_id).bind(item_id).fetch_optional(ex).await
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(ex: E, session_id: &str, product_id: i64, quantity: i32, now: DateTime<Utc>) -> sqlx::Result<CartItem> {
    sqlx::query_as::<_, CartItem>("INSERT INTO cart_items (session_id, product_id, quantity, created_at) VALUES (?, ?, ?, ?) RETURNING *")
        .bind(session_id).bind(product_id).bind(quantity).bind(now).fetch_one(ex).await
}

pub async fn set_quantity<'e, E: SqliteExecutor<'e>>(ex: E, item_id: i64, quantity: i32) -> sqlx::Result<CartItem> {
    sqlx::query_as::<_, CartItem>("UPDATE cart_items SET quantity = ? WHERE id = ? RETURNING *")
        .bind(quantity).bind(item_id).fetch_one(ex).await
}

pub async fn delete_item<'e, E: SqliteExecutor<'e>>(ex: E, session_id: &str, item_id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE session_id = ? AND id = ?").bind(session_id).bind(item_id).execute(ex).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn clear<'e, E: SqliteExecutor<'e>>(ex: E, session_id: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE session_id = ?").bind(session_id).execute(ex).await?;
    Ok(result.rows_affected())
}

pub async fn count<'e, E: SqliteExecutor<'e>>(ex: E, session_id: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE session_id = ?").bind(session_id).fetch_one(ex).await
}
