//! Order and order item queries

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::domain::aggregates::{Order, OrderItem, OrderStatus};
use crate::domain::value_objects::Money;

pub async fn insert<'e, E: SqliteExecutor<'e>>(ex: E, customer_name: &str, customer_phone: Option<&str>, total: Money, now: DateTime<Utc>) -> sqlx::Result<Order> {
    sqlx::query_as::<_, Order>(
        "INSERT INTO orders (customer_name, customer_phone, total_amount, status, notification_sent, created_at) VALUES (?, ?, ?, ?, 0, ?) RETURNING *",
    )
    .bind(customer_name).bind(customer_phone).bind(total).bind(OrderStatus::Pending).bind(now)
    .fetch_one(ex).await
}

pub async fn insert_item<'e, E: SqliteExecutor<'e>>(ex: E, order_id: i64, product_id: i64, quantity: i32, unit_price: Money) -> sqlx::Result<i64> {
    let result = sqlx::query("INSERT INTO order_items (order_id, product_id, quantity, unit_price) VALUES (?, ?, ?, ?)")
        .bind(order_id).bind(product_id).bind(quantity).bind(unit_price)
        .execute(ex).await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> sqlx::Result<Option<Order>> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?").bind(id).fetch_optional(ex).await
}

pub async fn items<'e, E: SqliteExecutor<'e>>(ex: E, order_id: i64) -> sqlx::Result<Vec<OrderItem>> {
    sqlx::query_as::<_, OrderItem>(
        r#"
        SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name, oi.quantity, oi.unit_price
        FROM order_items oi JOIN products p ON p.id = oi.product_id
        WHERE oi.order_id = ?
        ORDER BY oi.id
        "#,
    )
    .bind(order_id).fetch_all(ex).await
}

pub async fn list<'e, E: SqliteExecutor<'e>>(ex: E, status: Option<OrderStatus>, limit: i64, offset: i64) -> sqlx::Result<Vec<Order>> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE (?1 IS NULL OR status = ?1) ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3")
        .bind(status).bind(limit).bind(offset).fetch_all(ex).await
}

pub async fn count<'e, E: SqliteExecutor<'e>>(ex: E, status: Option<OrderStatus>) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE (?1 IS NULL OR status = ?1)").bind(status).fetch_one(ex).await
}

pub async fn update<'e, E: SqliteExecutor<'e>>(ex: E, id: i64, customer_name: &str, customer_phone: Option<&str>, status: OrderStatus) -> sqlx::Result<Order> {
    sqlx::query_as::<_, Order>("UPDATE orders SET customer_name = ?, customer_phone = ?, status = ? WHERE id = ? RETURNING *")
        .bind(customer_name).bind(customer_phone).bind(status).bind(id).fetch_one(ex).await
}

pub async fn mark_notified<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> sqlx::Result<Order> {
    sqlx::query_as::<_, Order>("UPDATE orders SET notification_sent = 1 WHERE id = ? RETURNING *").bind(id).fetch_one(ex).await
}
