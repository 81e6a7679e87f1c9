//! Product queries

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::domain::aggregates::Product;
use crate::domain::value_objects::Money;

/// Everything about a product except its stock, which only moves through
/// the inventory service.
#[derive(Debug, Clone)]
pub struct ProductDetails {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub cost_price: Money,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub min_stock_level: i32,
    pub max_stock_level: i32,
    pub supplier_id: Option<i64>,
    pub supplier: Option<String>,
    pub sku: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter { pub search: Option<String>, pub category: Option<String> }

impl ProductFilter {
    fn pattern(&self) -> Option<String> { self.search.as_ref().map(|s| format!("%{}%", s.trim())) }
}

#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct ProductStats { pub total: i64, pub in_stock: i64, pub low_stock: i64, pub stock_value: i64 }

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> sqlx::Result<Option<Product>> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?").bind(id).fetch_optional(ex).await
}

pub async fn list_available<'e, E: SqliteExecutor<'e>>(ex: E) -> sqlx::Result<Vec<Product>> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE stock_quantity > 0 ORDER BY id").fetch_all(ex).await
}

pub async fn list<'e, E: SqliteExecutor<'e>>(ex: E, filter: &ProductFilter, limit: i64, offset: i64) -> sqlx::Result<Vec<Product>> {
    sqlx::query_as::<_, Product>(
        r#"
        SELECT * FROM products
        WHERE (?1 IS NULL OR name LIKE ?1 OR description LIKE ?1 OR category LIKE ?1 OR sku LIKE ?1)
          AND (?2 IS NULL OR category = ?2)
        ORDER BY created_at DESC, id DESC
        LIMIT ?3 OFFSET ?4
        "#,
    )
    .bind(filter.pattern()).bind(&filter.category).bind(limit).bind(offset)
    .fetch_all(ex).await
}

pub async fn count<'e, E: SqliteExecutor<'e>>(ex: E, filter: &ProductFilter) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM products
        WHERE (?1 IS NULL OR name LIKE ?1 OR description LIKE ?1 OR category LIKE ?1 OR sku LIKE ?1)
          AND (?2 IS NULL OR category = ?2)
        "#,
    )
    .bind(filter.pattern()).bind(&filter.category)
    .fetch_one(ex).await
}

pub async fn count_all<'e, E: SqliteExecutor<'e>>(ex: E) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(ex).await
}

pub async fn stats<'e, E: SqliteExecutor<'e>>(ex: E) -> sqlx::Result<ProductStats> {
    sqlx::query_as::<_, ProductStats>(
        r#"
        SELECT COUNT(*) AS total,
               COALESCE(SUM(in_stock), 0) AS in_stock,
               COALESCE(SUM(stock_quantity <= min_stock_level), 0) AS low_stock,
               CAST(TOTAL(stock_quantity * cost_price) AS INTEGER) AS stock_value
        FROM products
        "#,
    )
    .fetch_one(ex).await
}

/// New products start at zero stock; initial stock is booked as a movement.
pub async fn insert<'e, E: SqliteExecutor<'e>>(ex: E, d: &ProductDetails, now: DateTime<Utc>) -> sqlx::Result<Product> {
    sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, description, price, cost_price, image_url, category, in_stock, stock_quantity,
                              min_stock_level, max_stock_level, supplier_id, supplier, sku, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, 0, 0, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&d.name).bind(&d.description).bind(d.price).bind(d.cost_price).bind(&d.image_url).bind(&d.category)
    .bind(d.min_stock_level).bind(d.max_stock_level).bind(d.supplier_id).bind(&d.supplier).bind(&d.sku)
    .bind(now).bind(now)
    .fetch_one(ex).await
}

pub async fn update_details<'e, E: SqliteExecutor<'e>>(ex: E, id: i64, d: &ProductDetails, now: DateTime<Utc>) -> sqlx::Result<Option<Product>> {
    sqlx::query_as::<_, Product>(
        r#"
        UPDATE products SET name = ?, description = ?, price = ?, cost_price = ?, image_url = ?,
               category = ?, min_stock_level = ?, max_stock_level = ?, supplier_id = ?, supplier = ?, sku = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&d.name).bind(&d.description).bind(d.price).bind(d.cost_price).bind(&d.image_url).bind(&d.category)
    .bind(d.min_stock_level).bind(d.max_stock_level).bind(d.supplier_id).bind(&d.supplier).bind(&d.sku)
    .bind(now).bind(id)
    .fetch_optional(ex).await
}

/// Compare-and-set on the stock column. Returns false when the row no longer
/// holds `old_quantity`.
pub async fn set_stock<'e, E: SqliteExecutor<'e>>(ex: E, id: i64, old_quantity: i32, new_quantity: i32, now: DateTime<Utc>) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE products SET stock_quantity = ?, in_stock = ?, updated_at = ? WHERE id = ? AND stock_quantity = ?")
        .bind(new_quantity).bind(new_quantity > 0).bind(now).bind(id).bind(old_quantity)
        .execute(ex).await?;
    Ok(result.rows_affected() == 1)
}

pub async fn count_order_items<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE product_id = ?").bind(id).fetch_one(ex).await
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?").bind(id).execute(ex).await?;
    Ok(result.rows_affected() > 0)
}
