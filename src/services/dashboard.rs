//! Back-office overview: catalog and order counters plus the latest orders.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::domain::aggregates::{Order, OrderStatus};
use crate::domain::value_objects::Money;
use crate::error::Result;
use crate::repository::{inventory as inventory_repo, order as order_repo, product as product_repo};

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_products: i64,
    pub products_in_stock: i64,
    pub low_stock_products: i64,
    /// Stock on hand valued at cost price.
    pub stock_value: Money,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub open_alerts: i64,
    pub recent_orders: Vec<Order>,
}

pub async fn load(pool: &SqlitePool) -> Result<Dashboard> {
    let stats = product_repo::stats(pool).await?;
    Ok(Dashboard {
        total_products: stats.total,
        products_in_stock: stats.in_stock,
        low_stock_products: stats.low_stock,
        stock_value: Money::from_cents(stats.stock_value),
        total_orders: order_repo::count(pool, None).await?,
        pending_orders: order_repo::count(pool, Some(OrderStatus::Pending)).await?,
        open_alerts: inventory_repo::count_open_alerts(pool).await?,
        recent_orders: order_repo::list(pool, None, 5, 0).await?,
    })
}
