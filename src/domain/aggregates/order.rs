//! Order Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::value_objects::{Money, MoneyError};

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub notification_sent: bool,
    pub created_at: DateTime<Utc>,
}

/// Line as sold; `unit_price` is a snapshot, not a live reference to the product.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem { pub id: i64, pub order_id: i64, pub product_id: i64, pub product_name: String, pub quantity: i32, pub unit_price: Money }

impl OrderItem {
    pub fn total_price(&self) -> Result<Money, MoneyError> { self.unit_price.checked_mul(self.quantity) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus { #[default] Pending, Confirmed, Completed, Cancelled }

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Confirmed => "Confirmado",
            Self::Completed => "Finalizado",
            Self::Cancelled => "Cancelado",
        }
    }

    pub fn transition_to(self, next: OrderStatus) -> Result<OrderStatus, OrderError> {
        if self == OrderStatus::Cancelled && next != OrderStatus::Cancelled {
            return Err(OrderError::CannotReopen);
        }
        Ok(next)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self { Self::Pending => "pending", Self::Confirmed => "confirmed", Self::Completed => "completed", Self::Cancelled => "cancelled" };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum OrderError { CannotReopen }
impl std::error::Error for OrderError {}
impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self { Self::CannotReopen => write!(f, "Cancelled orders cannot change status") }
    }
}
