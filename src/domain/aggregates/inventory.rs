//! Stock movements and low-stock alerts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SYSTEM_ACTOR: &str = "Sistema";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum MovementType { Increase, Decrease }

/// Append-only audit row.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockMovement {
    pub id: i64,
    pub product_id: i64,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub old_quantity: i32,
    pub new_quantity: i32,
    pub reason: Option<String>,
    pub reference_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AlertType { LowStock, OutOfStock }

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockAlert {
    pub id: i64,
    pub product_id: i64,
    pub alert_type: AlertType,
    pub message: Option<String>,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_note: Option<String>,
}

/// What to do with a product's alert after its stock settles at `quantity`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlertAction {
    Keep,
    Raise { alert_type: AlertType, message: String },
    Retype { alert_id: i64, alert_type: AlertType, message: String },
    Resolve { alert_id: i64, note: String },
}

pub fn evaluate_alert(product_name: &str, quantity: i32, min_level: i32, open: Option<&StockAlert>) -> AlertAction {
    if quantity <= min_level {
        let (alert_type, message) = if quantity == 0 {
            (AlertType::OutOfStock, format!("{}: sem estoque", product_name))
        } else {
            (AlertType::LowStock, format!("{}: estoque baixo ({} unidades, mínimo {})", product_name, quantity, min_level))
        };
        match open {
            None => AlertAction::Raise { alert_type, message },
            Some(alert) if alert.alert_type != alert_type => AlertAction::Retype { alert_id: alert.id, alert_type, message },
            Some(_) => AlertAction::Keep,
        }
    } else {
        match open {
            Some(alert) => AlertAction::Resolve { alert_id: alert.id, note: format!("Estoque reposto: {} unidades", quantity) },
            None => AlertAction::Keep,
        }
    }
}
