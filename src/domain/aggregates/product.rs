//! Product Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::aggregates::inventory::MovementType;
use crate::domain::value_objects::Money;

pub const CATEGORIES: [&str; 7] = ["Pomadas", "Óleos", "Shampoos", "Ceras", "Pós-Barba", "Kits", "Outros"];
pub const DEFAULT_MIN_STOCK_LEVEL: i32 = 5;
pub const DEFAULT_MAX_STOCK_LEVEL: i32 = 100;
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x300/8B4513/FFFFFF?text=Produto";

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub cost_price: Money,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub in_stock: bool,
    pub stock_quantity: i32,
    pub min_stock_level: i32,
    pub max_stock_level: i32,
    pub supplier_id: Option<i64>,
    pub supplier: Option<String>,
    pub sku: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The outcome of applying a signed quantity change to a product's stock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StockChange {
    pub movement_type: MovementType,
    pub quantity: i32,
    pub old_quantity: i32,
    pub new_quantity: i32,
}

impl StockChange {
    pub fn in_stock(&self) -> bool { self.new_quantity > 0 }
}

impl Product {
    pub fn is_low_stock(&self) -> bool { self.stock_quantity <= self.min_stock_level }

    /// Margin over sale price, in percent. Zero when no cost is recorded.
    pub fn profit_margin(&self) -> f64 {
        if self.cost_price.cents() > 0 && self.price.cents() > 0 {
            let price = self.price.cents() as f64;
            (price - self.cost_price.cents() as f64) / price * 100.0
        } else {
            0.0
        }
    }

    pub fn display_image_url(&self) -> &str {
        match self.image_url.as_deref() {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => url,
            _ => PLACEHOLDER_IMAGE,
        }
    }

    pub fn plan_stock_change(&self, change: i32) -> Result<StockChange, ProductError> {
        if change == 0 { return Err(ProductError::ZeroChange); }
        let new_quantity = self.stock_quantity.checked_add(change).ok_or(ProductError::QuantityOverflow)?;
        if new_quantity < 0 {
            return Err(ProductError::InsufficientStock { available: self.stock_quantity });
        }
        Ok(StockChange {
            movement_type: if change > 0 { MovementType::Increase } else { MovementType::Decrease },
            quantity: change.abs(),
            old_quantity: self.stock_quantity,
            new_quantity,
        })
    }
}

pub fn is_known_category(category: &str) -> bool { CATEGORIES.contains(&category) }

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductError { ZeroChange, QuantityOverflow, InsufficientStock { available: i32 } }
impl std::error::Error for ProductError {}
impl std::fmt::Display for ProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroChange => write!(f, "Stock change must be non-zero"),
            Self::QuantityOverflow => write!(f, "Stock quantity out of range"),
            Self::InsufficientStock { available } => write!(f, "Insufficient stock, {} available", available),
        }
    }
}
