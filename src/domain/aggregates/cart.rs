//! Cart Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::value_objects::{Money, MoneyError};

pub const MAX_CART_QUANTITY: i32 = 99;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem { pub id: i64, pub session_id: String, pub product_id: i64, pub quantity: i32, pub created_at: DateTime<Utc> }

/// A cart item joined with the product it points at.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartLine {
    pub item_id: i64,
    pub product_id: i64,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i32,
    pub stock_quantity: i32,
}

impl CartLine {
    pub fn line_total(&self) -> Result<Money, MoneyError> { self.unit_price.checked_mul(self.quantity) }

    pub fn total(lines: &[CartLine]) -> Result<Money, MoneyError> {
        lines.iter().try_fold(Money::ZERO, |acc, line| acc.checked_add(line.line_total()?))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Cart {
    session_id: String,
    items: Vec<CartLineView>,
    total: Money,
    item_count: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub line: CartLine,
    pub line_total: Money,
}

impl Cart {
    pub fn from_lines(session_id: impl Into<String>, lines: Vec<CartLine>) -> Result<Self, MoneyError> {
        let total = CartLine::total(&lines)?;
        let item_count = lines.len();
        let items = lines
            .into_iter()
            .map(|line| Ok(CartLineView { line_total: line.line_total()?, line }))
            .collect::<Result<Vec<_>, MoneyError>>()?;
        Ok(Self { session_id: session_id.into(), items, total, item_count })
    }

    pub fn session_id(&self) -> &str { &self.session_id }
    pub fn items(&self) -> &[CartLineView] { &self.items }
    pub fn total(&self) -> Money { self.total }
    pub fn item_count(&self) -> usize { self.item_count }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

/// Quantity a cart line ends up with after adding `requested` units.
///
/// Requests below one are treated as one. The stock check runs before the
/// ceiling is applied, so a request for 150 of a product with 200 on hand is
/// accepted and capped to 99.
pub fn quantity_after_add(existing: Option<i32>, requested: i32, available: i32) -> Result<i32, CartError> {
    let requested = requested.max(1);
    if requested > available { return Err(CartError::InsufficientStock { available }); }
    let requested = requested.min(MAX_CART_QUANTITY);
    match existing {
        None => Ok(requested),
        Some(current) => {
            let total = current + requested;
            if total > available { return Err(CartError::InsufficientStock { available }); }
            Ok(total.min(MAX_CART_QUANTITY))
        }
    }
}

pub fn quantity_for_update(requested: i32, available: i32) -> Result<i32, CartError> {
    if requested < 1 { return Err(CartError::InvalidQuantity); }
    if requested > available { return Err(CartError::InsufficientStock { available }); }
    Ok(requested.min(MAX_CART_QUANTITY))
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum CartError { InvalidQuantity, InsufficientStock { available: i32 } }
impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuantity => write!(f, "Invalid quantity"),
            Self::InsufficientStock { available } => write!(f, "Only {} available", available),
        }
    }
}
