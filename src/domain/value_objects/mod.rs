//! Value Objects for the storefront

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shop SKU such as `POM-001`: ASCII letters, digits and inner hyphens,
/// stored uppercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sku(String);

impl Sku {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 32;

    pub fn parse(raw: &str) -> Result<Self, SkuError> {
        let code = raw.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(SkuError::Empty);
        }
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&code.len()) {
            return Err(SkuError::Length(code.len()));
        }
        if let Some(c) = code.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
            return Err(SkuError::Character(c));
        }
        if code.starts_with('-') || code.ends_with('-') {
            return Err(SkuError::Character('-'));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str { &self.0 }
    pub fn into_inner(self) -> String { self.0 }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkuError {
    Empty,
    Length(usize),
    Character(char),
}

impl std::error::Error for SkuError {}

impl fmt::Display for SkuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("must not be blank"),
            Self::Length(len) => write!(f, "must be {} to {} characters, got {}", Sku::MIN_LEN, Sku::MAX_LEN, len),
            Self::Character(c) => write!(f, "'{}' is not allowed here", c),
        }
    }
}

/// Money value object, in centavos. The shop only sells in BRL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct Money(i64);

/// Upper bound accepted for a single price: R$ 1.000.000,00.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    Overflow,
}

impl std::error::Error for MoneyError {}

impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("amount overflow") }
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self { Self(cents) }
    pub fn cents(&self) -> i64 { self.0 }

    pub fn checked_add(self, other: Money) -> Result<Money, MoneyError> {
        self.0.checked_add(other.0).map(Money).ok_or(MoneyError::Overflow)
    }

    pub fn checked_mul(self, qty: i32) -> Result<Money, MoneyError> {
        self.0.checked_mul(i64::from(qty)).map(Money).ok_or(MoneyError::Overflow)
    }

    pub fn total<I: IntoIterator<Item = Money>>(amounts: I) -> Result<Money, MoneyError> {
        amounts.into_iter().try_fold(Money::ZERO, Money::checked_add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "R$ {}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
