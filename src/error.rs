//! Service-level error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::domain::aggregates::{CartError, OrderError};
use crate::domain::value_objects::{MoneyError, SkuError};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidQuantity(String),

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Insufficient stock for {product}: only {available} available")]
    InsufficientStock { product: String, available: i32 },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("The store is busy, please retry")]
    Busy,

    #[error("Amount out of range")]
    AmountOutOfRange,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn insufficient(product: impl Into<String>, available: i32) -> Self {
        Self::InsufficientStock { product: product.into(), available }
    }

    pub fn from_cart(err: CartError, product: &str) -> Self {
        match err {
            CartError::InvalidQuantity => Self::InvalidQuantity("Quantity must be at least 1".into()),
            CartError::InsufficientStock { available } => Self::insufficient(product, available),
        }
    }

    fn code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::InvalidQuantity(_) => (StatusCode::BAD_REQUEST, "invalid_quantity"),
            Self::EmptyCart => (StatusCode::BAD_REQUEST, "empty_cart"),
            Self::InsufficientStock { .. } => (StatusCode::CONFLICT, "insufficient_stock"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            Self::InvalidTransition(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_transition"),
            Self::Busy => (StatusCode::CONFLICT, "busy"),
            Self::AmountOutOfRange => (StatusCode::UNPROCESSABLE_ENTITY, "amount_out_of_range"),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return Self::Conflict(format!("Duplicate value: {}", db.message()));
            }
            if db.is_foreign_key_violation() {
                return Self::Conflict("Referenced record does not exist or is still in use".into());
            }
            if db.code().as_deref().and_then(|c| c.parse::<i32>().ok()).is_some_and(is_lock_contention) {
                tracing::warn!(error = %db, "write lock not acquired within the busy timeout");
                return Self::Busy;
            }
        }
        Self::Database(err)
    }
}

/// SQLITE_BUSY and SQLITE_LOCKED, including their extended codes.
fn is_lock_contention(code: i32) -> bool {
    matches!(code & 0xff, 5 | 6)
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errs
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                list.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: invalid ({})", field, e.code),
                })
            })
            .collect();
        messages.sort();
        Self::Validation(messages.join("; "))
    }
}

impl From<SkuError> for StoreError {
    fn from(err: SkuError) -> Self { Self::Validation(format!("sku: {}", err)) }
}

impl From<MoneyError> for StoreError {
    fn from(_: MoneyError) -> Self { Self::AmountOutOfRange }
}

impl From<OrderError> for StoreError {
    fn from(err: OrderError) -> Self { Self::InvalidTransition(err.to_string()) }
}

impl From<argon2::password_hash::Error> for StoreError {
    fn from(err: argon2::password_hash::Error) -> Self { Self::Internal(format!("password hashing failed: {}", err)) }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let (status, code) = self.code();
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "database error");
                "Internal server error".to_string()
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}
