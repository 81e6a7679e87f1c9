//! JSON HTTP surface.
pub mod admin;
pub mod auth;
pub mod storefront;

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::OrderStatus;

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<OrderStatus>,
    pub include_resolved: Option<bool>,
}

impl ListParams {
    pub fn page(&self) -> u32 { self.page.unwrap_or(1).max(1) }
    pub fn per_page(&self) -> u32 { self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE) }
    pub fn limit(&self) -> i64 { self.per_page() as i64 }
    pub fn offset(&self) -> i64 { (self.page() as i64 - 1) * self.limit() }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> { pub data: Vec<T>, pub total: i64, pub page: u32, pub per_page: u32 }

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self { data, total, page: params.page(), per_page: params.per_page() }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "healthy", "service": "visage-storefront"}))
}

/// Trims a text field and maps blank input to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
