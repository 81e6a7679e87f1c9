#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower::ServiceExt;

use visage_storefront::config::Config;
use visage_storefront::domain::aggregates::Product;
use visage_storefront::domain::events::EventPublisher;
use visage_storefront::domain::value_objects::Money;
use visage_storefront::repository::product::ProductDetails;
use visage_storefront::services::{auth, catalog};
use visage_storefront::{build_app, db, AppState};

pub const ADMIN_PASSWORD: &str = "navalha123";

/// A single connection that never recycles, so the in-memory database lives
/// as long as the pool.
pub async fn state() -> AppState {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap().foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    state_with(pool).await
}

pub async fn state_with(pool: SqlitePool) -> AppState {
    db::migrate(&pool).await.unwrap();
    let config = Config { admin_password: Some(ADMIN_PASSWORD.into()), ..Config::default() };
    auth::ensure_admin(&pool, &config.admin_username, config.admin_password.as_deref()).await.unwrap();
    AppState { db: pool, events: EventPublisher::disabled(), config: Arc::new(config) }
}

pub async fn app() -> (Router, AppState) {
    let state = state().await;
    (build_app(state.clone()), state)
}

pub fn details(name: &str, price_cents: i64, min_stock_level: i32) -> ProductDetails {
    ProductDetails {
        name: name.into(),
        description: None,
        price: Money::from_cents(price_cents),
        cost_price: Money::from_cents(price_cents / 2),
        image_url: None,
        category: Some("Pomadas".into()),
        min_stock_level,
        max_stock_level: 100,
        supplier_id: None,
        supplier: None,
        sku: None,
    }
}

pub async fn product(state: &AppState, name: &str, price_cents: i64, stock: i32) -> Product {
    catalog::create(&state.db, &state.events, &details(name, price_cents, 5), stock, "Sistema").await.unwrap()
}

pub async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(json) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(json.to_string())).unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

pub async fn login(app: &Router) -> String {
    let body = serde_json::json!({ "username": "admin", "password": ADMIN_PASSWORD });
    let (status, json) = send(app, Method::POST, "/api/v1/admin/login", None, Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    json["token"].as_str().unwrap().to_string()
}

pub async fn stock_of(state: &AppState, id: i64) -> i32 {
    catalog::get(&state.db, id).await.unwrap().stock_quantity
}
