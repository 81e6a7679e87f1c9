//! Visage storefront
//!
//! Online shop for a barbershop and men's cosmetics brand.
//!
//! ## Features
//! - Product catalog with stock tracking
//! - Session carts and checkout into a WhatsApp order message
//! - Stock movement log and low-stock alerts
//! - Back-office for products, stock, suppliers and orders

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod notify;
pub mod repository;
pub mod services;

use std::sync::Arc;

use axum::{middleware, routing::{get, post}, Router};
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::domain::events::EventPublisher;

pub use error::{Result, StoreError};

#[derive(Clone)]
pub struct AppState { pub db: SqlitePool, pub events: EventPublisher, pub config: Arc<Config> }

pub fn build_app(state: AppState) -> Router {
    let admin = api::admin::routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), api::auth::require_admin));

    Router::new()
        .route("/health", get(api::health))
        .route("/api/v1/admin/login", post(api::auth::login))
        .merge(api::storefront::routes())
        .merge(admin)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
        .with_state(state)
}
