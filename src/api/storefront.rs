//! Public shop endpoints: catalog, cart and checkout.

use axum::{extract::{Path, State}, http::StatusCode, routing::{get, post, put}, Json, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::non_blank;
use crate::domain::aggregates::{Cart, CartItem, Product};
use crate::domain::value_objects::Money;
use crate::error::Result;
use crate::services::{cart, catalog, checkout::{self, CheckoutReceipt, Customer}};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/:id", get(get_product))
        .route("/api/v1/sessions", post(new_session))
        .route("/api/v1/cart/:session", get(get_cart).delete(clear_cart))
        .route("/api/v1/cart/:session/count", get(cart_count))
        .route("/api/v1/cart/:session/items", post(add_to_cart))
        .route("/api/v1/cart/:session/items/:id", put(update_cart_item).delete(remove_cart_item))
        .route("/api/v1/checkout/:session", post(checkout_cart))
}

/// Shop-facing product view; cost and supplier data stay in the back-office.
#[derive(Debug, Serialize)]
pub struct CatalogProduct {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub image_url: String,
    pub category: Option<String>,
    pub in_stock: bool,
    pub stock_quantity: i32,
}

impl From<Product> for CatalogProduct {
    fn from(p: Product) -> Self {
        Self {
            image_url: p.display_image_url().to_string(),
            id: p.id, name: p.name, description: p.description, price: p.price,
            category: p.category, in_stock: p.in_stock, stock_quantity: p.stock_quantity,
        }
    }
}

async fn list_products(State(s): State<AppState>) -> Result<Json<Vec<CatalogProduct>>> {
    let products = catalog::list_available(&s.db).await?;
    Ok(Json(products.into_iter().map(CatalogProduct::from).collect()))
}

async fn get_product(State(s): State<AppState>, Path(id): Path<i64>) -> Result<Json<CatalogProduct>> {
    Ok(Json(catalog::get(&s.db, id).await?.into()))
}

async fn new_session() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::CREATED, Json(serde_json::json!({ "session_id": cart::new_session_id() })))
}

async fn get_cart(State(s): State<AppState>, Path(session): Path<String>) -> Result<Json<Cart>> {
    cart::check_session_id(&session)?;
    Ok(Json(cart::view(&s.db, &session).await?))
}

async fn cart_count(State(s): State<AppState>, Path(session): Path<String>) -> Result<Json<serde_json::Value>> {
    cart::check_session_id(&session)?;
    let count = cart::count(&s.db, &session).await?;
    Ok(Json(serde_json::json!({ "count": count })))
}

#[derive(Debug, Deserialize)] pub struct AddToCartRequest { pub product_id: i64, pub quantity: Option<i32> }
#[derive(Debug, Deserialize)] pub struct UpdateCartRequest { pub quantity: i32 }

async fn add_to_cart(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<AddToCartRequest>) -> Result<(StatusCode, Json<CartItem>)> {
    cart::check_session_id(&session)?;
    let item = cart::add(&s.db, &session, r.product_id, r.quantity).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_cart_item(State(s): State<AppState>, Path((session, id)): Path<(String, i64)>, Json(r): Json<UpdateCartRequest>) -> Result<Json<CartItem>> {
    cart::check_session_id(&session)?;
    Ok(Json(cart::update(&s.db, &session, id, r.quantity).await?))
}

async fn remove_cart_item(State(s): State<AppState>, Path((session, id)): Path<(String, i64)>) -> Result<StatusCode> {
    cart::check_session_id(&session)?;
    cart::remove(&s.db, &session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_cart(State(s): State<AppState>, Path(session): Path<String>) -> Result<StatusCode> {
    cart::check_session_id(&session)?;
    cart::clear(&s.db, &session).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 2, max = 100, message = "must be between 2 and 100 characters"))]
    pub customer_name: String,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub customer_phone: Option<String>,
}

impl CheckoutRequest {
    fn normalized(self) -> Self {
        Self { customer_name: self.customer_name.trim().to_string(), customer_phone: non_blank(self.customer_phone) }
    }
}

async fn checkout_cart(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<CheckoutRequest>) -> Result<(StatusCode, Json<CheckoutReceipt>)> {
    cart::check_session_id(&session)?;
    let r = r.normalized();
    r.validate()?;
    let customer = Customer { name: &r.customer_name, phone: r.customer_phone.as_deref() };
    let receipt = checkout::checkout(&s.db, &s.events, &s.config.whatsapp_number, &session, customer).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
