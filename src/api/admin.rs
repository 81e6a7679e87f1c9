//! Back-office endpoints. Every route here sits behind `require_admin`.

use axum::{extract::{Path, Query, State}, http::StatusCode, routing::{get, post}, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::api::{auth, non_blank, ListParams, PaginatedResponse};
use crate::domain::aggregates::product::{is_known_category, DEFAULT_MAX_STOCK_LEVEL, DEFAULT_MIN_STOCK_LEVEL};
use crate::domain::aggregates::{AdminSession, Order, OrderStatus, Product, StockAlert, StockMovement, Supplier};
use crate::domain::value_objects::{Money, Sku};
use crate::error::{Result, StoreError};
use crate::repository::product::{ProductDetails, ProductFilter};
use crate::repository::supplier::SupplierDetails;
use crate::services::{catalog, dashboard, inventory, orders, suppliers};
use crate::services::dashboard::Dashboard;
use crate::services::orders::{OrderChanges, OrderDetail};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/admin/logout", post(auth::logout))
        .route("/api/v1/admin/dashboard", get(get_dashboard))
        .route("/api/v1/admin/products", get(list_products).post(create_product))
        .route("/api/v1/admin/products/:id", get(get_product).put(update_product).delete(delete_product))
        .route("/api/v1/admin/products/:id/stock", post(adjust_stock))
        .route("/api/v1/admin/products/:id/movements", get(product_movements))
        .route("/api/v1/admin/stock/movements", get(list_movements))
        .route("/api/v1/admin/stock/alerts", get(list_alerts))
        .route("/api/v1/admin/orders", get(list_orders))
        .route("/api/v1/admin/orders/:id", get(get_order).put(update_order))
        .route("/api/v1/admin/suppliers", get(list_suppliers).post(create_supplier))
        .route("/api/v1/admin/suppliers/:id", get(get_supplier).put(update_supplier).delete(delete_supplier))
}

async fn get_dashboard(State(s): State<AppState>) -> Result<Json<Dashboard>> {
    Ok(Json(dashboard::load(&s.db).await?))
}

// Products

#[derive(Debug, Serialize)]
pub struct AdminProductView {
    #[serde(flatten)]
    pub product: Product,
    pub profit_margin: f64,
    pub is_low_stock: bool,
}

impl From<Product> for AdminProductView {
    fn from(product: Product) -> Self {
        Self { profit_margin: product.profit_margin(), is_low_stock: product.is_low_stock(), product }
    }
}

fn known_category(category: &str) -> std::result::Result<(), ValidationError> {
    if is_known_category(category) { Ok(()) } else { Err(ValidationError::new("unknown_category")) }
}

/// Prices are in centavos.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(length(min = 2, max = 200, message = "must be between 2 and 200 characters"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    // upper bounds mirror MAX_PRICE_CENTS
    #[validate(range(min = 1, max = 100_000_000, message = "must be between 1 and 100000000 centavos"))]
    pub price: i64,
    #[serde(default)]
    #[validate(range(min = 0, max = 100_000_000, message = "must be between 0 and 100000000 centavos"))]
    pub cost_price: i64,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    #[validate(custom = "known_category")]
    pub category: Option<String>,
    pub stock_quantity: Option<i32>,
    pub min_stock_level: Option<i32>,
    pub max_stock_level: Option<i32>,
    pub supplier_id: Option<i64>,
    #[validate(length(max = 100))]
    pub supplier: Option<String>,
    pub sku: Option<String>,
}

impl ProductForm {
    fn into_details(self) -> Result<(ProductDetails, Option<i32>)> {
        self.validate()?;
        let min_stock_level = self.min_stock_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL);
        let max_stock_level = self.max_stock_level.unwrap_or(DEFAULT_MAX_STOCK_LEVEL);
        if min_stock_level < 0 || max_stock_level < min_stock_level {
            return Err(StoreError::Validation("stock levels: expected 0 <= min_stock_level <= max_stock_level".into()));
        }
        let sku = match non_blank(self.sku) {
            Some(raw) => Some(Sku::parse(&raw)?.into_inner()),
            None => None,
        };
        let details = ProductDetails {
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
            price: Money::from_cents(self.price),
            cost_price: Money::from_cents(self.cost_price),
            image_url: non_blank(self.image_url),
            category: non_blank(self.category),
            min_stock_level,
            max_stock_level,
            supplier_id: self.supplier_id,
            supplier: non_blank(self.supplier),
            sku,
        };
        Ok((details, self.stock_quantity))
    }
}

async fn list_products(State(s): State<AppState>, Query(p): Query<ListParams>) -> Result<Json<PaginatedResponse<AdminProductView>>> {
    let filter = ProductFilter { search: non_blank(p.search.clone()), category: non_blank(p.category.clone()) };
    let (rows, total) = catalog::list(&s.db, &filter, p.limit(), p.offset()).await?;
    Ok(Json(PaginatedResponse::new(rows.into_iter().map(AdminProductView::from).collect(), total, &p)))
}

async fn get_product(State(s): State<AppState>, Path(id): Path<i64>) -> Result<Json<AdminProductView>> {
    Ok(Json(catalog::get(&s.db, id).await?.into()))
}

async fn create_product(
    State(s): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Json(form): Json<ProductForm>,
) -> Result<(StatusCode, Json<AdminProductView>)> {
    let (details, stock) = form.into_details()?;
    let product = catalog::create(&s.db, &s.events, &details, stock.unwrap_or(0), &admin.username).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

async fn update_product(
    State(s): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Path(id): Path<i64>,
    Json(form): Json<ProductForm>,
) -> Result<Json<AdminProductView>> {
    let (details, stock) = form.into_details()?;
    let product = catalog::update(&s.db, &s.events, id, &details, stock, &admin.username).await?;
    Ok(Json(product.into()))
}

async fn delete_product(State(s): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    catalog::delete(&s.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Stock

#[derive(Debug, Deserialize, Validate)]
pub struct StockAdjustRequest {
    pub change: i32,
    #[validate(length(max = 200))]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StockAdjustResponse { pub product: AdminProductView, pub movement: StockMovement }

async fn adjust_stock(
    State(s): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Path(id): Path<i64>,
    Json(r): Json<StockAdjustRequest>,
) -> Result<Json<StockAdjustResponse>> {
    r.validate()?;
    let update = inventory::adjust_stock(&s.db, &s.events, id, r.change, r.reason.as_deref(), &admin.username).await?;
    Ok(Json(StockAdjustResponse { product: update.product.into(), movement: update.movement }))
}

async fn product_movements(State(s): State<AppState>, Path(id): Path<i64>, Query(p): Query<ListParams>) -> Result<Json<PaginatedResponse<StockMovement>>> {
    let (rows, total) = inventory::movements(&s.db, Some(id), p.limit(), p.offset()).await?;
    Ok(Json(PaginatedResponse::new(rows, total, &p)))
}

async fn list_movements(State(s): State<AppState>, Query(p): Query<ListParams>) -> Result<Json<PaginatedResponse<StockMovement>>> {
    let (rows, total) = inventory::movements(&s.db, None, p.limit(), p.offset()).await?;
    Ok(Json(PaginatedResponse::new(rows, total, &p)))
}

async fn list_alerts(State(s): State<AppState>, Query(p): Query<ListParams>) -> Result<Json<Vec<StockAlert>>> {
    Ok(Json(inventory::alerts(&s.db, p.include_resolved.unwrap_or(false)).await?))
}

// Orders

async fn list_orders(State(s): State<AppState>, Query(p): Query<ListParams>) -> Result<Json<PaginatedResponse<Order>>> {
    let (rows, total) = orders::list(&s.db, p.status, p.limit(), p.offset()).await?;
    Ok(Json(PaginatedResponse::new(rows, total, &p)))
}

async fn get_order(State(s): State<AppState>, Path(id): Path<i64>) -> Result<Json<OrderDetail>> {
    Ok(Json(orders::get(&s.db, id).await?))
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderUpdateRequest {
    #[validate(length(min = 2, max = 100, message = "must be between 2 and 100 characters"))]
    pub customer_name: Option<String>,
    #[validate(length(max = 20))]
    pub customer_phone: Option<String>,
    pub status: Option<OrderStatus>,
}

async fn update_order(
    State(s): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Path(id): Path<i64>,
    Json(r): Json<OrderUpdateRequest>,
) -> Result<Json<OrderDetail>> {
    let r = OrderUpdateRequest {
        customer_name: r.customer_name.map(|n| n.trim().to_string()),
        customer_phone: r.customer_phone.map(|p| p.trim().to_string()),
        status: r.status,
    };
    r.validate()?;
    let changes = OrderChanges { customer_name: r.customer_name, customer_phone: r.customer_phone, status: r.status };
    Ok(Json(orders::update(&s.db, &s.events, id, changes, &admin.username).await?))
}

// Suppliers

fn default_active() -> bool { true }

#[derive(Debug, Deserialize, Validate)]
pub struct SupplierForm {
    #[validate(length(min = 2, max = 100, message = "must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 100))]
    pub contact_person: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl SupplierForm {
    fn into_details(self) -> Result<SupplierDetails> {
        let form = Self {
            name: self.name.trim().to_string(),
            contact_person: non_blank(self.contact_person),
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            is_active: self.is_active,
        };
        form.validate()?;
        Ok(SupplierDetails {
            name: form.name,
            contact_person: form.contact_person,
            email: form.email,
            phone: form.phone,
            address: form.address,
            is_active: form.is_active,
        })
    }
}

async fn list_suppliers(State(s): State<AppState>) -> Result<Json<Vec<Supplier>>> {
    Ok(Json(suppliers::list(&s.db).await?))
}

async fn get_supplier(State(s): State<AppState>, Path(id): Path<i64>) -> Result<Json<Supplier>> {
    Ok(Json(suppliers::get(&s.db, id).await?))
}

async fn create_supplier(State(s): State<AppState>, Json(form): Json<SupplierForm>) -> Result<(StatusCode, Json<Supplier>)> {
    let supplier = suppliers::create(&s.db, &form.into_details()?).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

async fn update_supplier(State(s): State<AppState>, Path(id): Path<i64>, Json(form): Json<SupplierForm>) -> Result<Json<Supplier>> {
    Ok(Json(suppliers::update(&s.db, id, &form.into_details()?).await?))
}

async fn delete_supplier(State(s): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    suppliers::delete(&s.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
