//! Product catalog: the storefront listing and the admin CRUD.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::WriteTx;
use crate::domain::aggregates::inventory::SYSTEM_ACTOR;
use crate::domain::aggregates::product::{DEFAULT_MAX_STOCK_LEVEL, DEFAULT_MIN_STOCK_LEVEL};
use crate::domain::aggregates::Product;
use crate::domain::events::EventPublisher;
use crate::domain::value_objects::Money;
use crate::error::{Result, StoreError};
use crate::repository::product::{self as product_repo, ProductDetails, ProductFilter};
use crate::services::inventory::{self, MANUAL_ADJUSTMENT};

pub const INITIAL_STOCK: &str = "Estoque inicial";

pub async fn list_available(pool: &SqlitePool) -> Result<Vec<Product>> {
    Ok(product_repo::list_available(pool).await?)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Product> {
    product_repo::find_by_id(pool, id).await?.ok_or(StoreError::NotFound("Product"))
}

pub async fn list(pool: &SqlitePool, filter: &ProductFilter, limit: i64, offset: i64) -> Result<(Vec<Product>, i64)> {
    let rows = product_repo::list(pool, filter, limit, offset).await?;
    let total = product_repo::count(pool, filter).await?;
    Ok((rows, total))
}

pub async fn create(pool: &SqlitePool, events: &EventPublisher, details: &ProductDetails, initial_stock: i32, actor: &str) -> Result<Product> {
    if initial_stock < 0 { return Err(StoreError::InvalidQuantity("Stock quantity cannot be negative".into())); }
    let mut tx = WriteTx::begin(pool).await?;
    let product = product_repo::insert(&mut *tx, details, Utc::now()).await?;
    let mut pending = Vec::new();
    let product = if initial_stock > 0 {
        let update = inventory::apply_stock_change(&mut tx, product.id, initial_stock, INITIAL_STOCK, None, actor).await?;
        pending.extend(update.events);
        update.product
    } else {
        pending.extend(inventory::reconcile_alert(&mut tx, &product).await?);
        product
    };
    tx.commit().await?;
    tracing::info!(product_id = product.id, name = %product.name, stock = product.stock_quantity, "product created");
    events.publish_all(&pending).await;
    Ok(product)
}

/// Updates the product's details; a differing `stock_quantity` is booked as a
/// manual adjustment rather than written directly.
pub async fn update(
    pool: &SqlitePool,
    events: &EventPublisher,
    id: i64,
    details: &ProductDetails,
    stock_quantity: Option<i32>,
    actor: &str,
) -> Result<Product> {
    let mut tx = WriteTx::begin(pool).await?;
    let product = product_repo::update_details(&mut *tx, id, details, Utc::now()).await?.ok_or(StoreError::NotFound("Product"))?;
    let mut pending = Vec::new();
    let product = match stock_quantity {
        Some(target) if target < 0 => return Err(StoreError::InvalidQuantity("Stock quantity cannot be negative".into())),
        Some(target) if target != product.stock_quantity => {
            let update = inventory::apply_stock_change(&mut tx, id, target - product.stock_quantity, MANUAL_ADJUSTMENT, None, actor).await?;
            pending.extend(update.events);
            update.product
        }
        _ => {
            // thresholds may have moved even when stock did not
            pending.extend(inventory::reconcile_alert(&mut tx, &product).await?);
            product
        }
    };
    tx.commit().await?;
    tracing::info!(product_id = id, "product updated");
    events.publish_all(&pending).await;
    Ok(product)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let mut tx = WriteTx::begin(pool).await?;
    if product_repo::count_order_items(&mut *tx, id).await? > 0 {
        return Err(StoreError::Conflict("Product has order history and cannot be deleted".into()));
    }
    if !product_repo::delete(&mut *tx, id).await? {
        return Err(StoreError::NotFound("Product"));
    }
    tx.commit().await?;
    tracing::info!(product_id = id, "product deleted");
    Ok(())
}

fn starter(name: &str, description: &str, price: i64, image: &str, category: &str) -> ProductDetails {
    ProductDetails {
        name: name.into(),
        description: Some(description.into()),
        price: Money::from_cents(price),
        cost_price: Money::ZERO,
        image_url: Some(format!("https://images.unsplash.com/{}?w=300&h=300&fit=crop&auto=format", image)),
        category: Some(category.into()),
        min_stock_level: DEFAULT_MIN_STOCK_LEVEL,
        max_stock_level: DEFAULT_MAX_STOCK_LEVEL,
        supplier_id: None,
        supplier: None,
        sku: None,
    }
}

pub fn starter_catalog() -> Vec<ProductDetails> {
    vec![
        starter("Pomada Modeladora Premium", "Pomada de alta fixação para modelar cabelo e barba com acabamento natural", 3590, "photo-1585747860715-2ba37e788b70", "Pomadas"),
        starter("Óleo para Barba Artesanal", "Óleo natural para hidratação e crescimento da barba com fragrância amadeirada", 2850, "photo-1503454537195-1dcabb73ffb9", "Óleos"),
        starter("Shampoo Especializado", "Shampoo específico para cabelos masculinos com ação anti-caspa", 4200, "photo-1556228453-efd6c1ff04f6", "Shampoos"),
        starter("Cera Modeladora Forte", "Cera de fixação extra forte para penteados que duram o dia todo", 3190, "photo-1631729371254-42c2892f0e6e", "Ceras"),
        starter("Balm Pós-Barba", "Bálsamo calmante e hidratante para uso após o barbear", 2550, "photo-1620916566398-39f1143ab7be", "Pós-Barba"),
        starter("Kit Barbear Completo", "Kit com navalha, pincel, sabão e toalha para barbear tradicional", 8990, "photo-1493225457124-a3eb161ffa5f", "Kits"),
    ]
}

/// Seeds the starter catalog into an empty products table.
pub async fn seed(pool: &SqlitePool, events: &EventPublisher, initial_stock: i32) -> Result<usize> {
    if product_repo::count_all(pool).await? > 0 { return Ok(0); }
    let catalog = starter_catalog();
    for details in &catalog {
        create(pool, events, details, initial_stock, SYSTEM_ACTOR).await?;
    }
    tracing::info!(count = catalog.len(), "starter catalog created");
    Ok(catalog.len())
}
