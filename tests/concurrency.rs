mod common;

use std::path::PathBuf;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, SqlitePool};

use common::{product, send, state_with, stock_of};
use visage_storefront::db::{self, WriteTx};
use visage_storefront::services::inventory;
use visage_storefront::{build_app, StoreError};

/// On-disk database removed again when dropped.
struct TempDb(PathBuf);

impl TempDb {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("visage-{}.db", uuid::Uuid::new_v4())))
    }

    fn options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new().filename(&self.0).create_if_missing(true)
    }

    async fn pool(&self, max_connections: u32) -> SqlitePool {
        db::connect_with(self.options(), max_connections).await.unwrap()
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checkouts_all_succeed() {
    let file = TempDb::new();
    let state = state_with(file.pool(5).await).await;
    let app = build_app(state.clone());
    let pomada = product(&state, "Pomada Modeladora", 3590, 50).await;

    for i in 0..8 {
        let (status, _) = send(&app, Method::POST, &format!("/api/v1/cart/c{i}/items"), None, Some(json!({"product_id": pomada.id}))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let checkouts: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = json!({"customer_name": format!("Cliente {i}")});
                send(&app, Method::POST, &format!("/api/v1/checkout/c{i}"), None, Some(body)).await
            })
        })
        .collect();
    for handle in checkouts {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    assert_eq!(stock_of(&state, pomada.id).await, 42);
    let (movements, total) = inventory::movements(&state.db, Some(pomada.id), 20, 0).await.unwrap();
    assert_eq!(total, 9);
    assert_eq!(movements.iter().filter(|m| m.reference_id.is_some()).count(), 8);
    // every sale starts where the previous one ended
    let mut levels: Vec<_> = movements.iter().filter(|m| m.reference_id.is_some()).map(|m| m.old_quantity).collect();
    levels.sort_unstable();
    assert_eq!(levels, (43..=50).collect::<Vec<_>>());

    state.db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_lock_timeout_maps_to_busy() {
    let file = TempDb::new();
    let pool = file.pool(2).await;
    db::migrate(&pool).await.unwrap();

    let holder = WriteTx::begin(&pool).await.unwrap();
    let mut impatient = file.options().busy_timeout(Duration::ZERO).connect().await.unwrap();
    let err = sqlx::query("BEGIN IMMEDIATE").execute(&mut impatient).await.unwrap_err();
    let err = StoreError::from(err);
    assert!(matches!(err, StoreError::Busy), "{err:?}");

    holder.commit().await.unwrap();
    sqlx::query("BEGIN IMMEDIATE").execute(&mut impatient).await.unwrap();
    sqlx::query("ROLLBACK").execute(&mut impatient).await.unwrap();

    drop(impatient);
    pool.close().await;
}

#[tokio::test]
async fn test_dropped_write_tx_rolls_back() {
    let file = TempDb::new();
    let state = state_with(file.pool(1).await).await;
    let pomada = product(&state, "Pomada Modeladora", 3590, 10).await;

    {
        let mut tx = WriteTx::begin(&state.db).await.unwrap();
        sqlx::query("UPDATE products SET stock_quantity = 0 WHERE id = ?").bind(pomada.id).execute(&mut *tx).await.unwrap();
    }
    // the single connection only comes back once the rollback ran
    assert_eq!(stock_of(&state, pomada.id).await, 10);
    state.db.close().await;
}
