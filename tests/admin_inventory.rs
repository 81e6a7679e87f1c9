mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{app, details, login, product, send, stock_of};
use visage_storefront::services::{catalog, inventory};

#[tokio::test]
async fn test_admin_routes_require_a_session() {
    let (app, _) = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/admin/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    let (status, _) = send(&app, Method::GET, "/api/v1/admin/products", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::POST, "/api/v1/admin/login", None, Some(json!({"username": "admin", "password": "wrong-pass"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
    let (status, unknown) = send(&app, Method::POST, "/api/v1/admin/login", None, Some(json!({"username": "barbeiro", "password": "wrong-pass"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, body);

    let token = login(&app).await;
    let (status, _) = send(&app, Method::GET, "/api/v1/admin/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::POST, "/api/v1/admin/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, "/api/v1/admin/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stock_adjustments_drive_alerts() {
    let (app, state) = app().await;
    let token = login(&app).await;

    let form = json!({"name": "Shampoo Especializado", "price": 4200, "cost_price": 2100, "category": "Shampoos", "stock_quantity": 3, "sku": "sh-01"});
    let (status, created) = send(&app, Method::POST, "/api/v1/admin/products", Some(&token), Some(form)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["stock_quantity"], 3);
    assert_eq!(created["in_stock"], true);
    assert_eq!(created["is_low_stock"], true);
    assert_eq!(created["sku"], "SH-01");
    assert_eq!(created["profit_margin"], 50.0);
    let id = created["id"].as_i64().unwrap();

    let (_, movements) = send(&app, Method::GET, &format!("/api/v1/admin/products/{id}/movements"), Some(&token), None).await;
    assert_eq!(movements["total"], 1);
    assert_eq!(movements["data"][0]["movement_type"], "increase");
    assert_eq!(movements["data"][0]["reason"], "Estoque inicial");
    assert_eq!(movements["data"][0]["created_by"], "admin");

    let (_, alerts) = send(&app, Method::GET, "/api/v1/admin/stock/alerts", Some(&token), None).await;
    assert_eq!(alerts.as_array().unwrap().len(), 1);
    assert_eq!(alerts[0]["alert_type"], "low_stock");

    // restock resolves the alert
    let (status, adjusted) = send(&app, Method::POST, &format!("/api/v1/admin/products/{id}/stock"), Some(&token), Some(json!({"change": 10, "reason": "Compra fornecedor"}))).await;
    assert_eq!(status, StatusCode::OK, "{adjusted}");
    assert_eq!(adjusted["product"]["stock_quantity"], 13);
    assert_eq!(adjusted["movement"]["old_quantity"], 3);
    assert_eq!(adjusted["movement"]["new_quantity"], 13);
    let (_, open) = send(&app, Method::GET, "/api/v1/admin/stock/alerts", Some(&token), None).await;
    assert!(open.as_array().unwrap().is_empty());
    let (_, all) = send(&app, Method::GET, "/api/v1/admin/stock/alerts?include_resolved=true", Some(&token), None).await;
    assert_eq!(all[0]["is_resolved"], true);
    assert_eq!(all[0]["resolution_note"], "Estoque reposto: 13 unidades");

    // emptying the shelf raises an out-of-stock alert
    let (_, adjusted) = send(&app, Method::POST, &format!("/api/v1/admin/products/{id}/stock"), Some(&token), Some(json!({"change": -13}))).await;
    assert_eq!(adjusted["product"]["in_stock"], false);
    assert_eq!(adjusted["movement"]["reason"], "Ajuste manual");
    assert_eq!(adjusted["movement"]["quantity"], 13);
    let (_, open) = send(&app, Method::GET, "/api/v1/admin/stock/alerts", Some(&token), None).await;
    assert_eq!(open[0]["alert_type"], "out_of_stock");

    let (status, body) = send(&app, Method::POST, &format!("/api/v1/admin/products/{id}/stock"), Some(&token), Some(json!({"change": -1}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "insufficient_stock");
    let (status, body) = send(&app, Method::POST, &format!("/api/v1/admin/products/{id}/stock"), Some(&token), Some(json!({"change": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_quantity");

    // a small restock re-types the open alert instead of opening a second one
    send(&app, Method::POST, &format!("/api/v1/admin/products/{id}/stock"), Some(&token), Some(json!({"change": 2}))).await;
    let (_, open) = send(&app, Method::GET, "/api/v1/admin/stock/alerts", Some(&token), None).await;
    assert_eq!(open.as_array().unwrap().len(), 1);
    assert_eq!(open[0]["alert_type"], "low_stock");

    let (_, global) = send(&app, Method::GET, "/api/v1/admin/stock/movements?per_page=2", Some(&token), None).await;
    assert_eq!(global["total"], 4);
    assert_eq!(global["data"].as_array().unwrap().len(), 2);
    assert_eq!(global["data"][0]["new_quantity"], 2);
    assert_eq!(stock_of(&state, id).await, 2);
}

#[tokio::test]
async fn test_product_update_books_stock_difference() {
    let (app, state) = app().await;
    let token = login(&app).await;
    let pomada = product(&state, "Pomada Modeladora", 3590, 10).await;

    let form = json!({"name": "Pomada Modeladora Matte", "price": 3990, "category": "Pomadas", "stock_quantity": 25, "in_stock": false});
    let (status, updated) = send(&app, Method::PUT, &format!("/api/v1/admin/products/{}", pomada.id), Some(&token), Some(form)).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["name"], "Pomada Modeladora Matte");
    assert_eq!(updated["stock_quantity"], 25);
    assert_eq!(updated["in_stock"], true);

    let (movements, _) = inventory::movements(&state.db, Some(pomada.id), 10, 0).await.unwrap();
    assert_eq!(movements[0].reason.as_deref(), Some("Ajuste manual"));
    assert_eq!(movements[0].quantity, 15);

    let bad = json!({"name": "Pomada", "price": 3990, "category": "Perfumes"});
    let (status, body) = send(&app, Method::PUT, &format!("/api/v1/admin/products/{}", pomada.id), Some(&token), Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (_, listed) = send(&app, Method::GET, "/api/v1/admin/products?search=matte", Some(&token), None).await;
    assert_eq!(listed["total"], 1);
    let (_, listed) = send(&app, Method::GET, "/api/v1/admin/products?category=Kits", Some(&token), None).await;
    assert_eq!(listed["total"], 0);
}

#[tokio::test]
async fn test_threshold_change_reconciles_alerts() {
    let (app, state) = app().await;
    let token = login(&app).await;
    let pomada = product(&state, "Pomada Modeladora", 3590, 10).await;
    let uri = format!("/api/v1/admin/products/{}", pomada.id);
    let (_, open) = send(&app, Method::GET, "/api/v1/admin/stock/alerts", Some(&token), None).await;
    assert!(open.as_array().unwrap().is_empty());

    // raising the minimum above the shelf opens an alert without any movement
    let form = json!({"name": "Pomada Modeladora", "price": 3590, "category": "Pomadas", "min_stock_level": 20});
    let (status, updated) = send(&app, Method::PUT, &uri, Some(&token), Some(form)).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["is_low_stock"], true);
    let (_, open) = send(&app, Method::GET, "/api/v1/admin/stock/alerts", Some(&token), None).await;
    assert_eq!(open.as_array().unwrap().len(), 1);
    assert_eq!(open[0]["alert_type"], "low_stock");
    assert_eq!(open[0]["product_id"], pomada.id);

    let form = json!({"name": "Pomada Modeladora", "price": 3590, "category": "Pomadas", "min_stock_level": 5});
    send(&app, Method::PUT, &uri, Some(&token), Some(form)).await;
    let (_, open) = send(&app, Method::GET, "/api/v1/admin/stock/alerts", Some(&token), None).await;
    assert!(open.as_array().unwrap().is_empty());
    let (_, all) = send(&app, Method::GET, "/api/v1/admin/stock/alerts?include_resolved=true", Some(&token), None).await;
    assert_eq!(all[0]["is_resolved"], true);

    let (_, total) = inventory::movements(&state.db, Some(pomada.id), 10, 0).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(stock_of(&state, pomada.id).await, 10);
}

#[tokio::test]
async fn test_product_update_can_clear_image() {
    let (app, state) = app().await;
    let token = login(&app).await;
    let pomada = product(&state, "Pomada Modeladora", 3590, 10).await;
    let uri = format!("/api/v1/admin/products/{}", pomada.id);

    let form = json!({"name": "Pomada Modeladora", "price": 3590, "image_url": "/static/uploads/pomada.jpg"});
    let (_, updated) = send(&app, Method::PUT, &uri, Some(&token), Some(form)).await;
    assert_eq!(updated["image_url"], "/static/uploads/pomada.jpg");

    let form = json!({"name": "Pomada Modeladora", "price": 3590, "image_url": ""});
    let (status, updated) = send(&app, Method::PUT, &uri, Some(&token), Some(form)).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert!(updated["image_url"].is_null());
}

#[tokio::test]
async fn test_prices_are_bounded() {
    let (app, _) = app().await;
    let token = login(&app).await;

    for price in [0, 100_000_001, i64::MAX / 2] {
        let form = json!({"name": "Kit Barbear", "price": price, "category": "Kits", "stock_quantity": 5});
        let (status, body) = send(&app, Method::POST, "/api/v1/admin/products", Some(&token), Some(form)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{price}");
        assert_eq!(body["error"], "validation_error");
    }
    let form = json!({"name": "Kit Barbear", "price": 3000, "cost_price": -5, "category": "Kits"});
    let (status, _) = send(&app, Method::POST, "/api/v1/admin/products", Some(&token), Some(form)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let form = json!({"name": "Kit Barbear", "price": 100_000_000, "cost_price": 100_000_000, "category": "Kits", "stock_quantity": 1_000_000});
    let (status, created) = send(&app, Method::POST, "/api/v1/admin/products", Some(&token), Some(form)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let id = created["id"].as_i64().unwrap();

    send(&app, Method::POST, "/api/v1/cart/vip/items", None, Some(json!({"product_id": id, "quantity": 99}))).await;
    let (status, view) = send(&app, Method::GET, "/api/v1/cart/vip", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["total"], 99 * 100_000_000_i64);

    let (_, dash) = send(&app, Method::GET, "/api/v1/admin/dashboard", Some(&token), None).await;
    assert_eq!(dash["stock_value"], 1_000_000 * 100_000_000_i64);
}

#[tokio::test]
async fn test_oversized_stored_amounts_are_rejected_cleanly() {
    let (app, state) = app().await;
    let token = login(&app).await;
    // written below the HTTP layer, so no form validation applies
    let huge = catalog::create(&state.db, &state.events, &details("Navalha Ouro", i64::MAX / 2, 1), 10, "Sistema").await.unwrap();

    send(&app, Method::POST, "/api/v1/cart/big/items", None, Some(json!({"product_id": huge.id, "quantity": 3}))).await;
    let (status, body) = send(&app, Method::GET, "/api/v1/cart/big", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "amount_out_of_range");

    let (status, body) = send(&app, Method::POST, "/api/v1/checkout/big", None, Some(json!({"customer_name": "Maria"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "amount_out_of_range");
    assert_eq!(stock_of(&state, huge.id).await, 10);

    let (status, dash) = send(&app, Method::GET, "/api/v1/admin/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["total_orders"], 0);
    assert!(dash["stock_value"].as_i64().unwrap() > 0);
}

async fn place_order(app: &axum::Router, product_id: i64, quantity: i32) -> i64 {
    send(app, Method::POST, "/api/v1/cart/buyer/items", None, Some(json!({"product_id": product_id, "quantity": quantity}))).await;
    let (status, receipt) = send(app, Method::POST, "/api/v1/checkout/buyer", None, Some(json!({"customer_name": "Carlos"}))).await;
    assert_eq!(status, StatusCode::CREATED, "{receipt}");
    receipt["order"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_cancelling_an_order_restocks() {
    let (app, state) = app().await;
    let token = login(&app).await;
    let kit = product(&state, "Kit Barbear Completo", 8990, 10).await;
    let order_id = place_order(&app, kit.id, 3).await;
    assert_eq!(stock_of(&state, kit.id).await, 7);

    let uri = format!("/api/v1/admin/orders/{order_id}");
    let (status, detail) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["status_label"], "Pendente");
    assert_eq!(detail["items"][0]["product_name"], "Kit Barbear Completo");

    let (_, detail) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({"status": "confirmed", "customer_phone": "19 98888-7777"}))).await;
    assert_eq!(detail["status"], "confirmed");
    assert_eq!(detail["customer_phone"], "19 98888-7777");
    assert_eq!(stock_of(&state, kit.id).await, 7);

    let (status, detail) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({"status": "cancelled"}))).await;
    assert_eq!(status, StatusCode::OK, "{detail}");
    assert_eq!(stock_of(&state, kit.id).await, 10);
    let (movements, _) = inventory::movements(&state.db, Some(kit.id), 1, 0).await.unwrap();
    assert_eq!(movements[0].reason.as_deref(), Some(format!("Cancelamento - Pedido #{order_id}").as_str()));
    assert_eq!(movements[0].created_by, "admin");

    let (status, body) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({"status": "pending"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_transition");
    // cancelling again does not restock twice
    send(&app, Method::PUT, &uri, Some(&token), Some(json!({"status": "cancelled"}))).await;
    assert_eq!(stock_of(&state, kit.id).await, 10);

    let (_, listed) = send(&app, Method::GET, "/api/v1/admin/orders?status=cancelled", Some(&token), None).await;
    assert_eq!(listed["total"], 1);
    let (_, listed) = send(&app, Method::GET, "/api/v1/admin/orders?status=pending", Some(&token), None).await;
    assert_eq!(listed["total"], 0);
}

#[tokio::test]
async fn test_product_delete_rules() {
    let (app, state) = app().await;
    let token = login(&app).await;
    let sold = product(&state, "Óleo para Barba", 2850, 10).await;
    let unsold = product(&state, "Cera Forte", 3190, 4).await;
    place_order(&app, sold.id, 1).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/admin/products/{}", sold.id), Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/admin/products/{}", unsold.id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/api/v1/admin/products/{}", unsold.id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // the movement log keeps the deleted product's history
    let (rows, _) = inventory::movements(&state.db, None, 100, 0).await.unwrap();
    assert!(rows.iter().any(|m| m.product_id == unsold.id));
    let alerts = inventory::alerts(&state.db, true).await.unwrap();
    assert!(alerts.iter().all(|a| a.product_id != unsold.id));
}

#[tokio::test]
async fn test_suppliers_crud() {
    let (app, state) = app().await;
    let token = login(&app).await;

    let (status, body) = send(&app, Method::POST, "/api/v1/admin/suppliers", Some(&token), Some(json!({"name": "Barber Supply", "email": "invalid"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, supplier) = send(&app, Method::POST, "/api/v1/admin/suppliers", Some(&token), Some(json!({"name": "Barber Supply", "email": "vendas@barber.com.br", "phone": "19 3333-4444"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(supplier["is_active"], true);
    let id = supplier["id"].as_i64().unwrap();
    let uri = format!("/api/v1/admin/suppliers/{id}");

    let (_, updated) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({"name": "Barber Supply Ltda", "is_active": false}))).await;
    assert_eq!(updated["name"], "Barber Supply Ltda");
    assert_eq!(updated["is_active"], false);
    assert!(updated["email"].is_null());

    let form = json!({"name": "Pomada", "price": 3000, "category": "Pomadas", "supplier_id": id});
    let (status, linked) = send(&app, Method::POST, "/api/v1/admin/products", Some(&token), Some(form)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, listed) = send(&app, Method::GET, "/api/v1/admin/suppliers", Some(&token), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let product_id = linked["id"].as_i64().unwrap();
    let product = visage_storefront::services::catalog::get(&state.db, product_id).await.unwrap();
    assert_eq!(product.supplier_id, None);
}

#[tokio::test]
async fn test_dashboard_totals() {
    let (app, state) = app().await;
    let token = login(&app).await;
    let pomada = product(&state, "Pomada Modeladora", 3590, 10).await;
    product(&state, "Cera Forte", 3190, 0).await;
    place_order(&app, pomada.id, 2).await;

    let (status, dash) = send(&app, Method::GET, "/api/v1/admin/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["total_products"], 2);
    assert_eq!(dash["products_in_stock"], 1);
    assert_eq!(dash["low_stock_products"], 1);
    assert_eq!(dash["total_orders"], 1);
    assert_eq!(dash["pending_orders"], 1);
    assert_eq!(dash["open_alerts"], 1);
    // 8 units at a cost of 1795
    assert_eq!(dash["stock_value"], 8 * 1795);
    assert_eq!(dash["recent_orders"].as_array().unwrap().len(), 1);
}
