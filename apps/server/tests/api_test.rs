//! End-to-end tests driving the router in-memory, no socket.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use vendo_core::{Category, NewProduct};
use vendo_db::{Database, DbConfig};
use vendo_server::auth::JwtManager;
use vendo_server::{router, AppState};

async fn test_app() -> (Router, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let jwt = JwtManager::new("test-secret".to_string(), 3600);
    let app = router(AppState::new(db.clone(), jwt));
    (app, db)
}

async fn seed_product(db: &Database, name: &str, price_cents: i64, quantity: i64) -> i64 {
    db.products()
        .insert(&NewProduct {
            name: name.to_string(),
            price_cents,
            quantity,
            category: Category::Cake,
        })
        .await
        .unwrap()
        .id
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: &Router, uri: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
    request_json(app, "POST", uri, Some(body), token).await
}

async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, db: &Database) -> String {
    db.staff().create("admin", "secret").await.unwrap();
    let (status, body) = post_json(
        app,
        "/api/admin/login",
        json!({"username": "admin", "password": "secret"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _db) = test_app().await;

    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn catalog_groups_products_by_shelf() {
    let (app, db) = test_app().await;
    seed_product(&db, "Sando", 1500, 10).await;
    db.products()
        .insert(&NewProduct {
            name: "Ramune (Original)".to_string(),
            price_cents: 5500,
            quantity: 0,
            category: Category::Drink,
        })
        .await
        .unwrap();

    let (status, body) = get_json(&app, "/api/catalog").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["cakes"].as_array().unwrap().len(), 1);
    assert_eq!(body["cakes"][0]["name"], "Sando");
    assert_eq!(body["cakes"][0]["price_cents"], 1500);
    assert_eq!(body["cakes"][0]["price"], "Rs 15.00");
    assert_eq!(body["cakes"][0]["available"], true);

    assert_eq!(body["drinks"].as_array().unwrap().len(), 1);
    assert_eq!(body["drinks"][0]["available"], false);

    assert_eq!(
        body["denominations"],
        json!([1, 5, 10, 20, 25, 50, 100])
    );
}

#[tokio::test]
async fn purchase_happy_path() {
    let (app, db) = test_app().await;
    let id = seed_product(&db, "Pocky (Strawberry)", 3000, 10).await;

    let (status, body) = post_json(
        &app,
        "/api/purchase",
        json!({"product_id": id, "quantity": 2, "money_inserted": 100}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Purchase successful! Bought 2 Pocky (Strawberry)"
    );
    assert_eq!(body["change"], 40.0);
    assert_eq!(
        body["change_breakdown"],
        json!([
            {"denomination": 25, "count": 1},
            {"denomination": 10, "count": 1},
            {"denomination": 5, "count": 1}
        ])
    );
    assert_eq!(body["stock_left"], 8);
}

#[tokio::test]
async fn purchase_insufficient_funds() {
    let (app, db) = test_app().await;
    let id = seed_product(&db, "M&Ms", 5000, 10).await;

    let (status, body) = post_json(
        &app,
        "/api/purchase",
        json!({"product_id": id, "quantity": 2, "money_inserted": 50}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Insufficient funds. Need Rs 100.00");
    assert!(body.get("stock_left").is_none());

    // Nothing changed
    let product = db.products().get_by_id(id).await.unwrap().unwrap();
    assert_eq!(product.quantity, 10);
    assert_eq!(db.purchases().count().await.unwrap(), 0);
}

#[tokio::test]
async fn purchase_insufficient_stock() {
    let (app, db) = test_app().await;
    let id = seed_product(&db, "Motto", 2300, 3).await;

    let (_, body) = post_json(
        &app,
        "/api/purchase",
        json!({"product_id": id, "quantity": 5, "money_inserted": 100}),
        None,
    )
    .await;

    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Not enough stock. Only 3 left");
}

#[tokio::test]
async fn purchase_invalid_denomination() {
    let (app, db) = test_app().await;
    let id = seed_product(&db, "Biscrem", 2500, 10).await;

    for money in [json!(15), json!(20.5)] {
        let (_, body) = post_json(
            &app,
            "/api/purchase",
            json!({"product_id": id, "quantity": 1, "money_inserted": money}),
            None,
        )
        .await;

        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "Invalid denomination. Use: 1, 5, 10, 20, 25, 50, or 100"
        );
    }
}

#[tokio::test]
async fn purchase_unknown_product() {
    let (app, _db) = test_app().await;

    let (_, body) = post_json(
        &app,
        "/api/purchase",
        json!({"product_id": 999, "quantity": 1, "money_inserted": 100}),
        None,
    )
    .await;

    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Product 999 not found");
}

#[tokio::test]
async fn purchase_missing_fields_and_malformed_body() {
    let (app, _db) = test_app().await;

    let (status, body) = post_json(&app, "/api/purchase", json!({"quantity": 1}), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "product_id is required");

    // Wrongly-typed field never reaches the handler logic but still gets
    // the structured failure shape.
    let (status, body) = post_json(
        &app,
        "/api/purchase",
        json!({"product_id": "abc", "quantity": 1, "money_inserted": 100}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid request");
}

#[tokio::test]
async fn history_is_newest_first() {
    let (app, db) = test_app().await;
    let id = seed_product(&db, "Taiyaki (Red Bean)", 3500, 10).await;

    for quantity in [1, 2] {
        let (_, body) = post_json(
            &app,
            "/api/purchase",
            json!({"product_id": id, "quantity": quantity, "money_inserted": 100}),
            None,
        )
        .await;
        assert_eq!(body["success"], true);
    }

    let (status, body) = get_json(&app, "/api/history").await;
    assert_eq!(status, StatusCode::OK);

    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["quantity"], 2);
    assert_eq!(transactions[0]["product_name"], "Taiyaki (Red Bean)");
    assert_eq!(transactions[0]["total_price_cents"], 7000);
    assert_eq!(transactions[0]["stock_after"], 7);
    assert_eq!(transactions[1]["quantity"], 1);
}

#[tokio::test]
async fn admin_routes_require_token() {
    let (app, _db) = test_app().await;

    let (status, body) = request_json(&app, "GET", "/api/admin/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = post_json(
        &app,
        "/api/admin/products",
        json!({"name": "X", "price_cents": 100, "quantity": 1, "category": "cake"}),
        Some("not-a-real-token"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_login_rejects_bad_credentials() {
    let (app, db) = test_app().await;
    db.staff().create("admin", "secret").await.unwrap();

    let (status, body) = post_json(
        &app,
        "/api/admin/login",
        json!({"username": "admin", "password": "wrong"}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password.");
}

#[tokio::test]
async fn admin_can_manage_products() {
    let (app, db) = test_app().await;
    let token = login(&app, &db).await;

    // Create
    let (status, body) = post_json(
        &app,
        "/api/admin/products",
        json!({"name": "Calpico (Calpis)", "price_cents": 5000, "quantity": 10, "category": "drink"}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Product \"Calpico (Calpis)\" added successfully!");

    // List
    let (status, body) = request_json(&app, "GET", "/api/admin/products", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 1);
    let id = products[0]["id"].as_i64().unwrap();

    // Update price + stock
    let (status, body) = request_json(
        &app,
        "PUT",
        &format!("/api/admin/products/{id}"),
        Some(json!({"price_cents": 5500, "quantity": 4})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let product = db.products().get_by_id(id).await.unwrap().unwrap();
    assert_eq!(product.price_cents, 5500);
    assert_eq!(product.quantity, 4);

    // Delete
    let (status, body) = request_json(
        &app,
        "DELETE",
        &format!("/api/admin/products/{id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product \"Calpico (Calpis)\" deleted successfully!");
    assert!(db.products().get_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn admin_rejects_negative_values_without_mutation() {
    let (app, db) = test_app().await;
    let token = login(&app, &db).await;
    let id = seed_product(&db, "Water", 2500, 10).await;

    let (status, body) = request_json(
        &app,
        "PUT",
        &format!("/api/admin/products/{id}"),
        Some(json!({"price_cents": -100, "quantity": 5})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "price cannot be negative");

    // Neither field changed
    let product = db.products().get_by_id(id).await.unwrap().unwrap();
    assert_eq!(product.price_cents, 2500);
    assert_eq!(product.quantity, 10);
}

#[tokio::test]
async fn deleting_product_removes_its_history() {
    let (app, db) = test_app().await;
    let token = login(&app, &db).await;
    let id = seed_product(&db, "Coca Cola", 4500, 10).await;

    let (_, body) = post_json(
        &app,
        "/api/purchase",
        json!({"product_id": id, "quantity": 1, "money_inserted": 50}),
        None,
    )
    .await;
    assert_eq!(body["success"], true);

    let (status, _) = request_json(
        &app,
        "DELETE",
        &format!("/api/admin/products/{id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(&app, "/api/history").await;
    assert!(body["transactions"].as_array().unwrap().is_empty());
}
