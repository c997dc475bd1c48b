//! HTTP API tests against the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use shopfront_testing::InMemoryStorefront;
use shopfront_web::{AppState, CORRELATION_ID_HEADER, build_router};
use std::sync::Arc;
use tempfile::TempDir;

struct Harness {
    server: TestServer,
    store: Arc<InMemoryStorefront>,
    export_dir: TempDir,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryStorefront::seeded());
    let export_dir = tempfile::tempdir().unwrap();
    let state = AppState::new(store.clone(), export_dir.path());
    let server = TestServer::new(build_router(state)).unwrap();
    Harness {
        server,
        store,
        export_dir,
    }
}

#[tokio::test]
async fn test_welcome_and_health() {
    let h = harness();

    let response = h.server.get("/").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "Welcome to the Shopfront order API.");

    let health: Value = h.server.get("/health").await.json();
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn test_readiness_reflects_store() {
    let h = harness();
    h.server.get("/ready").await.assert_status_ok();

    h.store.set_unavailable(true);
    let response = h.server.get("/ready").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["database"], false);
}

#[tokio::test]
async fn test_every_response_carries_correlation_id() {
    let h = harness();
    let response = h.server.get("/recommendations/abc").await;
    assert!(!response.header(CORRELATION_ID_HEADER).is_empty());
}

#[tokio::test]
async fn test_recommendations_paginate() {
    let h = harness();

    let body: Value = h
        .server
        .get("/recommendations/3")
        .add_query_param("page", 1)
        .add_query_param("pageSize", 1)
        .await
        .json();

    assert_eq!(
        body,
        json!({
            "data": [{ "product_name": "Laptop", "price": "1200.00" }],
            "pagination": {
                "currentPage": 1,
                "pageSize": 1,
                "totalPages": 2,
                "totalResults": 2,
                "hasPrevPage": false,
                "hasNextPage": true
            }
        })
    );
}

#[tokio::test]
async fn test_recommendations_reject_bad_input() {
    let h = harness();

    let response = h.server.get("/recommendations/abc").await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["code"], "BAD_REQUEST");

    h.server
        .get("/recommendations/1")
        .add_query_param("page", 0)
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_high_value_users_sorted_by_spend() {
    let h = harness();

    let body: Value = h.server.get("/highvalueusers/1000").await.json();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();

    assert_eq!(names, ["Bob", "Alice"]);
    assert_eq!(body["data"][0]["total_value"], "3750.00");
    assert_eq!(body["pagination"]["totalResults"], 2);
}

#[tokio::test]
async fn test_high_value_users_reject_non_numeric_threshold() {
    let h = harness();
    h.server
        .get("/highvalueusers/lots")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_top_products() {
    let h = harness();

    let body: Value = h.server.get("/topproducts/1").await.json();
    assert_eq!(
        body,
        json!([{ "user_name": "Alice", "product_name": "Phone", "total_quantity": 2 }])
    );

    let body: Value = h.server.get("/topproducts/99").await.json();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_place_order_decrements_stock() {
    let h = harness();

    let response = h
        .server
        .post("/placeorder")
        .json(&json!({ "userId": 1, "productId": 1, "quantity": 10 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Order placed successfully");
    assert_eq!(body["remainingStock"], 90);
    assert_eq!(body["orderId"], 6);
    assert_eq!(h.store.product(1).await.unwrap().stock, 90);
}

#[tokio::test]
async fn test_place_order_insufficient_stock_is_server_error() {
    let h = harness();

    let response = h
        .server
        .post("/placeorder")
        .json(&json!({ "userId": 1, "productId": 1, "quantity": 150 }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(error.contains("Insufficient stock"));
    assert_eq!(h.store.product(1).await.unwrap().stock, 100);
    assert_eq!(h.store.order_count().await, 5);
}

#[tokio::test]
async fn test_place_order_rejects_malformed_body() {
    let h = harness();

    let response = h
        .server
        .post("/placeorder")
        .json(&json!({ "userId": 1, "productId": 1, "quantity": "ten" }))
        .await;
    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"],
        "Invalid input: userId, productId, and quantity must be integers"
    );

    h.server
        .post("/placeorder")
        .json(&json!({ "userId": 1, "productId": 1, "quantity": 0 }))
        .await
        .assert_status_bad_request();
    assert_eq!(h.store.order_count().await, 5);
}

#[tokio::test]
async fn test_export_streams_csv_and_writes_file() {
    let h = harness();

    let response = h
        .server
        .post("/export/highvalueusers")
        .add_query_param("value", 1000)
        .await;

    response.assert_status_ok();
    assert!(
        response
            .header("content-type")
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"highvalueusers.csv\""
    );

    let expected = "id,name,total_value\n2,Bob,3750.00\n1,Alice,2800.00\n";
    assert_eq!(response.text(), expected);

    let written = std::fs::read_to_string(h.export_dir.path().join("highvalueusers.csv")).unwrap();
    assert_eq!(written, expected);
}

#[tokio::test]
async fn test_concurrent_exports_return_their_own_rows() {
    let h = harness();

    let (all, top) = tokio::join!(
        async {
            h.server
                .post("/export/highvalueusers")
                .add_query_param("value", 1000)
                .await
        },
        async {
            h.server
                .post("/export/highvalueusers")
                .add_query_param("value", 3000)
                .await
        },
    );

    assert_eq!(
        all.text(),
        "id,name,total_value\n2,Bob,3750.00\n1,Alice,2800.00\n"
    );
    assert_eq!(top.text(), "id,name,total_value\n2,Bob,3750.00\n");

    let written = std::fs::read_to_string(h.export_dir.path().join("highvalueusers.csv")).unwrap();
    assert!(written == all.text() || written == top.text());
}

#[tokio::test]
async fn test_export_errors() {
    let h = harness();

    h.server
        .post("/export/bestsellers")
        .await
        .assert_status_bad_request();

    h.server
        .post("/export/recommendations")
        .await
        .assert_status_bad_request();

    let response = h
        .server
        .post("/export/highvalueusers")
        .add_query_param("value", 1_000_000)
        .await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"], "No results to export");
}

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let h = harness();
    h.store.set_unavailable(true);

    let response = h.server.get("/topproducts/1").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Error fetching"));
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
}
