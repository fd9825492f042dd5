//! HTTP surface tests against the in-memory store

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use stockcast_backend::create_app;
use stockcast_backend::repositories::InMemoryStore;
use tower::ServiceExt;
use uuid::Uuid;

async fn app_with_low_stock() -> (Router, Uuid) {
    let store = Arc::new(InMemoryStore::new());
    let p = common::product("API-1", 50, None);
    store.put_product(p.clone()).await;
    store.put_inventory(common::stock(p.id, Uuid::new_v4(), 5)).await;

    let state = common::seeded_state(store).await;
    (create_app(state), p.id)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_dashboard_endpoint() {
    let (app, _) = app_with_low_stock().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/dashboard", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_products"], 1);
    assert_eq!(body["average_stock_health"], 5.0);
}

#[tokio::test]
async fn test_prediction_endpoints() {
    let (app, product_id) = app_with_low_stock().await;

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/predictions/{}", product_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_stock"], 5);
    assert_eq!(body["urgency"], "IMMEDIATE");

    let (status, body) = send(&app, Method::GET, "/api/v1/predictions/urgent", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/predictions/{}/advanced", product_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction_method"], "HYBRID_ML_ARIMA");
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let (app, _) = app_with_low_stock().await;
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/predictions/{}", Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]["code"].is_string());
}

#[tokio::test]
async fn test_run_and_resolve_alert() {
    let (app, product_id) = app_with_low_stock().await;

    let (status, body) = send(&app, Method::POST, "/api/v1/alerts/run", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let (_, alerts) = send(&app, Method::GET, "/api/v1/alerts", None).await;
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["alert_type"], "LOW_STOCK");
    assert_eq!(alerts[0]["severity"], "MEDIUM");
    let alert_id = alerts[0]["id"].as_str().unwrap().to_string();

    let (_, for_product) = send(
        &app,
        Method::GET,
        &format!("/api/v1/alerts/product/{}", product_id),
        None,
    )
    .await;
    assert_eq!(for_product.as_array().unwrap().len(), 1);

    let (_, critical) = send(&app, Method::GET, "/api/v1/alerts/critical", None).await;
    assert!(critical.as_array().unwrap().is_empty());

    let (status, resolved) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/alerts/{}/resolve", alert_id),
        Some(json!({ "resolved_by": "warehouse-lead" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["resolved"], true);
    assert_eq!(resolved["resolved_by"], "warehouse-lead");

    let (_, remaining) = send(&app, Method::GET, "/api/v1/alerts", None).await;
    assert!(remaining.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_resolve_requires_resolver() {
    let (app, _) = app_with_low_stock().await;
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/alerts/{}/resolve", Uuid::new_v4()),
        Some(json!({ "resolved_by": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "resolved_by");
}

#[tokio::test]
async fn test_train_is_accepted_without_waiting() {
    let (app, _) = app_with_low_stock().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/ml/train",
        Some(json!({ "product_id": Uuid::new_v4(), "historical_data": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
}
