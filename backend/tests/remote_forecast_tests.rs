//! ML service client and remote forecast fallback tests

mod common;

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use shared::{DemandTrend, LOCAL_FORECAST_METHOD};
use stockcast_backend::config::ForecastConfig;
use stockcast_backend::external::MlServiceClient;
use stockcast_backend::forecast::ForecastSource;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
}

fn remote_config(server: &MockServer) -> ForecastConfig {
    ForecastConfig {
        ml_service_url: server.uri(),
        remote_enabled: true,
        request_timeout_secs: 2,
        seed: Some(common::TEST_SEED),
    }
}

fn prediction_body(days_until_stockout: Option<i64>) -> serde_json::Value {
    let predictions: Vec<_> = (0..30)
        .map(|day| json!({ "predicted_demand": if day < 7 { 10.0 } else { 13.0 }, "day": day }))
        .collect();

    json!({
        "product_id": 1,
        "predictions": predictions,
        "summary": {
            "predicted_demand_7_days": 70.0,
            "predicted_demand_30_days": 380.0,
            "confidence_level": 91.5,
            "days_until_stockout": days_until_stockout
        },
        "recommendations": {
            "recommended_order_quantity": 180,
            "recommended_order_date": "2026-06-20"
        },
        "model_metrics": { "method": "PROPHET" }
    })
}

// ============================================================================
// Forecast Source
// ============================================================================

#[tokio::test]
async fn test_remote_forecast_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(json!({
            "days_ahead": 30,
            "product_data": { "current_stock": 55, "lead_time_days": 7 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction_body(Some(12))))
        .expect(1)
        .mount(&server)
        .await;

    let source = ForecastSource::from_config(&remote_config(&server)).unwrap();
    assert!(source.is_remote());

    let product = common::product("ML-1", 10, None);
    let result = source.forecast(&product, 55, today()).await;

    assert_eq!(result.product_id, product.id);
    assert_eq!(result.prediction_method, "PROPHET");
    assert_eq!(result.predicted_demand_30_days, 380.0);
    assert_eq!(result.confidence_level, 91.5);
    assert_eq!(result.recommended_order_quantity, 180);
    assert_eq!(
        result.recommended_order_date,
        NaiveDate::from_ymd_opt(2026, 6, 20).unwrap()
    );
    assert_eq!(result.estimated_stockout_risk, 60.0);
    assert_eq!(result.demand_trend, DemandTrend::Increasing);
}

#[tokio::test]
async fn test_missing_days_until_stockout_means_no_risk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction_body(None)))
        .mount(&server)
        .await;

    let source = ForecastSource::from_config(&remote_config(&server)).unwrap();
    let result = source
        .forecast(&common::product("ML-2", 10, None), 55, today())
        .await;

    assert_eq!(result.estimated_stockout_risk, 0.0);
}

#[tokio::test]
async fn test_server_error_falls_back_to_local() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .expect(1)
        .mount(&server)
        .await;

    let source = ForecastSource::from_config(&remote_config(&server)).unwrap();
    let result = source
        .forecast(&common::product("ML-3", 10, None), 55, today())
        .await;

    assert_eq!(result.prediction_method, LOCAL_FORECAST_METHOD);
}

#[tokio::test]
async fn test_empty_body_falls_back_to_local() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let source = ForecastSource::from_config(&remote_config(&server)).unwrap();
    let result = source
        .forecast(&common::product("ML-4", 10, None), 55, today())
        .await;

    assert_eq!(result.prediction_method, LOCAL_FORECAST_METHOD);
}

#[tokio::test]
async fn test_malformed_body_falls_back_to_local() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let source = ForecastSource::from_config(&remote_config(&server)).unwrap();
    let result = source
        .forecast(&common::product("ML-5", 10, None), 55, today())
        .await;

    assert_eq!(result.prediction_method, LOCAL_FORECAST_METHOD);
}

#[tokio::test]
async fn test_unreachable_service_falls_back_to_local() {
    let config = ForecastConfig {
        ml_service_url: "http://127.0.0.1:9".to_string(),
        remote_enabled: true,
        request_timeout_secs: 1,
        seed: Some(common::TEST_SEED),
    };

    let source = ForecastSource::from_config(&config).unwrap();
    let result = source
        .forecast(&common::product("ML-6", 10, None), 55, today())
        .await;

    assert_eq!(result.prediction_method, LOCAL_FORECAST_METHOD);
}

// ============================================================================
// Auxiliary Endpoints
// ============================================================================

#[tokio::test]
async fn test_anomaly_detection_passthrough() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/anomaly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "anomaly_detected": true,
            "score": 3.2
        })))
        .mount(&server)
        .await;

    let client = MlServiceClient::new(server.uri(), Duration::from_secs(2)).unwrap();
    let report = client.detect_anomalies(Uuid::new_v4(), &[10.0, 11.0, 90.0]).await;

    assert!(report.anomaly_detected);
    assert_eq!(report.details.get("score"), Some(&json!(3.2)));
}

#[tokio::test]
async fn test_anomaly_detection_failure_reads_as_no_anomaly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/anomaly"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = MlServiceClient::new(server.uri(), Duration::from_secs(2)).unwrap();
    let report = client.detect_anomalies(Uuid::new_v4(), &[1.0]).await;

    assert!(!report.anomaly_detected);
    assert!(report.details.is_empty());
}

#[tokio::test]
async fn test_seasonal_analysis_failure_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/seasonal_analysis"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = MlServiceClient::new(server.uri(), Duration::from_secs(2)).unwrap();
    let analysis = client.seasonal_analysis(vec![json!({"month": 1, "sales": 100})]).await;

    assert!(analysis.is_empty());
}

#[tokio::test]
async fn test_train_model_surfaces_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/train"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let client = MlServiceClient::new(server.uri(), Duration::from_secs(2)).unwrap();
    assert!(client.train_model(Uuid::new_v4(), vec![]).await.is_err());
}
