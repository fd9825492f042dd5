//! HTTP handlers proxying the ML forecasting service

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::external::ml_service::AnomalyReport;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TrainModelInput {
    pub product_id: Uuid,
    #[serde(default)]
    pub historical_data: Vec<Value>,
}

/// Submit training data. Returns immediately; the outcome is only logged.
pub async fn train_model(
    State(state): State<AppState>,
    Json(input): Json<TrainModelInput>,
) -> StatusCode {
    let client = state.ml_client.clone();
    tokio::spawn(async move {
        if let Err(e) = client
            .train_model(input.product_id, input.historical_data)
            .await
        {
            tracing::error!(product_id = %input.product_id, "Error training model: {}", e);
        }
    });
    StatusCode::ACCEPTED
}

#[derive(Debug, Deserialize)]
pub struct AnomalyInput {
    pub product_id: Uuid,
    #[serde(default)]
    pub recent_sales: Vec<f64>,
}

pub async fn detect_anomalies(
    State(state): State<AppState>,
    Json(input): Json<AnomalyInput>,
) -> Json<AnomalyReport> {
    let report = state
        .ml_client
        .detect_anomalies(input.product_id, &input.recent_sales)
        .await;
    Json(report)
}

#[derive(Debug, Deserialize)]
pub struct SeasonalAnalysisInput {
    #[serde(default)]
    pub sales_data: Vec<Value>,
}

pub async fn seasonal_analysis(
    State(state): State<AppState>,
    Json(input): Json<SeasonalAnalysisInput>,
) -> Json<Map<String, Value>> {
    Json(state.ml_client.seasonal_analysis(input.sales_data).await)
}
