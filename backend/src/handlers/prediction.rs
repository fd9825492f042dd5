//! HTTP handlers for stock predictions

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use shared::{ForecastResult, StockPrediction};
use uuid::Uuid;

use crate::error::AppResult;
use crate::AppState;

/// Stock position and forecast for one product
pub async fn get_prediction(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<StockPrediction>> {
    let prediction = state
        .services
        .predictions
        .predict_for_product(product_id, Utc::now().date_naive())
        .await?;
    Ok(Json(prediction))
}

/// Seasonality-weighted forecast for one product
pub async fn get_advanced_prediction(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ForecastResult>> {
    let forecast = state
        .services
        .predictions
        .advanced_forecast(product_id, Utc::now().date_naive())
        .await?;
    Ok(Json(forecast))
}

#[derive(Debug, Deserialize)]
pub struct UrgentQuery {
    pub limit: Option<usize>,
}

/// IMMEDIATE and HIGH urgency predictions, soonest stockout first
pub async fn get_urgent_predictions(
    State(state): State<AppState>,
    Query(query): Query<UrgentQuery>,
) -> AppResult<Json<Vec<StockPrediction>>> {
    let limit = query.limit.unwrap_or(state.config.dashboard.urgent_limit);
    let predictions = state
        .services
        .predictions
        .urgent_predictions(limit, Utc::now().date_naive())
        .await?;
    Ok(Json(predictions))
}
