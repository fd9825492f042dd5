//! HTTP handler for the dashboard summary

use axum::{extract::State, Json};
use chrono::Utc;
use shared::DashboardSummary;

use crate::error::AppResult;
use crate::AppState;

/// Aggregated catalog, alert and prediction overview
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardSummary>> {
    let summary = state.services.dashboard.summary(Utc::now()).await?;
    Ok(Json(summary))
}
