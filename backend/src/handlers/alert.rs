//! HTTP handlers for alerts

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use shared::Alert;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::CycleOutcome;
use crate::AppState;

/// Unresolved alerts, newest first
pub async fn get_active_alerts(State(state): State<AppState>) -> AppResult<Json<Vec<Alert>>> {
    let alerts = state.services.alerts.active_alerts().await?;
    Ok(Json(alerts))
}

/// Unresolved HIGH severity alerts
pub async fn get_critical_alerts(State(state): State<AppState>) -> AppResult<Json<Vec<Alert>>> {
    let alerts = state.services.alerts.critical_alerts().await?;
    Ok(Json(alerts))
}

pub async fn get_product_alerts(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<Alert>>> {
    let alerts = state.services.alerts.alerts_for_product(product_id).await?;
    Ok(Json(alerts))
}

#[derive(Debug, Deserialize)]
pub struct ResolveAlertInput {
    pub resolved_by: String,
}

/// Resolve an alert
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    Json(input): Json<ResolveAlertInput>,
) -> AppResult<Json<Alert>> {
    let resolved_by = input.resolved_by.trim();
    if resolved_by.is_empty() {
        return Err(AppError::Validation {
            field: "resolved_by".to_string(),
            message: "Resolver is required".to_string(),
        });
    }

    let alert = state
        .services
        .alerts
        .resolve_alert(alert_id, resolved_by)
        .await?;
    Ok(Json(alert))
}

/// Run an alert generation cycle now, unless one is already running
pub async fn run_alert_cycle(State(state): State<AppState>) -> Json<CycleOutcome> {
    Json(state.scheduler.try_run(Utc::now()).await)
}
