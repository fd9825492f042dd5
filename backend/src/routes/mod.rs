//! Route definitions for the Stockcast API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .nest("/predictions", prediction_routes())
        .nest("/alerts", alert_routes())
        .nest("/ml", ml_routes())
}

fn prediction_routes() -> Router<AppState> {
    Router::new()
        .route("/urgent", get(handlers::get_urgent_predictions))
        .route("/:product_id", get(handlers::get_prediction))
        .route("/:product_id/advanced", get(handlers::get_advanced_prediction))
}

fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_active_alerts))
        .route("/critical", get(handlers::get_critical_alerts))
        .route("/run", post(handlers::run_alert_cycle))
        .route("/product/:product_id", get(handlers::get_product_alerts))
        .route("/:id/resolve", put(handlers::resolve_alert))
}

fn ml_routes() -> Router<AppState> {
    Router::new()
        .route("/train", post(handlers::train_model))
        .route("/anomaly", post(handlers::detect_anomalies))
        .route("/seasonal-analysis", post(handlers::seasonal_analysis))
}
