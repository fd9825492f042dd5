//! ML Forecasting Service Client
//!
//! Client for the external Python forecasting microservice. Every call is a
//! single attempt: no retries, bounded only by the client timeout.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::Product;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Forecast horizon requested from the ML service
pub const PREDICTION_DAYS_AHEAD: u32 = 30;

/// Method tag used when the ML service omits one
pub const DEFAULT_REMOTE_METHOD: &str = "ML_SERVICE";

/// Client for the ML forecasting microservice
#[derive(Clone)]
pub struct MlServiceClient {
    base_url: String,
    http_client: Client,
}

/// Request body for `POST /predict`
#[derive(Debug, Serialize)]
pub struct PredictRequest {
    pub product_id: Uuid,
    pub product_data: ProductData,
    pub days_ahead: u32,
}

/// Demand profile sent to the ML service
#[derive(Debug, Serialize)]
pub struct ProductData {
    pub avg_daily_sales: f64,
    pub sales_variability: f64,
    pub lead_time_days: i32,
    pub current_stock: i32,
    pub sale_price: Option<f64>,
    pub cost_price: Option<f64>,
}

impl PredictRequest {
    pub fn for_product(product: &Product, current_stock: i32) -> Self {
        Self {
            product_id: product.id,
            product_data: ProductData {
                avg_daily_sales: product.avg_daily_sales_or_default(),
                sales_variability: product.sales_variability_or_default(),
                lead_time_days: product.lead_time_or_default(),
                current_stock,
                sale_price: product.sale_price.to_f64(),
                cost_price: product.cost_price.to_f64(),
            },
            days_ahead: PREDICTION_DAYS_AHEAD,
        }
    }
}

/// Response from `POST /predict`
#[derive(Debug, Deserialize)]
pub struct MlPredictionResponse {
    #[serde(default)]
    pub product_id: Option<Value>,
    #[serde(default)]
    pub predictions: Vec<DailyPrediction>,
    pub summary: PredictionSummary,
    pub recommendations: OrderRecommendation,
    #[serde(default)]
    pub model_metrics: ModelMetrics,
}

/// One day of the predicted demand series
#[derive(Debug, Deserialize)]
pub struct DailyPrediction {
    pub predicted_demand: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct PredictionSummary {
    pub predicted_demand_7_days: f64,
    pub predicted_demand_30_days: f64,
    pub confidence_level: f64,
    #[serde(default)]
    pub days_until_stockout: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct OrderRecommendation {
    /// Accepted as any JSON number; rounded when mapped
    pub recommended_order_quantity: f64,
    pub recommended_order_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModelMetrics {
    #[serde(default)]
    pub method: Option<String>,
}

impl ModelMetrics {
    pub fn method_or_default(&self) -> &str {
        self.method.as_deref().unwrap_or(DEFAULT_REMOTE_METHOD)
    }
}

/// Response from `POST /anomaly`
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnomalyReport {
    #[serde(default)]
    pub anomaly_detected: bool,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl MlServiceClient {
    /// Create a new ML service client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> AppResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalService(format!(
                "{} returned {}: {}",
                path, status, body
            )));
        }

        Ok(response)
    }

    /// Request a demand prediction.
    ///
    /// `Ok(None)` means the service answered without a prediction (empty or
    /// `null` body).
    pub async fn predict(&self, request: &PredictRequest) -> AppResult<Option<MlPredictionResponse>> {
        let response = self.post_json("/predict", request).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to read response: {}", e)))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice::<Option<MlPredictionResponse>>(&body)
            .map_err(|e| AppError::ExternalService(format!("Failed to parse response: {}", e)))
    }

    /// Submit historical sales for model training
    pub async fn train_model(&self, product_id: Uuid, historical_data: Vec<Value>) -> AppResult<()> {
        let body = serde_json::json!({
            "product_id": product_id,
            "historical_data": historical_data,
        });

        self.post_json("/train", &body).await?;
        tracing::info!(%product_id, "Model trained successfully");
        Ok(())
    }

    /// Check recent sales for anomalies; failures read as "no anomaly"
    pub async fn detect_anomalies(&self, product_id: Uuid, recent_sales: &[f64]) -> AnomalyReport {
        let body = serde_json::json!({
            "product_id": product_id,
            "recent_sales": recent_sales,
        });

        let result = match self.post_json("/anomaly", &body).await {
            Ok(response) => response
                .json::<AnomalyReport>()
                .await
                .map_err(|e| AppError::ExternalService(format!("Failed to parse response: {}", e))),
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            tracing::error!(%product_id, "Error detecting anomalies: {}", e);
            AnomalyReport::default()
        })
    }

    /// Seasonality analysis over sales data; failures read as an empty analysis
    pub async fn seasonal_analysis(&self, sales_data: Vec<Value>) -> Map<String, Value> {
        let body = serde_json::json!({ "sales_data": sales_data });

        let result = match self.post_json("/seasonal_analysis", &body).await {
            Ok(response) => response
                .json::<Map<String, Value>>()
                .await
                .map_err(|e| AppError::ExternalService(format!("Failed to parse response: {}", e))),
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            tracing::error!("Error in seasonal analysis: {}", e);
            Map::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing_accepts_float_quantities() {
        let json = r#"{
            "product_id": 42,
            "predictions": [{"predicted_demand": 10.5, "date": "2026-01-01"}],
            "summary": {
                "predicted_demand_7_days": 70.0,
                "predicted_demand_30_days": 300.0,
                "confidence_level": 88.0,
                "days_until_stockout": 12
            },
            "recommendations": {
                "recommended_order_quantity": 175.0,
                "recommended_order_date": "2026-01-05"
            },
            "model_metrics": {"method": "PROPHET"}
        }"#;

        let response: MlPredictionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.predictions.len(), 1);
        assert!(response.predictions[0].extra.contains_key("date"));
        assert_eq!(response.summary.days_until_stockout, Some(12));
        assert_eq!(response.recommendations.recommended_order_quantity, 175.0);
        assert_eq!(response.model_metrics.method_or_default(), "PROPHET");
    }

    #[test]
    fn test_missing_method_uses_default() {
        assert_eq!(ModelMetrics::default().method_or_default(), DEFAULT_REMOTE_METHOD);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = MlServiceClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
