//! ML service backed forecasts

use std::collections::BTreeMap;

use chrono::NaiveDate;
use shared::{DemandTrend, ForecastResult, Product};

use crate::external::ml_service::{MlPredictionResponse, PredictRequest};
use crate::external::MlServiceClient;

/// Data points needed on each side of the trend comparison
const TREND_WINDOW: usize = 7;
const TREND_THRESHOLD: f64 = 0.10;

/// Forecasts through the external ML service
#[derive(Clone)]
pub struct RemoteForecaster {
    client: MlServiceClient,
}

impl RemoteForecaster {
    pub fn new(client: MlServiceClient) -> Self {
        Self { client }
    }

    /// One attempt at a remote forecast. Any failure yields `None` so the
    /// caller can fall back; failures are logged here and not retried.
    pub async fn forecast(
        &self,
        product: &Product,
        current_stock: i32,
        today: NaiveDate,
    ) -> Option<ForecastResult> {
        let request = PredictRequest::for_product(product, current_stock);

        match self.client.predict(&request).await {
            Ok(Some(response)) => Some(map_response(product, response, today)),
            Ok(None) => {
                tracing::warn!(product_id = %product.id, sku = %product.sku, "ML service returned no prediction");
                None
            }
            Err(e) => {
                tracing::error!(product_id = %product.id, sku = %product.sku, "Error calling ML service: {}", e);
                None
            }
        }
    }
}

/// Map an ML service response onto the engine's forecast shape
pub fn map_response(product: &Product, response: MlPredictionResponse, today: NaiveDate) -> ForecastResult {
    let series: Vec<f64> = response
        .predictions
        .iter()
        .map(|p| p.predicted_demand)
        .collect();

    ForecastResult {
        product_id: product.id,
        product_name: product.name.clone(),
        sku: product.sku.clone(),
        predicted_demand_7_days: response.summary.predicted_demand_7_days,
        predicted_demand_30_days: response.summary.predicted_demand_30_days,
        confidence_level: response.summary.confidence_level,
        recommended_order_quantity: response.recommendations.recommended_order_quantity.round() as i32,
        recommended_order_date: response.recommendations.recommended_order_date,
        estimated_stockout_risk: risk_from_days(response.summary.days_until_stockout),
        demand_trend: estimate_trend(&series),
        seasonal_factors: BTreeMap::new(),
        prediction_method: response.model_metrics.method_or_default().to_string(),
        prediction_date: today,
    }
}

/// Stockout risk bands over the remote days-until-stockout estimate
pub fn risk_from_days(days_until_stockout: Option<i64>) -> f64 {
    match days_until_stockout {
        None => 0.0,
        Some(d) if d <= 7 => 90.0,
        Some(d) if d <= 14 => 60.0,
        Some(d) if d <= 30 => 30.0,
        Some(_) => 10.0,
    }
}

/// Compare the mean of the first and last week of a daily demand series.
///
/// Fewer than seven points is STABLE. A non-positive first-week mean is
/// INCREASING if the last week has any demand, else STABLE.
pub fn estimate_trend(series: &[f64]) -> DemandTrend {
    if series.len() < TREND_WINDOW {
        return DemandTrend::Stable;
    }

    let mean = |window: &[f64]| window.iter().sum::<f64>() / window.len() as f64;
    let first = mean(&series[..TREND_WINDOW]);
    let last = mean(&series[series.len() - TREND_WINDOW..]);

    if first <= 0.0 {
        return if last > 0.0 {
            DemandTrend::Increasing
        } else {
            DemandTrend::Stable
        };
    }

    let change = (last - first) / first;
    if change > TREND_THRESHOLD {
        DemandTrend::Increasing
    } else if change < -TREND_THRESHOLD {
        DemandTrend::Decreasing
    } else {
        DemandTrend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_bands() {
        assert_eq!(risk_from_days(None), 0.0);
        assert_eq!(risk_from_days(Some(0)), 90.0);
        assert_eq!(risk_from_days(Some(7)), 90.0);
        assert_eq!(risk_from_days(Some(8)), 60.0);
        assert_eq!(risk_from_days(Some(14)), 60.0);
        assert_eq!(risk_from_days(Some(30)), 30.0);
        assert_eq!(risk_from_days(Some(31)), 10.0);
    }

    #[test]
    fn test_trend_needs_a_week_of_data() {
        assert_eq!(estimate_trend(&[1.0, 100.0, 200.0]), DemandTrend::Stable);
    }

    #[test]
    fn test_trend_direction() {
        let rising: Vec<f64> = (0..14).map(|d| if d < 7 { 10.0 } else { 12.0 }).collect();
        assert_eq!(estimate_trend(&rising), DemandTrend::Increasing);

        let falling: Vec<f64> = (0..14).map(|d| if d < 7 { 10.0 } else { 8.0 }).collect();
        assert_eq!(estimate_trend(&falling), DemandTrend::Decreasing);

        let flat = vec![10.0; 30];
        assert_eq!(estimate_trend(&flat), DemandTrend::Stable);
    }

    #[test]
    fn test_trend_from_zero_baseline() {
        let mut series = vec![0.0; 7];
        series.extend(vec![5.0; 7]);
        assert_eq!(estimate_trend(&series), DemandTrend::Increasing);
        assert_eq!(estimate_trend(&[0.0; 14]), DemandTrend::Stable);
    }
}
