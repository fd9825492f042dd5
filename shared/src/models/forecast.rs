//! Demand forecast and replenishment models

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prediction method tag of the built-in simulator
pub const LOCAL_FORECAST_METHOD: &str = "MOVING_AVERAGE_ADJUSTED";

/// Direction of expected demand
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DemandTrend {
    Increasing,
    Stable,
    Decreasing,
}

impl DemandTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandTrend::Increasing => "INCREASING",
            DemandTrend::Stable => "STABLE",
            DemandTrend::Decreasing => "DECREASING",
        }
    }
}

/// Demand forecast for one product. Built per request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastResult {
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub predicted_demand_7_days: f64,
    pub predicted_demand_30_days: f64,
    /// Self-reported certainty, 0-100
    pub confidence_level: f64,
    pub recommended_order_quantity: i32,
    pub recommended_order_date: NaiveDate,
    /// 0-100
    pub estimated_stockout_risk: f64,
    pub demand_trend: DemandTrend,
    /// Month name to demand multiplier
    pub seasonal_factors: BTreeMap<String, f64>,
    pub prediction_method: String,
    pub prediction_date: NaiveDate,
}

/// How soon a stockout is expected relative to the supplier lead time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Immediate,
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Immediate => "IMMEDIATE",
            Urgency::High => "HIGH",
            Urgency::Medium => "MEDIUM",
            Urgency::Low => "LOW",
        }
    }

    /// IMMEDIATE and HIGH are surfaced as urgent predictions
    pub fn is_urgent(&self) -> bool {
        matches!(self, Urgency::Immediate | Urgency::High)
    }
}

/// Forecast reshaped around the product's current stock position
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockPrediction {
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub current_stock: i32,
    pub predicted_demand_7_days: f64,
    pub predicted_demand_30_days: f64,
    /// Only set when the stockout falls within the next 365 days
    pub stockout_date: Option<NaiveDate>,
    pub days_until_stockout: Option<i64>,
    pub recommended_order_quantity: i32,
    pub recommended_order_date: NaiveDate,
    pub confidence_level: f64,
    pub estimated_stockout_risk: f64,
    pub demand_trend: DemandTrend,
    pub prediction_method: String,
    pub urgency: Urgency,
}
