//! Dashboard summary models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AlertSummary, ProductStockView, StockPrediction};

/// Single-view summary of catalog health, alerts and urgent replenishments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_products: i64,
    pub total_warehouses: i64,
    /// Sum of current stock times cost price
    pub total_inventory_value: Decimal,
    pub average_stock_health: f64,
    /// Unresolved HIGH alerts
    pub critical_alerts: i64,
    /// Unresolved MEDIUM alerts
    pub warning_alerts: i64,
    /// Unresolved LOW alerts
    pub info_alerts: i64,
    pub recent_alerts: Vec<AlertSummary>,
    pub low_stock_products: Vec<ProductStockView>,
    pub overstock_products: Vec<ProductStockView>,
    pub expiring_products: Vec<ProductStockView>,
    pub urgent_predictions: Vec<StockPrediction>,
    pub generated_at: DateTime<Utc>,
}
