//! Replenishment calculator
//!
//! Turns a forecast into a stock position: days until stockout, the
//! stockout date and an urgency tier relative to the supplier lead time.

use chrono::{Duration, NaiveDate};
use shared::{ForecastResult, Product, StockPrediction, Urgency};

/// Stockouts further out than this are left undated
pub const STOCKOUT_HORIZON_DAYS: i64 = 365;

/// Urgency from days until stockout and supplier lead time
pub fn classify_urgency(days_until_stockout: Option<i64>, lead_time_days: i32) -> Urgency {
    let Some(days) = days_until_stockout else {
        return Urgency::Low;
    };

    let lead_time = lead_time_days as i64;
    if days <= lead_time {
        Urgency::Immediate
    } else if days <= lead_time * 2 {
        Urgency::High
    } else if days <= lead_time * 4 {
        Urgency::Medium
    } else {
        Urgency::Low
    }
}

/// Whole days of cover at the forecast daily demand. `None` without demand.
pub fn days_until_stockout(current_stock: i32, predicted_demand_30_days: f64) -> Option<i64> {
    let daily_demand = predicted_demand_30_days / 30.0;
    if daily_demand > 0.0 {
        Some((current_stock as f64 / daily_demand).floor() as i64)
    } else {
        None
    }
}

pub fn build_prediction(
    product: &Product,
    current_stock: i32,
    forecast: &ForecastResult,
    today: NaiveDate,
) -> StockPrediction {
    let days = days_until_stockout(current_stock, forecast.predicted_demand_30_days);
    let stockout_date = days
        .filter(|d| *d < STOCKOUT_HORIZON_DAYS)
        .map(|d| today + Duration::days(d));

    StockPrediction {
        product_id: product.id,
        product_name: product.name.clone(),
        sku: product.sku.clone(),
        current_stock,
        predicted_demand_7_days: forecast.predicted_demand_7_days,
        predicted_demand_30_days: forecast.predicted_demand_30_days,
        stockout_date,
        days_until_stockout: days,
        recommended_order_quantity: forecast.recommended_order_quantity,
        recommended_order_date: forecast.recommended_order_date,
        confidence_level: forecast.confidence_level,
        estimated_stockout_risk: forecast.estimated_stockout_risk,
        demand_trend: forecast.demand_trend,
        prediction_method: forecast.prediction_method.clone(),
        urgency: classify_urgency(days, product.lead_time_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_until_stockout_floors() {
        // 10 units/day
        assert_eq!(days_until_stockout(95, 300.0), Some(9));
        assert_eq!(days_until_stockout(0, 300.0), Some(0));
        assert_eq!(days_until_stockout(95, 0.0), None);
    }
}
