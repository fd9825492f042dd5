//! Built-in demand simulator
//!
//! Every function here is pure over an explicitly passed random generator,
//! so a seeded [`StdRng`] reproduces the same forecast.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{DemandTrend, ForecastResult, Product, LOCAL_FORECAST_METHOD};

use super::seasonality::SeasonalityTable;

/// Method tag of the advanced (seasonality-weighted) forecast
pub const ADVANCED_FORECAST_METHOD: &str = "HYBRID_ML_ARIMA";

/// Safety multiplier of the EOQ-style reorder quantity
pub const REORDER_SAFETY_MULTIPLIER: f64 = 2.5;

const BASE_CONFIDENCE: f64 = 70.0;
const LOW_VARIABILITY_BONUS: f64 = 15.0;
const LOW_VARIABILITY_THRESHOLD: f64 = 0.3;
const CONFIDENCE_JITTER: f64 = 10.0;
const MAX_CONFIDENCE: f64 = 95.0;
const ADVANCED_BASE_CONFIDENCE: f64 = 85.0;

/// Local forecaster owning its generator
pub struct LocalForecaster {
    rng: Mutex<StdRng>,
}

impl LocalForecaster {
    /// Seeded when `seed` is given, otherwise from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng: Mutex::new(rng) }
    }

    pub fn forecast(&self, product: &Product, current_stock: i32, today: NaiveDate) -> ForecastResult {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        simulate(product, current_stock, today, &mut *rng)
    }

    pub fn advanced(&self, product: &Product, today: NaiveDate) -> ForecastResult {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        advanced_forecast(product, today, &mut *rng)
    }
}

/// Simulate a 7/30-day forecast around the product's average daily sales
pub fn simulate<R: Rng + ?Sized>(
    product: &Product,
    current_stock: i32,
    today: NaiveDate,
    rng: &mut R,
) -> ForecastResult {
    let avg = product.avg_daily_sales_or_default();
    let variability = product.sales_variability_or_default();

    let random_factor = 1.0 + (rng.gen::<f64>() - 0.5) * variability;
    let demand_7 = avg * 7.0 * random_factor;
    let demand_30 = avg * 30.0 * random_factor * (1.0 + SeasonalityTable::factor(today.month()));

    ForecastResult {
        product_id: product.id,
        product_name: product.name.clone(),
        sku: product.sku.clone(),
        predicted_demand_7_days: demand_7,
        predicted_demand_30_days: demand_30,
        confidence_level: confidence(product, rng),
        recommended_order_quantity: reorder_quantity(product),
        recommended_order_date: reorder_date(product, today),
        estimated_stockout_risk: stockout_risk(current_stock, demand_7),
        demand_trend: draw_trend(rng),
        seasonal_factors: BTreeMap::new(),
        prediction_method: LOCAL_FORECAST_METHOD.to_string(),
        prediction_date: today,
    }
}

/// Seasonality-weighted forecast that does not depend on current stock.
/// Risk is drawn from the product's sales variability.
pub fn advanced_forecast<R: Rng + ?Sized>(product: &Product, today: NaiveDate, rng: &mut R) -> ForecastResult {
    let avg = product.avg_daily_sales_or_default();
    let seasonal = 1.0 + SeasonalityTable::factor(today.month());
    let variability = product.sales_variability_or_default();

    ForecastResult {
        product_id: product.id,
        product_name: product.name.clone(),
        sku: product.sku.clone(),
        predicted_demand_7_days: avg * 7.0 * seasonal,
        predicted_demand_30_days: avg * 30.0 * seasonal,
        confidence_level: ADVANCED_BASE_CONFIDENCE + rng.gen_range(0.0..CONFIDENCE_JITTER),
        recommended_order_quantity: reorder_quantity(product),
        recommended_order_date: reorder_date(product, today),
        estimated_stockout_risk: (variability * 100.0 * rng.gen_range(0.0..1.5)).min(100.0),
        demand_trend: draw_trend(rng),
        seasonal_factors: SeasonalityTable::as_map(),
        prediction_method: ADVANCED_FORECAST_METHOD.to_string(),
        prediction_date: today,
    }
}

/// Stockout risk (0-100) from current stock and 7-day demand.
///
/// The `ratio <= 1` and `1 < ratio <= 2` branches do not meet at 1:
/// risk is 0 at exactly 1 but approaches 20 just above it.
pub fn stockout_risk(current_stock: i32, demand_7_days: f64) -> f64 {
    if current_stock <= 0 {
        return 100.0;
    }
    if demand_7_days <= 0.0 {
        return 0.0;
    }

    let ratio = current_stock as f64 / demand_7_days;
    if ratio > 2.0 {
        0.0
    } else if ratio > 1.0 {
        (2.0 - ratio) * 20.0
    } else {
        (1.0 - ratio) * 100.0
    }
}

/// Explicit override, else `avg_daily_sales * lead_time * 2.5` truncated
pub fn reorder_quantity(product: &Product) -> i32 {
    if let Some(quantity) = product.reorder_quantity {
        return quantity;
    }
    let avg = product.avg_daily_sales_or_default();
    let lead_time = product.lead_time_or_default() as f64;
    (avg * lead_time * REORDER_SAFETY_MULTIPLIER) as i32
}

/// Date by which to reorder so stock reaches the reorder point as the order lands
pub fn reorder_date(product: &Product, today: NaiveDate) -> NaiveDate {
    let Some(reorder_point) = product.reorder_point else {
        return today;
    };

    let avg = product.avg_daily_sales_or_default();
    if avg <= 0.0 {
        return today;
    }

    let days_until_reorder_point = (reorder_point as f64 / avg) as i64;
    let lead_time = product.lead_time_or_default() as i64;
    today + Duration::days((days_until_reorder_point - lead_time).max(0))
}

/// Base 70, +15 when variability is explicitly below 0.3, plus jitter; capped at 95
pub fn confidence<R: Rng + ?Sized>(product: &Product, rng: &mut R) -> f64 {
    let mut base = BASE_CONFIDENCE;
    if matches!(product.sales_variability, Some(v) if v < LOW_VARIABILITY_THRESHOLD) {
        base += LOW_VARIABILITY_BONUS;
    }
    (base + rng.gen_range(0.0..CONFIDENCE_JITTER)).min(MAX_CONFIDENCE)
}

fn draw_trend<R: Rng + ?Sized>(rng: &mut R) -> DemandTrend {
    trend_from_draw(rng.gen::<f64>())
}

/// Map a uniform draw in [0, 1) to a trend
pub fn trend_from_draw(draw: f64) -> DemandTrend {
    if draw < 0.3 {
        DemandTrend::Decreasing
    } else if draw < 0.7 {
        DemandTrend::Stable
    } else {
        DemandTrend::Increasing
    }
}
