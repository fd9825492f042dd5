//! Replenishment calculator tests

mod common;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use shared::{DemandTrend, ForecastResult, Urgency};
use stockcast_backend::services::replenishment::{build_prediction, classify_urgency};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
}

fn forecast_with_demand(demand_30: f64) -> ForecastResult {
    ForecastResult {
        product_id: uuid::Uuid::new_v4(),
        product_name: "Test".into(),
        sku: "T-1".into(),
        predicted_demand_7_days: demand_30 * 7.0 / 30.0,
        predicted_demand_30_days: demand_30,
        confidence_level: 80.0,
        recommended_order_quantity: 175,
        recommended_order_date: today(),
        estimated_stockout_risk: 0.0,
        demand_trend: DemandTrend::Stable,
        seasonal_factors: Default::default(),
        prediction_method: "TEST".into(),
        prediction_date: today(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_urgency_boundaries() {
        let lead = 7;
        assert_eq!(classify_urgency(None, lead), Urgency::Low);
        assert_eq!(classify_urgency(Some(7), lead), Urgency::Immediate);
        assert_eq!(classify_urgency(Some(8), lead), Urgency::High);
        assert_eq!(classify_urgency(Some(14), lead), Urgency::High);
        assert_eq!(classify_urgency(Some(15), lead), Urgency::Medium);
        assert_eq!(classify_urgency(Some(28), lead), Urgency::Medium);
        assert_eq!(classify_urgency(Some(29), lead), Urgency::Low);
    }

    #[test]
    fn test_prediction_dates_stockout_within_horizon() {
        let p = common::product("R-1", 10, None);
        // 10 units/day, 95 units on hand
        let prediction = build_prediction(&p, 95, &forecast_with_demand(300.0), today());

        assert_eq!(prediction.days_until_stockout, Some(9));
        assert_eq!(prediction.stockout_date, Some(today() + Duration::days(9)));
        assert_eq!(prediction.urgency, Urgency::High);
    }

    #[test]
    fn test_far_stockout_left_undated() {
        let p = common::product("R-2", 10, None);
        // 1 unit/day, 400 days of cover
        let prediction = build_prediction(&p, 400, &forecast_with_demand(30.0), today());

        assert_eq!(prediction.days_until_stockout, Some(400));
        assert_eq!(prediction.stockout_date, None);
        assert_eq!(prediction.urgency, Urgency::Low);
    }

    #[test]
    fn test_no_demand_means_no_stockout() {
        let p = common::product("R-3", 10, None);
        let prediction = build_prediction(&p, 50, &forecast_with_demand(0.0), today());

        assert_eq!(prediction.days_until_stockout, None);
        assert_eq!(prediction.stockout_date, None);
        assert_eq!(prediction.urgency, Urgency::Low);
    }

    #[test]
    fn test_product_lead_time_drives_urgency() {
        let mut p = common::product("R-4", 10, None);
        p.lead_time_days = Some(3);
        // 10 units/day, 50 units: 5 days of cover
        let prediction = build_prediction(&p, 50, &forecast_with_demand(300.0), today());
        assert_eq!(prediction.urgency, Urgency::High);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_urgency_tier_edges(lead in 1i32..60) {
            let l = lead as i64;
            prop_assert_eq!(classify_urgency(Some(l), lead), Urgency::Immediate);
            prop_assert_eq!(classify_urgency(Some(2 * l), lead), Urgency::High);
            prop_assert_eq!(classify_urgency(Some(4 * l), lead), Urgency::Medium);
            prop_assert_eq!(classify_urgency(Some(4 * l + 1), lead), Urgency::Low);
        }

        /// More days of cover never makes a prediction more urgent
        #[test]
        fn prop_urgency_monotone_in_days(lead in 1i32..60, a in -10i64..500, b in -10i64..500) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify_urgency(Some(near), lead) <= classify_urgency(Some(far), lead));
        }
    }
}
