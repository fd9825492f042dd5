//! Forecast engine tests
//!
//! Covers the local simulator, the stockout risk curve and the forecast
//! source fallback behaviour.

mod common;

use chrono::NaiveDate;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{Product, LOCAL_FORECAST_METHOD};
use stockcast_backend::forecast::local::{reorder_quantity, simulate, stockout_risk};
use stockcast_backend::forecast::{ForecastSource, LocalForecaster};

fn march() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn profile(avg: Option<f64>, variability: Option<f64>, lead_time: Option<i32>) -> Product {
    let mut p = common::product("FC-1", 10, Some(500));
    p.average_daily_sales = avg;
    p.sales_variability = variability;
    p.lead_time_days = lead_time;
    p
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_reorder_quantity_default_profile() {
        let p = profile(Some(10.0), None, Some(7));
        assert_eq!(reorder_quantity(&p), 175);

        // Missing values fall back to 10/day and 7 days
        assert_eq!(reorder_quantity(&profile(None, None, None)), 175);
    }

    #[test]
    fn test_stockout_risk_edges() {
        assert_eq!(stockout_risk(0, 70.0), 100.0);
        assert_eq!(stockout_risk(-5, 70.0), 100.0);
        assert_eq!(stockout_risk(10, 0.0), 0.0);
        assert_eq!(stockout_risk(141, 70.0), 0.0);
        assert!((stockout_risk(35, 70.0) - 50.0).abs() < 1e-9);
        assert!((stockout_risk(105, 70.0) - 10.0).abs() < 1e-9);
    }

    /// The two branches do not meet at ratio 1: exactly 1 scores 0 while
    /// anything just above scores close to 20.
    #[test]
    fn test_stockout_risk_discontinuity_at_ratio_one() {
        assert_eq!(stockout_risk(70, 70.0), 0.0);
        let just_above = stockout_risk(71, 70.0);
        assert!(just_above > 19.0 && just_above < 20.0);
    }

    #[test]
    fn test_seeded_simulation_is_reproducible() {
        let p = profile(Some(12.0), Some(0.4), Some(5));
        let a = simulate(&p, 80, march(), &mut StdRng::seed_from_u64(7));
        let b = simulate(&p, 80, march(), &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.prediction_method, LOCAL_FORECAST_METHOD);
        assert!(a.seasonal_factors.is_empty());
    }

    #[test]
    fn test_simulation_applies_march_seasonality() {
        let p = profile(Some(10.0), Some(0.0), None);
        let result = simulate(&p, 100, march(), &mut StdRng::seed_from_u64(1));

        // Zero variability removes the random factor
        assert!((result.predicted_demand_7_days - 70.0).abs() < 1e-9);
        assert!((result.predicted_demand_30_days - 285.0).abs() < 1e-9);
    }

    #[test]
    fn test_forecaster_with_same_seed_matches() {
        let p = profile(Some(10.0), Some(0.2), Some(7));
        let a = LocalForecaster::new(Some(99)).forecast(&p, 50, march());
        let b = LocalForecaster::new(Some(99)).forecast(&p, 50, march());
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_local_source_without_remote() {
        let config = common::test_config();
        let source = ForecastSource::from_config(&config.forecast).unwrap();
        assert!(!source.is_remote());

        let result = source.forecast(&profile(None, None, None), 40, march()).await;
        assert_eq!(result.prediction_method, LOCAL_FORECAST_METHOD);
        assert!(result.confidence_level >= 70.0 && result.confidence_level <= 95.0);
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

        /// Risk never increases as stock grows against fixed demand,
        /// within each branch of the curve
        #[test]
        fn prop_risk_non_increasing_within_branch(
            demand in 1.0f64..1000.0,
            a in 1i32..5000,
            b in 1i32..5000,
        ) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let branch = |stock: i32| {
                let ratio = stock as f64 / demand;
                if ratio > 2.0 { 2 } else if ratio > 1.0 { 1 } else { 0 }
            };

            if branch(low) == branch(high) {
                prop_assert!(stockout_risk(low, demand) >= stockout_risk(high, demand));
            }
        }

        #[test]
        fn prop_risk_is_bounded(stock in -100i32..10_000, demand in -10.0f64..1000.0) {
            let risk = stockout_risk(stock, demand);
            prop_assert!((0.0..=100.0).contains(&risk));
        }

        #[test]
        fn prop_confidence_within_bounds(seed in any::<u64>(), variability in proptest::option::of(0.0f64..1.0)) {
            let p = profile(Some(10.0), variability, Some(7));
            let result = simulate(&p, 100, march(), &mut StdRng::seed_from_u64(seed));
            prop_assert!(result.confidence_level >= 70.0);
            prop_assert!(result.confidence_level <= 95.0);
        }
    }
}
