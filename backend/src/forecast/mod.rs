//! Demand forecasting
//!
//! [`ForecastSource`] is the single seam callers use. It is chosen once from
//! configuration: either the local simulator alone, or the ML service with
//! the local simulator as a silent fallback.

pub mod local;
pub mod remote;
pub mod seasonality;

use chrono::NaiveDate;
use shared::{ForecastResult, Product};

use crate::config::ForecastConfig;
use crate::error::AppResult;
use crate::external::MlServiceClient;

pub use local::LocalForecaster;
pub use remote::RemoteForecaster;
pub use seasonality::SeasonalityTable;

/// Where forecasts come from
pub enum ForecastSource {
    Local(LocalForecaster),
    RemoteWithFallback {
        remote: RemoteForecaster,
        fallback: LocalForecaster,
    },
}

impl ForecastSource {
    pub fn from_config(config: &ForecastConfig) -> AppResult<Self> {
        let local = LocalForecaster::new(config.seed);

        if !config.remote_enabled {
            return Ok(ForecastSource::Local(local));
        }

        let client = MlServiceClient::new(&config.ml_service_url, config.request_timeout())?;
        Ok(ForecastSource::RemoteWithFallback {
            remote: RemoteForecaster::new(client),
            fallback: local,
        })
    }

    /// Always produces a forecast; remote failures fall back to the simulator
    pub async fn forecast(&self, product: &Product, current_stock: i32, today: NaiveDate) -> ForecastResult {
        match self {
            ForecastSource::Local(local) => local.forecast(product, current_stock, today),
            ForecastSource::RemoteWithFallback { remote, fallback } => {
                match remote.forecast(product, current_stock, today).await {
                    Some(result) => result,
                    None => {
                        tracing::warn!(
                            product_id = %product.id,
                            sku = %product.sku,
                            "Falling back to local forecast"
                        );
                        fallback.forecast(product, current_stock, today)
                    }
                }
            }
        }
    }

    /// Seasonality-weighted forecast, always computed locally
    pub fn advanced(&self, product: &Product, today: NaiveDate) -> ForecastResult {
        self.local().advanced(product, today)
    }

    pub fn local(&self) -> &LocalForecaster {
        match self {
            ForecastSource::Local(local) => local,
            ForecastSource::RemoteWithFallback { fallback, .. } => fallback,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ForecastSource::RemoteWithFallback { .. })
    }
}
