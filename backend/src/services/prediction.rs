//! Stock prediction service

use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt, TryStreamExt};
use shared::{total_stock, ForecastResult, Product, StockPrediction};
use uuid::Uuid;

use super::replenishment::build_prediction;
use crate::error::{AppError, AppResult};
use crate::forecast::ForecastSource;
use crate::repositories::{InventoryRepository, ProductRepository};

#[derive(Clone)]
pub struct PredictionService {
    products: Arc<dyn ProductRepository>,
    inventory: Arc<dyn InventoryRepository>,
    forecasts: Arc<ForecastSource>,
    max_concurrency: usize,
}

impl PredictionService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        inventory: Arc<dyn InventoryRepository>,
        forecasts: Arc<ForecastSource>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            products,
            inventory,
            forecasts,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub async fn predict_for_product(&self, product_id: Uuid, today: NaiveDate) -> AppResult<StockPrediction> {
        let product = self.find_product(product_id).await?;
        self.predict(&product, today).await
    }

    /// Forecast plus stock position for an already loaded product
    pub async fn predict(&self, product: &Product, today: NaiveDate) -> AppResult<StockPrediction> {
        let records = self.inventory.find_by_product(product.id).await?;
        let current_stock = total_stock(&records);

        let forecast = self.forecasts.forecast(product, current_stock, today).await;
        let prediction = build_prediction(product, current_stock, &forecast, today);

        tracing::debug!(
            sku = %prediction.sku,
            current_stock,
            urgency = prediction.urgency.as_str(),
            trend = prediction.demand_trend.as_str(),
            "Stock prediction built"
        );

        Ok(prediction)
    }

    /// IMMEDIATE and HIGH predictions over active products, soonest stockout
    /// first and undated stockouts last
    pub async fn urgent_predictions(&self, limit: usize, today: NaiveDate) -> AppResult<Vec<StockPrediction>> {
        let products = self.products.find_active().await?;

        let mut urgent: Vec<StockPrediction> = stream::iter(products)
            .map(|product| async move { self.predict(&product, today).await })
            .buffer_unordered(self.max_concurrency)
            .try_filter(|prediction| futures::future::ready(prediction.urgency.is_urgent()))
            .try_collect()
            .await?;

        urgent.sort_by_key(|p| (p.days_until_stockout.is_none(), p.days_until_stockout));
        urgent.truncate(limit);
        Ok(urgent)
    }

    pub async fn advanced_forecast(&self, product_id: Uuid, today: NaiveDate) -> AppResult<ForecastResult> {
        let product = self.find_product(product_id).await?;
        let result = self.forecasts.advanced(&product, today);

        tracing::info!(
            sku = %product.sku,
            demand_7_days = result.predicted_demand_7_days,
            "Generated advanced forecast"
        );
        Ok(result)
    }

    async fn find_product(&self, product_id: Uuid) -> AppResult<Product> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {}", product_id)))
    }
}
