//! Dashboard aggregation

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use shared::{
    AlertSeverity, AlertSummary, DashboardSummary, ProductStockView, DEFAULT_STOCK_HEALTH,
};

use super::prediction::PredictionService;
use super::product::ProductService;
use crate::config::DashboardConfig;
use crate::error::AppResult;
use crate::repositories::{AlertRepository, InventoryRepository};

#[derive(Clone)]
pub struct DashboardService {
    products: ProductService,
    inventory: Arc<dyn InventoryRepository>,
    alerts: Arc<dyn AlertRepository>,
    predictions: PredictionService,
    config: DashboardConfig,
    expiring_window_days: i64,
}

struct CatalogMetrics {
    total_products: i64,
    total_warehouses: i64,
    total_inventory_value: Decimal,
    average_stock_health: f64,
}

struct AlertOverview {
    critical: i64,
    warning: i64,
    info: i64,
    recent: Vec<AlertSummary>,
}

struct StockLists {
    low_stock: Vec<ProductStockView>,
    overstock: Vec<ProductStockView>,
    expiring: Vec<ProductStockView>,
}

impl DashboardService {
    pub fn new(
        products: ProductService,
        inventory: Arc<dyn InventoryRepository>,
        alerts: Arc<dyn AlertRepository>,
        predictions: PredictionService,
        config: DashboardConfig,
        expiring_window_days: i64,
    ) -> Self {
        Self {
            products,
            inventory,
            alerts,
            predictions,
            config,
            expiring_window_days,
        }
    }

    /// Gather every dashboard section concurrently. Any failing section
    /// fails the whole summary.
    pub async fn summary(&self, now: DateTime<Utc>) -> AppResult<DashboardSummary> {
        let (metrics, alerts, lists, urgent_predictions) = tokio::try_join!(
            self.catalog_metrics(),
            self.alert_overview(now),
            self.stock_lists(now),
            self.predictions
                .urgent_predictions(self.config.urgent_limit, now.date_naive()),
        )?;

        Ok(DashboardSummary {
            total_products: metrics.total_products,
            total_warehouses: metrics.total_warehouses,
            total_inventory_value: metrics.total_inventory_value,
            average_stock_health: metrics.average_stock_health,
            critical_alerts: alerts.critical,
            warning_alerts: alerts.warning,
            info_alerts: alerts.info,
            recent_alerts: alerts.recent,
            low_stock_products: lists.low_stock,
            overstock_products: lists.overstock,
            expiring_products: lists.expiring,
            urgent_predictions,
            generated_at: now,
        })
    }

    async fn catalog_metrics(&self) -> AppResult<CatalogMetrics> {
        let (total_products, total_warehouses, total_inventory_value, active) = tokio::try_join!(
            self.products.count_products(),
            self.inventory.count_warehouses(),
            self.inventory.total_inventory_value(),
            self.products.list_active(),
        )?;

        Ok(CatalogMetrics {
            total_products,
            total_warehouses,
            total_inventory_value,
            average_stock_health: average_stock_health(&active),
        })
    }

    async fn alert_overview(&self, now: DateTime<Utc>) -> AppResult<AlertOverview> {
        let since = now - Duration::hours(self.config.recent_alert_hours);

        let (critical, warning, info, recent) = tokio::try_join!(
            self.alerts.count_unresolved_by_severity(AlertSeverity::High),
            self.alerts.count_unresolved_by_severity(AlertSeverity::Medium),
            self.alerts.count_unresolved_by_severity(AlertSeverity::Low),
            self.alerts.find_recent(since),
        )?;

        Ok(AlertOverview {
            critical,
            warning,
            info,
            recent: recent
                .iter()
                .take(self.config.list_limit)
                .map(AlertSummary::from)
                .collect(),
        })
    }

    async fn stock_lists(&self, now: DateTime<Utc>) -> AppResult<StockLists> {
        let (mut low_stock, mut overstock, mut expiring) = tokio::try_join!(
            self.products.low_stock_products(),
            self.products.overstock_products(),
            self.products.expiring_products(now, self.expiring_window_days),
        )?;

        let limit = self.config.list_limit;
        low_stock.truncate(limit);
        overstock.truncate(limit);
        expiring.truncate(limit);

        Ok(StockLists {
            low_stock,
            overstock,
            expiring,
        })
    }
}

/// Mean stock health, or the neutral default for an empty catalog
pub fn average_stock_health(views: &[ProductStockView]) -> f64 {
    if views.is_empty() {
        return DEFAULT_STOCK_HEALTH;
    }
    views.iter().map(|v| v.stock_health).sum::<f64>() / views.len() as f64
}
