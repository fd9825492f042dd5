//! Alert service: queries, resolution and the four-pass generation cycle

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use shared::{total_stock, Alert, AlertSeverity, AlertType, Inventory, NewAlert, Product};
use uuid::Uuid;

use super::prediction::PredictionService;
use crate::config::AlertConfig;
use crate::error::{AppError, AppResult};
use crate::repositories::{AlertRepository, InventoryRepository, ProductRepository};

/// The passes of a cycle, in execution order
pub const CYCLE_PASSES: [AlertType; 4] = [
    AlertType::LowStock,
    AlertType::Overstock,
    AlertType::Expiring,
    AlertType::Anomaly,
];

#[derive(Clone)]
pub struct AlertService {
    products: Arc<dyn ProductRepository>,
    inventory: Arc<dyn InventoryRepository>,
    alerts: Arc<dyn AlertRepository>,
    predictions: PredictionService,
    config: AlertConfig,
}

/// What raising an alert did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Raised {
    Created,
    /// An open alert for the same condition was refreshed instead
    Refreshed,
}

/// Result of one pass of a cycle
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PassOutcome {
    pub alert_type: AlertType,
    pub created: usize,
    pub refreshed: usize,
    /// Entities whose evaluation errored
    pub failed: usize,
    /// Set when the pass could not run at all
    pub error: Option<String>,
}

impl PassOutcome {
    fn new(alert_type: AlertType) -> Self {
        Self {
            alert_type,
            created: 0,
            refreshed: 0,
            failed: 0,
            error: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub passes: Vec<PassOutcome>,
}

impl CycleReport {
    pub fn total_created(&self) -> usize {
        self.passes.iter().map(|p| p.created).sum()
    }

    pub fn total_refreshed(&self) -> usize {
        self.passes.iter().map(|p| p.refreshed).sum()
    }

    pub fn failed_passes(&self) -> Vec<AlertType> {
        self.passes
            .iter()
            .filter(|p| p.is_failed())
            .map(|p| p.alert_type)
            .collect()
    }

    pub fn pass(&self, alert_type: AlertType) -> Option<&PassOutcome> {
        self.passes.iter().find(|p| p.alert_type == alert_type)
    }
}

impl AlertService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        inventory: Arc<dyn InventoryRepository>,
        alerts: Arc<dyn AlertRepository>,
        predictions: PredictionService,
        config: AlertConfig,
    ) -> Self {
        Self {
            products,
            inventory,
            alerts,
            predictions,
            config,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn active_alerts(&self) -> AppResult<Vec<Alert>> {
        self.alerts.find_unresolved().await
    }

    pub async fn alerts_for_product(&self, product_id: Uuid) -> AppResult<Vec<Alert>> {
        self.alerts.find_unresolved_by_product(product_id).await
    }

    pub async fn critical_alerts(&self) -> AppResult<Vec<Alert>> {
        self.alerts
            .find_unresolved_by_severity(AlertSeverity::High)
            .await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub async fn create_alert(&self, alert: NewAlert, now: DateTime<Utc>) -> AppResult<Alert> {
        let alert = self.alerts.insert(alert.into_alert(Uuid::new_v4(), now)).await?;

        tracing::info!(
            alert_id = %alert.id,
            product_id = %alert.product_id,
            alert_type = alert.alert_type.as_str(),
            severity = alert.severity.as_str(),
            "Alert created: {}",
            alert.message
        );
        Ok(alert)
    }

    /// Resolving an already resolved alert overwrites resolver and time
    pub async fn resolve_alert(&self, alert_id: Uuid, resolved_by: &str) -> AppResult<Alert> {
        let alert = self
            .alerts
            .resolve(alert_id, resolved_by, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Alert {}", alert_id)))?;

        tracing::info!(%alert_id, resolved_by, "Alert resolved");
        Ok(alert)
    }

    /// Create the alert, or refresh the open alert for the same
    /// product/type/warehouse when deduplication is on
    async fn raise(&self, alert: NewAlert, now: DateTime<Utc>) -> AppResult<Raised> {
        if self.config.deduplicate {
            let open = self
                .alerts
                .find_open(alert.product_id, alert.alert_type, alert.warehouse_id)
                .await?;

            if let Some(open) = open {
                self.alerts.touch(open.id, now).await?;
                tracing::debug!(
                    alert_id = %open.id,
                    alert_type = alert.alert_type.as_str(),
                    "Open alert still observed"
                );
                return Ok(Raised::Refreshed);
            }
        }

        self.create_alert(alert, now).await?;
        Ok(Raised::Created)
    }

    // =========================================================================
    // Generation cycle
    // =========================================================================

    /// Run every pass in order. A failing pass is recorded and logged but
    /// never stops the passes after it.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> CycleReport {
        tracing::info!("Running alert check");
        let started_at = Utc::now();

        let mut passes = Vec::with_capacity(CYCLE_PASSES.len());
        for alert_type in CYCLE_PASSES {
            let outcome = self.run_pass(alert_type, now).await;
            if let Some(error) = &outcome.error {
                tracing::error!(pass = alert_type.as_str(), "Alert pass failed: {}", error);
            }
            passes.push(outcome);
        }

        let report = CycleReport {
            started_at,
            finished_at: Utc::now(),
            passes,
        };

        tracing::info!(
            created = report.total_created(),
            refreshed = report.total_refreshed(),
            failed_passes = report.failed_passes().len(),
            "Alert check completed"
        );
        report
    }

    /// Run a single pass
    pub async fn run_pass(&self, alert_type: AlertType, now: DateTime<Utc>) -> PassOutcome {
        let result = match alert_type {
            AlertType::LowStock => self.check_low_stock(now).await,
            AlertType::Overstock => self.check_overstock(now).await,
            AlertType::Expiring => self.check_expiring(now).await,
            AlertType::Anomaly => self.check_anomalies(now).await,
        };

        match result {
            Ok(outcome) => outcome,
            Err(e) => PassOutcome {
                error: Some(e.to_string()),
                ..PassOutcome::new(alert_type)
            },
        }
    }

    async fn check_low_stock(&self, now: DateTime<Utc>) -> AppResult<PassOutcome> {
        let products = self.products.find_low_stock().await?;
        Ok(self
            .fan_out(AlertType::LowStock, products, |product| {
                self.evaluate_low_stock(product, now)
            })
            .await)
    }

    async fn check_overstock(&self, now: DateTime<Utc>) -> AppResult<PassOutcome> {
        let products = self.products.find_overstock().await?;
        Ok(self
            .fan_out(AlertType::Overstock, products, |product| {
                self.evaluate_overstock(product, now)
            })
            .await)
    }

    async fn check_expiring(&self, now: DateTime<Utc>) -> AppResult<PassOutcome> {
        let window = self.config.expiring_window_days;
        let records: Vec<Inventory> = self
            .inventory
            .find_all()
            .await?
            .into_iter()
            .filter(|record| record.expires_within(now, window))
            .collect();

        Ok(self
            .fan_out(AlertType::Expiring, records, |record| {
                self.evaluate_expiring(record, now)
            })
            .await)
    }

    async fn check_anomalies(&self, now: DateTime<Utc>) -> AppResult<PassOutcome> {
        let products = self.products.find_active().await?;
        Ok(self
            .fan_out(AlertType::Anomaly, products, |product| {
                self.evaluate_anomaly(product, now)
            })
            .await)
    }

    async fn evaluate_low_stock(&self, product: Product, now: DateTime<Utc>) -> AppResult<Option<Raised>> {
        let stock = self.stock_of(&product).await?;
        if stock >= product.min_stock {
            return Ok(None);
        }
        self.raise(low_stock_alert(&product, stock), now).await.map(Some)
    }

    async fn evaluate_overstock(&self, product: Product, now: DateTime<Utc>) -> AppResult<Option<Raised>> {
        let Some(max_stock) = product.max_stock else {
            return Ok(None);
        };
        let stock = self.stock_of(&product).await?;
        if stock <= max_stock {
            return Ok(None);
        }
        self.raise(overstock_alert(&product, stock, max_stock), now)
            .await
            .map(Some)
    }

    async fn evaluate_expiring(&self, record: Inventory, now: DateTime<Utc>) -> AppResult<Option<Raised>> {
        let Some(days) = record.days_until_expiration(now) else {
            return Ok(None);
        };
        let Some(product) = self.products.find_by_id(record.product_id).await? else {
            tracing::warn!(product_id = %record.product_id, "Expiring inventory for unknown product");
            return Ok(None);
        };

        let alert = expiring_alert(&product, &record, days, self.config.expiring_high_days);
        self.raise(alert, now).await.map(Some)
    }

    /// Low forecast confidence stands in for an anomaly signal
    async fn evaluate_anomaly(&self, product: Product, now: DateTime<Utc>) -> AppResult<Option<Raised>> {
        let prediction = self.predictions.predict(&product, now.date_naive()).await?;
        if prediction.confidence_level >= self.config.anomaly_confidence_threshold {
            return Ok(None);
        }
        self.raise(anomaly_alert(&product, prediction.confidence_level), now)
            .await
            .map(Some)
    }

    /// Evaluate entities concurrently, bounded by `max_concurrency`, and
    /// tally the results. Individual failures are logged and counted.
    async fn fan_out<T, F, Fut>(&self, alert_type: AlertType, items: Vec<T>, evaluate: F) -> PassOutcome
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = AppResult<Option<Raised>>>,
    {
        let results: Vec<AppResult<Option<Raised>>> = stream::iter(items)
            .map(evaluate)
            .buffer_unordered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        let mut outcome = PassOutcome::new(alert_type);
        for result in results {
            match result {
                Ok(Some(Raised::Created)) => outcome.created += 1,
                Ok(Some(Raised::Refreshed)) => outcome.refreshed += 1,
                Ok(None) => {}
                Err(e) => {
                    outcome.failed += 1;
                    tracing::error!(pass = alert_type.as_str(), "Alert evaluation failed: {}", e);
                }
            }
        }
        outcome
    }

    async fn stock_of(&self, product: &Product) -> AppResult<i32> {
        let records = self.inventory.find_by_product(product.id).await?;
        Ok(total_stock(&records))
    }
}

// =============================================================================
// Alert content
// =============================================================================

pub fn low_stock_alert(product: &Product, current_stock: i32) -> NewAlert {
    NewAlert {
        product_id: product.id,
        warehouse_id: None,
        alert_type: AlertType::LowStock,
        severity: if current_stock == 0 {
            AlertSeverity::High
        } else {
            AlertSeverity::Medium
        },
        message: format!(
            "Low stock for {} (SKU: {}). Current stock: {}, minimum: {}",
            product.name, product.sku, current_stock, product.min_stock
        ),
        recommendation: "Place an immediate order with the supplier".to_string(),
    }
}

pub fn overstock_alert(product: &Product, current_stock: i32, max_stock: i32) -> NewAlert {
    NewAlert {
        product_id: product.id,
        warehouse_id: None,
        alert_type: AlertType::Overstock,
        severity: AlertSeverity::Low,
        message: format!(
            "Excess inventory for {} (SKU: {}). Current stock: {}, maximum: {}",
            product.name, product.sku, current_stock, max_stock
        ),
        recommendation: "Consider promotions or discounts to reduce inventory".to_string(),
    }
}

pub fn expiring_alert(product: &Product, record: &Inventory, days: i64, high_days: i64) -> NewAlert {
    NewAlert {
        product_id: product.id,
        warehouse_id: Some(record.warehouse_id),
        alert_type: AlertType::Expiring,
        severity: if days <= high_days {
            AlertSeverity::High
        } else {
            AlertSeverity::Medium
        },
        message: format!(
            "Product expiring soon: {} (batch: {}) in {} days",
            product.name,
            record.batch_number.as_deref().unwrap_or("unknown"),
            days
        ),
        recommendation: "Prioritize sale or consider returning to the supplier".to_string(),
    }
}

pub fn anomaly_alert(product: &Product, confidence: f64) -> NewAlert {
    NewAlert {
        product_id: product.id,
        warehouse_id: None,
        alert_type: AlertType::Anomaly,
        severity: AlertSeverity::Medium,
        message: format!(
            "Anomalous consumption pattern detected for {} (SKU: {}), forecast confidence {:.1}%",
            product.name, product.sku, confidence
        ),
        recommendation: "Review sales history and verify data".to_string(),
    }
}
