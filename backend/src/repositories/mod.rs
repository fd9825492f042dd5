//! Storage ports for products, inventory and alerts
//!
//! The forecasting and alerting services only talk to these traits. Two
//! adapters are provided: [`postgres`] for deployments and [`memory`] for
//! tests and database-less embedding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{Alert, AlertSeverity, AlertType, Inventory, Product};
use uuid::Uuid;

use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{PgAlertRepository, PgInventoryRepository, PgProductRepository};

/// Read access to the product catalog
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>>;

    async fn find_active(&self) -> AppResult<Vec<Product>>;

    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Product>>;

    /// Products whose summed inventory is below `min_stock`
    async fn find_low_stock(&self) -> AppResult<Vec<Product>>;

    /// Products with `max_stock` set and summed inventory above it
    async fn find_overstock(&self) -> AppResult<Vec<Product>>;

    /// Perishable products holding inventory that expires before `now + within_days`
    async fn find_expiring(&self, now: DateTime<Utc>, within_days: i64) -> AppResult<Vec<Product>>;

    async fn count(&self) -> AppResult<i64>;

    async fn insert(&self, product: Product) -> AppResult<Product>;
}

/// Per-warehouse stock records
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn find_by_product(&self, product_id: Uuid) -> AppResult<Vec<Inventory>>;

    async fn find_by_warehouse(&self, warehouse_id: Uuid) -> AppResult<Vec<Inventory>>;

    async fn find_all(&self) -> AppResult<Vec<Inventory>>;

    /// Sum of `current_stock * cost_price` over every record
    async fn total_inventory_value(&self) -> AppResult<Decimal>;

    async fn count_warehouses(&self) -> AppResult<i64>;

    /// Add `delta` to the stock of one product in one warehouse.
    /// Returns false when no such record exists.
    async fn adjust_stock(
        &self,
        product_id: Uuid,
        warehouse_id: Uuid,
        delta: i32,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;
}

/// Alert persistence. Alerts are never deleted.
#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>>;

    /// Unresolved alerts, newest first
    async fn find_unresolved(&self) -> AppResult<Vec<Alert>>;

    async fn find_unresolved_by_product(&self, product_id: Uuid) -> AppResult<Vec<Alert>>;

    async fn find_unresolved_by_severity(&self, severity: AlertSeverity) -> AppResult<Vec<Alert>>;

    /// Alerts created at or after `since`, HIGH first, then newest first
    async fn find_recent(&self, since: DateTime<Utc>) -> AppResult<Vec<Alert>>;

    async fn count_unresolved_by_severity(&self, severity: AlertSeverity) -> AppResult<i64>;

    /// The unresolved alert for a product/type/warehouse key, if any
    async fn find_open(
        &self,
        product_id: Uuid,
        alert_type: AlertType,
        warehouse_id: Option<Uuid>,
    ) -> AppResult<Option<Alert>>;

    async fn insert(&self, alert: Alert) -> AppResult<Alert>;

    /// Record that an open alert's condition was observed again
    async fn touch(&self, id: Uuid, observed_at: DateTime<Utc>) -> AppResult<()>;

    /// Set `resolved`, `resolved_by` and `resolved_at`. Last writer wins.
    /// Returns `None` for an unknown id.
    async fn resolve(
        &self,
        id: Uuid,
        resolved_by: &str,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Alert>>;
}
