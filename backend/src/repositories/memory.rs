//! In-memory adapter for the storage ports
//!
//! Holds products, inventory and alerts behind tokio locks. Query semantics
//! mirror the PostgreSQL adapter so services behave identically on both.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{Alert, AlertSeverity, AlertType, Inventory, Product};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AlertRepository, InventoryRepository, ProductRepository};
use crate::error::{AppError, AppResult};

/// Product, inventory and alert store kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: RwLock<HashMap<Uuid, Product>>,
    inventory: RwLock<Vec<Inventory>>,
    alerts: RwLock<Vec<Alert>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product without uniqueness checks
    pub async fn put_product(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }

    pub async fn put_inventory(&self, record: Inventory) {
        let mut inventory = self.inventory.write().await;
        inventory.retain(|r| r.id != record.id);
        inventory.push(record);
    }

    /// Every alert ever stored, in insertion order
    pub async fn all_alerts(&self) -> Vec<Alert> {
        self.alerts.read().await.clone()
    }

    async fn stock_by_product(&self) -> HashMap<Uuid, i64> {
        let inventory = self.inventory.read().await;
        let mut totals: HashMap<Uuid, i64> = HashMap::new();
        for record in inventory.iter() {
            *totals.entry(record.product_id).or_default() += i64::from(record.current_stock);
        }
        totals
    }

    async fn products_where<F>(&self, predicate: F) -> Vec<Product>
    where
        F: Fn(&Product) -> bool,
    {
        let mut products: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| predicate(p))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .find(|p| p.sku == sku)
            .cloned())
    }

    async fn find_active(&self) -> AppResult<Vec<Product>> {
        Ok(self.products_where(|p| p.active).await)
    }

    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Product>> {
        Ok(self
            .products_where(|p| p.category.as_deref() == Some(category))
            .await)
    }

    async fn find_low_stock(&self) -> AppResult<Vec<Product>> {
        let totals = self.stock_by_product().await;
        Ok(self
            .products_where(|p| {
                totals.get(&p.id).copied().unwrap_or(0) < i64::from(p.min_stock)
            })
            .await)
    }

    async fn find_overstock(&self) -> AppResult<Vec<Product>> {
        let totals = self.stock_by_product().await;
        Ok(self
            .products_where(|p| match (p.max_stock, totals.get(&p.id)) {
                (Some(max), Some(total)) => *total > i64::from(max),
                _ => false,
            })
            .await)
    }

    async fn find_expiring(&self, now: DateTime<Utc>, within_days: i64) -> AppResult<Vec<Product>> {
        let expiring: Vec<Uuid> = self
            .inventory
            .read()
            .await
            .iter()
            .filter(|r| r.expires_within(now, within_days))
            .map(|r| r.product_id)
            .collect();
        Ok(self
            .products_where(|p| p.perishable && expiring.contains(&p.id))
            .await)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.products.read().await.len() as i64)
    }

    async fn insert(&self, product: Product) -> AppResult<Product> {
        let mut products = self.products.write().await;
        if products.values().any(|p| p.sku == product.sku) {
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }
        products.insert(product.id, product.clone());
        Ok(product)
    }
}

#[async_trait]
impl InventoryRepository for InMemoryStore {
    async fn find_by_product(&self, product_id: Uuid) -> AppResult<Vec<Inventory>> {
        Ok(self
            .inventory
            .read()
            .await
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn find_by_warehouse(&self, warehouse_id: Uuid) -> AppResult<Vec<Inventory>> {
        Ok(self
            .inventory
            .read()
            .await
            .iter()
            .filter(|r| r.warehouse_id == warehouse_id)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Inventory>> {
        Ok(self.inventory.read().await.clone())
    }

    async fn total_inventory_value(&self) -> AppResult<Decimal> {
        let products = self.products.read().await;
        let inventory = self.inventory.read().await;
        Ok(inventory
            .iter()
            .filter_map(|r| {
                products
                    .get(&r.product_id)
                    .map(|p| Decimal::from(r.current_stock) * p.cost_price)
            })
            .sum())
    }

    async fn count_warehouses(&self) -> AppResult<i64> {
        let inventory = self.inventory.read().await;
        let mut warehouses: Vec<Uuid> = inventory.iter().map(|r| r.warehouse_id).collect();
        warehouses.sort();
        warehouses.dedup();
        Ok(warehouses.len() as i64)
    }

    async fn adjust_stock(
        &self,
        product_id: Uuid,
        warehouse_id: Uuid,
        delta: i32,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut inventory = self.inventory.write().await;
        let mut updated = false;
        for record in inventory
            .iter_mut()
            .filter(|r| r.product_id == product_id && r.warehouse_id == warehouse_id)
        {
            record.current_stock += delta;
            record.available_stock = record.current_stock - record.reserved_stock;
            record.last_movement = Some(at);
            record.updated_at = Some(at);
            updated = true;
        }
        Ok(updated)
    }
}

#[async_trait]
impl AlertRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>> {
        Ok(self.alerts.read().await.iter().find(|a| a.id == id).cloned())
    }

    async fn find_unresolved(&self) -> AppResult<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .read()
            .await
            .iter()
            .filter(|a| !a.resolved)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }

    async fn find_unresolved_by_product(&self, product_id: Uuid) -> AppResult<Vec<Alert>> {
        let mut alerts = self.find_unresolved().await?;
        alerts.retain(|a| a.product_id == product_id);
        Ok(alerts)
    }

    async fn find_unresolved_by_severity(&self, severity: AlertSeverity) -> AppResult<Vec<Alert>> {
        let mut alerts = self.find_unresolved().await?;
        alerts.retain(|a| a.severity == severity);
        Ok(alerts)
    }

    async fn find_recent(&self, since: DateTime<Utc>) -> AppResult<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .read()
            .await
            .iter()
            .filter(|a| a.created_at >= since)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| {
            a.severity
                .rank()
                .cmp(&b.severity.rank())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(alerts)
    }

    async fn count_unresolved_by_severity(&self, severity: AlertSeverity) -> AppResult<i64> {
        Ok(self
            .alerts
            .read()
            .await
            .iter()
            .filter(|a| !a.resolved && a.severity == severity)
            .count() as i64)
    }

    async fn find_open(
        &self,
        product_id: Uuid,
        alert_type: AlertType,
        warehouse_id: Option<Uuid>,
    ) -> AppResult<Option<Alert>> {
        Ok(self
            .find_unresolved()
            .await?
            .into_iter()
            .find(|a| {
                a.product_id == product_id
                    && a.alert_type == alert_type
                    && a.warehouse_id == warehouse_id
            }))
    }

    async fn insert(&self, alert: Alert) -> AppResult<Alert> {
        self.alerts.write().await.push(alert.clone());
        Ok(alert)
    }

    async fn touch(&self, id: Uuid, observed_at: DateTime<Utc>) -> AppResult<()> {
        if let Some(alert) = self.alerts.write().await.iter_mut().find(|a| a.id == id) {
            alert.last_observed_at = observed_at;
        }
        Ok(())
    }

    async fn resolve(
        &self,
        id: Uuid,
        resolved_by: &str,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Alert>> {
        let mut alerts = self.alerts.write().await;
        Ok(alerts.iter_mut().find(|a| a.id == id).map(|alert| {
            alert.mark_resolved(resolved_by, at);
            alert.clone()
        }))
    }
}
