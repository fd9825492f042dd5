//! Inventory service for stock levels and movements

use std::sync::Arc;

use chrono::Utc;
use shared::{total_stock, Inventory};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::repositories::InventoryRepository;

#[derive(Clone)]
pub struct InventoryService {
    inventory: Arc<dyn InventoryRepository>,
}

impl InventoryService {
    pub fn new(inventory: Arc<dyn InventoryRepository>) -> Self {
        Self { inventory }
    }

    /// Stock summed over every warehouse
    pub async fn total_stock(&self, product_id: Uuid) -> AppResult<i32> {
        let records = self.inventory.find_by_product(product_id).await?;
        Ok(total_stock(&records))
    }

    pub async fn by_product(&self, product_id: Uuid) -> AppResult<Vec<Inventory>> {
        self.inventory.find_by_product(product_id).await
    }

    pub async fn by_warehouse(&self, warehouse_id: Uuid) -> AppResult<Vec<Inventory>> {
        self.inventory.find_by_warehouse(warehouse_id).await
    }

    /// Apply a signed stock movement to one warehouse record
    pub async fn adjust_stock(&self, product_id: Uuid, warehouse_id: Uuid, delta: i32) -> AppResult<()> {
        let updated = self
            .inventory
            .adjust_stock(product_id, warehouse_id, delta, Utc::now())
            .await?;

        if !updated {
            return Err(AppError::NotFound(format!(
                "Inventory for product {} in warehouse {}",
                product_id, warehouse_id
            )));
        }

        tracing::info!(%product_id, %warehouse_id, delta, "Stock adjusted");
        Ok(())
    }
}
