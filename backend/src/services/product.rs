//! Product catalog service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::{total_stock, validate_new_product, NewProduct, Product, ProductStockView};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::repositories::{InventoryRepository, ProductRepository};

/// Catalog queries enriched with summed stock
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    inventory: Arc<dyn InventoryRepository>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductRepository>, inventory: Arc<dyn InventoryRepository>) -> Self {
        Self { products, inventory }
    }

    /// Register a new product; SKUs are unique
    pub async fn register_product(&self, input: NewProduct) -> AppResult<Product> {
        validate_new_product(&input)?;

        if self.products.find_by_sku(&input.sku).await?.is_some() {
            tracing::debug!(sku = %input.sku, "Rejected duplicate SKU");
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }

        let product = self
            .products
            .insert(input.into_product(Uuid::new_v4(), Utc::now()))
            .await?;

        tracing::info!(product_id = %product.id, sku = %product.sku, "Product registered");
        Ok(product)
    }

    pub async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {}", id)))
    }

    pub async fn count_products(&self) -> AppResult<i64> {
        self.products.count().await
    }

    pub async fn current_stock(&self, product_id: Uuid) -> AppResult<i32> {
        let records = self.inventory.find_by_product(product_id).await?;
        Ok(total_stock(&records))
    }

    pub async fn list_active(&self) -> AppResult<Vec<ProductStockView>> {
        let products = self.products.find_active().await?;
        self.with_stock(products).await
    }

    pub async fn list_by_category(&self, category: &str) -> AppResult<Vec<ProductStockView>> {
        let products = self.products.find_by_category(category).await?;
        self.with_stock(products).await
    }

    pub async fn low_stock_products(&self) -> AppResult<Vec<ProductStockView>> {
        let products = self.products.find_low_stock().await?;
        self.with_stock(products).await
    }

    pub async fn overstock_products(&self) -> AppResult<Vec<ProductStockView>> {
        let products = self.products.find_overstock().await?;
        self.with_stock(products).await
    }

    pub async fn expiring_products(
        &self,
        now: DateTime<Utc>,
        within_days: i64,
    ) -> AppResult<Vec<ProductStockView>> {
        let products = self.products.find_expiring(now, within_days).await?;
        self.with_stock(products).await
    }

    async fn with_stock(&self, products: Vec<Product>) -> AppResult<Vec<ProductStockView>> {
        let mut views = Vec::with_capacity(products.len());
        for product in &products {
            let stock = self.current_stock(product.id).await?;
            views.push(ProductStockView::new(product, stock));
        }
        Ok(views)
    }
}
