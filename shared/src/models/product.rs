//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Average daily sales assumed when a product has no sales profile
pub const DEFAULT_AVERAGE_DAILY_SALES: f64 = 10.0;

/// Coefficient of variation assumed when a product has no sales profile
pub const DEFAULT_SALES_VARIABILITY: f64 = 0.2;

/// Supplier lead time assumed when none is recorded
pub const DEFAULT_LEAD_TIME_DAYS: i32 = 7;

/// Stock health reported when no active product has a health value
pub const DEFAULT_STOCK_HEALTH: f64 = 75.0;

/// A catalog product together with its demand profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    /// Stock-keeping unit, unique across the catalog
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    /// Unit of sale (unit, box, ...)
    pub unit: Option<String>,
    pub cost_price: Decimal,
    pub sale_price: Decimal,
    pub min_stock: i32,
    pub max_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub reorder_quantity: Option<i32>,
    pub active: bool,
    pub perishable: bool,
    pub shelf_life_days: Option<i32>,
    pub average_daily_sales: Option<f64>,
    /// Coefficient of variation of daily sales
    pub sales_variability: Option<f64>,
    pub lead_time_days: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn avg_daily_sales_or_default(&self) -> f64 {
        self.average_daily_sales.unwrap_or(DEFAULT_AVERAGE_DAILY_SALES)
    }

    pub fn sales_variability_or_default(&self) -> f64 {
        self.sales_variability.unwrap_or(DEFAULT_SALES_VARIABILITY)
    }

    pub fn lead_time_or_default(&self) -> i32 {
        self.lead_time_days.unwrap_or(DEFAULT_LEAD_TIME_DAYS)
    }
}

/// Input for registering a product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub unit: Option<String>,
    pub cost_price: Decimal,
    pub sale_price: Decimal,
    pub min_stock: i32,
    pub max_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub reorder_quantity: Option<i32>,
    #[serde(default)]
    pub perishable: bool,
    pub shelf_life_days: Option<i32>,
    pub average_daily_sales: Option<f64>,
    pub sales_variability: Option<f64>,
    pub lead_time_days: Option<i32>,
}

impl NewProduct {
    /// Build the stored product, active from creation
    pub fn into_product(self, id: Uuid, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            sku: self.sku,
            name: self.name,
            description: self.description,
            category: self.category,
            brand: self.brand,
            unit: self.unit,
            cost_price: self.cost_price,
            sale_price: self.sale_price,
            min_stock: self.min_stock,
            max_stock: self.max_stock,
            reorder_point: self.reorder_point,
            reorder_quantity: self.reorder_quantity,
            active: true,
            perishable: self.perishable,
            shelf_life_days: self.shelf_life_days,
            average_daily_sales: self.average_daily_sales,
            sales_variability: self.sales_variability,
            lead_time_days: self.lead_time_days,
            created_at,
            updated_at: None,
        }
    }
}

/// Coarse stock level classification shown on product listings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Ok,
    Low,
    Critical,
    Overstock,
}

/// Product enriched with its summed inventory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductStockView {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub cost_price: Decimal,
    pub sale_price: Decimal,
    pub min_stock: i32,
    pub max_stock: Option<i32>,
    pub current_stock: i32,
    /// 0-100, 50 at the minimum and 100 at the maximum
    pub stock_health: f64,
    pub stock_status: StockStatus,
}

impl ProductStockView {
    pub fn new(product: &Product, current_stock: i32) -> Self {
        Self {
            id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            cost_price: product.cost_price,
            sale_price: product.sale_price,
            min_stock: product.min_stock,
            max_stock: product.max_stock,
            current_stock,
            stock_health: stock_health(current_stock, product.min_stock, product.max_stock),
            stock_status: stock_status(current_stock, product.min_stock, product.max_stock),
        }
    }
}

/// Score a stock level between 0 and 100.
///
/// Below the minimum the score scales linearly from 0 to 50, inside the
/// band it scales from 50 to 100, and above the maximum it decays back
/// towards 50 with the relative excess.
pub fn stock_health(current_stock: i32, min_stock: i32, max_stock: Option<i32>) -> f64 {
    let current = current_stock as f64;
    let min = min_stock as f64;
    let max = max_stock.unwrap_or(i32::MAX) as f64;

    if current < min {
        if min <= 0.0 {
            return 0.0;
        }
        (current / min * 50.0).max(0.0)
    } else if current > max {
        if max <= 0.0 {
            return 50.0;
        }
        let excess = current - max;
        (100.0 - excess / max * 50.0).max(50.0)
    } else {
        let range = max - min;
        if range <= 0.0 {
            return 100.0;
        }
        50.0 + (current - min) / range * 50.0
    }
}

/// Classify a stock level against the product's min/max band
pub fn stock_status(current_stock: i32, min_stock: i32, max_stock: Option<i32>) -> StockStatus {
    let max = max_stock.unwrap_or(i32::MAX);

    if (current_stock as f64) <= min_stock as f64 * 0.5 {
        StockStatus::Critical
    } else if current_stock < min_stock {
        StockStatus::Low
    } else if current_stock > max {
        StockStatus::Overstock
    } else {
        StockStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_health_bands() {
        // Inside the band: 50 at min, 100 at max
        assert_eq!(stock_health(50, 50, Some(150)), 50.0);
        assert_eq!(stock_health(100, 50, Some(150)), 75.0);
        assert_eq!(stock_health(150, 50, Some(150)), 100.0);

        // Below min scales 0..50
        assert_eq!(stock_health(25, 50, Some(150)), 25.0);
        assert_eq!(stock_health(0, 50, Some(150)), 0.0);

        // Above max decays towards 50
        assert_eq!(stock_health(150, 50, Some(100)), 75.0);
        assert_eq!(stock_health(1000, 50, Some(100)), 50.0);
    }

    #[test]
    fn test_stock_health_degenerate_bands() {
        assert_eq!(stock_health(-5, 0, None), 0.0);
        assert_eq!(stock_health(10, 0, Some(0)), 50.0);
        assert_eq!(stock_health(10, 10, Some(10)), 100.0);
    }

    #[test]
    fn test_stock_status() {
        assert_eq!(stock_status(20, 50, Some(200)), StockStatus::Critical);
        assert_eq!(stock_status(25, 50, Some(200)), StockStatus::Critical);
        assert_eq!(stock_status(30, 50, Some(200)), StockStatus::Low);
        assert_eq!(stock_status(100, 50, Some(200)), StockStatus::Ok);
        assert_eq!(stock_status(201, 50, Some(200)), StockStatus::Overstock);
        assert_eq!(stock_status(10_000, 50, None), StockStatus::Ok);
    }
}
