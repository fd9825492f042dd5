//! Validation utilities for catalog input
//!
//! Checks applied before a product enters the catalog. Forecasting code
//! tolerates missing profile fields, so only values that would corrupt the
//! replenishment math are rejected here.

use rust_decimal::Decimal;

use crate::models::NewProduct;

/// A rejected input field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

// ============================================================================
// Stock Level Validations
// ============================================================================

/// Validate the min/max stock band
pub fn validate_stock_band(min_stock: i32, max_stock: Option<i32>) -> Result<(), &'static str> {
    if min_stock < 0 {
        return Err("Minimum stock cannot be negative");
    }
    if let Some(max) = max_stock {
        if max < min_stock {
            return Err("Maximum stock must not be below minimum stock");
        }
    }
    Ok(())
}

/// Validate the optional reorder overrides
pub fn validate_reorder_settings(
    reorder_point: Option<i32>,
    reorder_quantity: Option<i32>,
) -> Result<(), &'static str> {
    if reorder_point.is_some_and(|p| p < 0) {
        return Err("Reorder point cannot be negative");
    }
    if reorder_quantity.is_some_and(|q| q <= 0) {
        return Err("Reorder quantity must be positive");
    }
    Ok(())
}

// ============================================================================
// Demand Profile Validations
// ============================================================================

/// Validate the statistical demand profile
pub fn validate_demand_profile(
    average_daily_sales: Option<f64>,
    sales_variability: Option<f64>,
    lead_time_days: Option<i32>,
) -> Result<(), &'static str> {
    if average_daily_sales.is_some_and(|s| !s.is_finite() || s < 0.0) {
        return Err("Average daily sales must be a non-negative number");
    }
    if sales_variability.is_some_and(|v| !v.is_finite() || v < 0.0) {
        return Err("Sales variability must be a non-negative number");
    }
    if lead_time_days.is_some_and(|d| d < 0) {
        return Err("Lead time cannot be negative");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate SKU format: 1-50 characters, no whitespace
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.is_empty() || sku.len() > 50 {
        return Err("SKU must be between 1 and 50 characters");
    }
    if sku.chars().any(char::is_whitespace) {
        return Err("SKU cannot contain whitespace");
    }
    Ok(())
}

/// Validate that a price is strictly positive
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price <= Decimal::ZERO {
        return Err("Price must be positive");
    }
    Ok(())
}

/// Run every check on a new product, reporting the first failing field
pub fn validate_new_product(product: &NewProduct) -> Result<(), FieldError> {
    validate_sku(&product.sku).map_err(|m| FieldError::new("sku", m))?;
    if product.name.trim().is_empty() {
        return Err(FieldError::new("name", "Name is required"));
    }
    validate_price(product.cost_price).map_err(|m| FieldError::new("cost_price", m))?;
    validate_price(product.sale_price).map_err(|m| FieldError::new("sale_price", m))?;
    validate_stock_band(product.min_stock, product.max_stock)
        .map_err(|m| FieldError::new("min_stock", m))?;
    validate_reorder_settings(product.reorder_point, product.reorder_quantity)
        .map_err(|m| FieldError::new("reorder_quantity", m))?;
    validate_demand_profile(
        product.average_daily_sales,
        product.sales_variability,
        product.lead_time_days,
    )
    .map_err(|m| FieldError::new("demand_profile", m))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_product() -> NewProduct {
        NewProduct {
            sku: "PARA-500".to_string(),
            name: "Paracetamol 500mg".to_string(),
            cost_price: Decimal::new(250, 2),
            sale_price: Decimal::new(499, 2),
            min_stock: 50,
            max_stock: Some(500),
            average_daily_sales: Some(12.0),
            sales_variability: Some(0.25),
            lead_time_days: Some(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_product_passes() {
        assert!(validate_new_product(&valid_product()).is_ok());
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("ABC-123").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_sku("ABC 123").is_err());
        assert!(validate_sku(&"X".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_stock_band() {
        assert!(validate_stock_band(10, Some(100)).is_ok());
        assert!(validate_stock_band(10, None).is_ok());
        assert!(validate_stock_band(10, Some(10)).is_ok());
        assert!(validate_stock_band(-1, None).is_err());
        assert!(validate_stock_band(100, Some(10)).is_err());
    }

    #[test]
    fn test_validate_reorder_settings() {
        assert!(validate_reorder_settings(None, None).is_ok());
        assert!(validate_reorder_settings(Some(0), Some(1)).is_ok());
        assert!(validate_reorder_settings(Some(-5), None).is_err());
        assert!(validate_reorder_settings(None, Some(0)).is_err());
    }

    #[test]
    fn test_validate_demand_profile() {
        assert!(validate_demand_profile(None, None, None).is_ok());
        assert!(validate_demand_profile(Some(0.0), Some(0.0), Some(0)).is_ok());
        assert!(validate_demand_profile(Some(-1.0), None, None).is_err());
        assert!(validate_demand_profile(Some(f64::NAN), None, None).is_err());
        assert!(validate_demand_profile(None, Some(-0.1), None).is_err());
        assert!(validate_demand_profile(None, None, Some(-2)).is_err());
    }

    #[test]
    fn test_first_failing_field_is_reported() {
        let mut product = valid_product();
        product.sale_price = Decimal::ZERO;
        let err = validate_new_product(&product).unwrap_err();
        assert_eq!(err.field, "sale_price");

        let mut product = valid_product();
        product.name = "   ".to_string();
        assert_eq!(validate_new_product(&product).unwrap_err().field, "name");
    }
}
