//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use shared::{Inventory, NewProduct, Product};
use stockcast_backend::config::ForecastConfig;
use stockcast_backend::repositories::InMemoryStore;
use stockcast_backend::{AppState, Config};
use uuid::Uuid;

pub const TEST_SEED: u64 = 42;

pub fn test_config() -> Config {
    Config {
        forecast: ForecastConfig {
            seed: Some(TEST_SEED),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn product(sku: &str, min_stock: i32, max_stock: Option<i32>) -> Product {
    NewProduct {
        sku: sku.to_string(),
        name: format!("Product {}", sku),
        cost_price: Decimal::new(250, 2),
        sale_price: Decimal::new(400, 2),
        min_stock,
        max_stock,
        ..Default::default()
    }
    .into_product(Uuid::new_v4(), Utc::now())
}

pub fn stock(product_id: Uuid, warehouse_id: Uuid, quantity: i32) -> Inventory {
    Inventory {
        id: Uuid::new_v4(),
        product_id,
        warehouse_id,
        warehouse_name: Some("Main".to_string()),
        current_stock: quantity,
        reserved_stock: 0,
        available_stock: quantity,
        batch_number: None,
        expiration_date: None,
        last_stock_check: None,
        last_movement: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

/// A batch expiring `days` whole days after `now`
pub fn expiring_batch(product_id: Uuid, batch: &str, now: DateTime<Utc>, days: i64) -> Inventory {
    Inventory {
        batch_number: Some(batch.to_string()),
        expiration_date: Some(now + Duration::days(days) + Duration::hours(1)),
        ..stock(product_id, Uuid::new_v4(), 10)
    }
}

pub async fn seeded_state(store: Arc<InMemoryStore>) -> AppState {
    AppState::in_memory(test_config(), store).unwrap()
}
