//! Inventory models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock of one product held in one warehouse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Inventory {
    pub id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub warehouse_name: Option<String>,
    pub current_stock: i32,
    /// Stock committed to open orders
    pub reserved_stock: i32,
    /// current_stock - reserved_stock
    pub available_stock: i32,
    pub batch_number: Option<String>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub last_stock_check: Option<DateTime<Utc>>,
    pub last_movement: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Inventory {
    /// Whole days between `now` and the expiration date, negative once expired
    pub fn days_until_expiration(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expiration_date.map(|exp| (exp - now).num_days())
    }

    /// True when the record expires before `now + days`
    pub fn expires_within(&self, now: DateTime<Utc>, days: i64) -> bool {
        match self.expiration_date {
            Some(exp) => exp < now + Duration::days(days),
            None => false,
        }
    }
}

/// Total stock of a product across all of its warehouse records, saturating at the `i32` bounds
pub fn total_stock(records: &[Inventory]) -> i32 {
    records
        .iter()
        .fold(0i32, |total, r| total.saturating_add(r.current_stock))
}
