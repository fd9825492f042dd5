//! PostgreSQL adapters for the storage ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{Alert, AlertSeverity, AlertType, Inventory, Product};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{AlertRepository, InventoryRepository, ProductRepository};
use crate::error::{AppError, AppResult};

const PRODUCT_COLUMNS: &str = r#"
    p.id, p.sku, p.name, p.description, p.category, p.brand, p.unit,
    p.cost_price, p.sale_price, p.min_stock, p.max_stock, p.reorder_point,
    p.reorder_quantity, p.active, p.perishable, p.shelf_life_days,
    p.average_daily_sales, p.sales_variability, p.lead_time_days,
    p.created_at, p.updated_at
"#;

const INVENTORY_COLUMNS: &str = r#"
    id, product_id, warehouse_id, warehouse_name, current_stock, reserved_stock,
    available_stock, batch_number, expiration_date, last_stock_check,
    last_movement, created_at, updated_at
"#;

const ALERT_COLUMNS: &str = r#"
    id, product_id, warehouse_id, alert_type, severity, message, recommendation,
    resolved, resolved_at, resolved_by, created_at, last_observed_at
"#;

/// Row for product queries
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    sku: String,
    name: String,
    description: Option<String>,
    category: Option<String>,
    brand: Option<String>,
    unit: Option<String>,
    cost_price: Decimal,
    sale_price: Decimal,
    min_stock: i32,
    max_stock: Option<i32>,
    reorder_point: Option<i32>,
    reorder_quantity: Option<i32>,
    active: bool,
    perishable: bool,
    shelf_life_days: Option<i32>,
    average_daily_sales: Option<f64>,
    sales_variability: Option<f64>,
    lead_time_days: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            sku: r.sku,
            name: r.name,
            description: r.description,
            category: r.category,
            brand: r.brand,
            unit: r.unit,
            cost_price: r.cost_price,
            sale_price: r.sale_price,
            min_stock: r.min_stock,
            max_stock: r.max_stock,
            reorder_point: r.reorder_point,
            reorder_quantity: r.reorder_quantity,
            active: r.active,
            perishable: r.perishable,
            shelf_life_days: r.shelf_life_days,
            average_daily_sales: r.average_daily_sales,
            sales_variability: r.sales_variability,
            lead_time_days: r.lead_time_days,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Row for inventory queries
#[derive(Debug, FromRow)]
struct InventoryRow {
    id: Uuid,
    product_id: Uuid,
    warehouse_id: Uuid,
    warehouse_name: Option<String>,
    current_stock: i32,
    reserved_stock: i32,
    available_stock: i32,
    batch_number: Option<String>,
    expiration_date: Option<DateTime<Utc>>,
    last_stock_check: Option<DateTime<Utc>>,
    last_movement: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<InventoryRow> for Inventory {
    fn from(r: InventoryRow) -> Self {
        Inventory {
            id: r.id,
            product_id: r.product_id,
            warehouse_id: r.warehouse_id,
            warehouse_name: r.warehouse_name,
            current_stock: r.current_stock,
            reserved_stock: r.reserved_stock,
            available_stock: r.available_stock,
            batch_number: r.batch_number,
            expiration_date: r.expiration_date,
            last_stock_check: r.last_stock_check,
            last_movement: r.last_movement,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Row for alert queries; type and severity are stored as text tags
#[derive(Debug, FromRow)]
struct AlertRow {
    id: Uuid,
    product_id: Uuid,
    warehouse_id: Option<Uuid>,
    alert_type: String,
    severity: String,
    message: String,
    recommendation: String,
    resolved: bool,
    resolved_at: Option<DateTime<Utc>>,
    resolved_by: Option<String>,
    created_at: DateTime<Utc>,
    last_observed_at: DateTime<Utc>,
}

impl TryFrom<AlertRow> for Alert {
    type Error = AppError;

    fn try_from(r: AlertRow) -> Result<Self, Self::Error> {
        Ok(Alert {
            id: r.id,
            product_id: r.product_id,
            warehouse_id: r.warehouse_id,
            alert_type: r.alert_type.parse()?,
            severity: r.severity.parse()?,
            message: r.message,
            recommendation: r.recommendation,
            resolved: r.resolved,
            resolved_at: r.resolved_at,
            resolved_by: r.resolved_by,
            created_at: r.created_at,
            last_observed_at: r.last_observed_at,
        })
    }
}

fn into_alerts(rows: Vec<AlertRow>) -> AppResult<Vec<Alert>> {
    rows.into_iter().map(Alert::try_from).collect()
}

// ============================================================================
// Products
// ============================================================================

/// Product catalog backed by the `products` table
#[derive(Clone)]
pub struct PgProductRepository {
    db: PgPool,
}

impl PgProductRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn fetch_products(&self, sql: &str) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(sql)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.sku = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(sku)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn find_active(&self) -> AppResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.active = true ORDER BY p.name"
        );
        self.fetch_products(&sql).await
    }

    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.category = $1 ORDER BY p.name"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(category)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_low_stock(&self) -> AppResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN inventory i ON i.product_id = p.id
            GROUP BY p.id
            HAVING COALESCE(SUM(i.current_stock), 0) < p.min_stock
            ORDER BY p.name
            "#
        );
        self.fetch_products(&sql).await
    }

    async fn find_overstock(&self) -> AppResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            JOIN inventory i ON i.product_id = p.id
            WHERE p.max_stock IS NOT NULL
            GROUP BY p.id
            HAVING SUM(i.current_stock) > p.max_stock
            ORDER BY p.name
            "#
        );
        self.fetch_products(&sql).await
    }

    async fn find_expiring(&self, now: DateTime<Utc>, within_days: i64) -> AppResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            WHERE p.perishable = true
            AND EXISTS (
                SELECT 1 FROM inventory i
                WHERE i.product_id = p.id
                AND i.expiration_date < $1 + make_interval(days => $2)
            )
            ORDER BY p.name
            "#
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(now)
            .bind(within_days as i32)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn insert(&self, product: Product) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (
                id, sku, name, description, category, brand, unit, cost_price, sale_price,
                min_stock, max_stock, reorder_point, reorder_quantity, active, perishable,
                shelf_life_days, average_daily_sales, sales_variability, lead_time_days, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING id, sku, name, description, category, brand, unit, cost_price, sale_price,
                      min_stock, max_stock, reorder_point, reorder_quantity, active, perishable,
                      shelf_life_days, average_daily_sales, sales_variability, lead_time_days,
                      created_at, updated_at
            "#,
        )
        .bind(product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(&product.brand)
        .bind(&product.unit)
        .bind(product.cost_price)
        .bind(product.sale_price)
        .bind(product.min_stock)
        .bind(product.max_stock)
        .bind(product.reorder_point)
        .bind(product.reorder_quantity)
        .bind(product.active)
        .bind(product.perishable)
        .bind(product.shelf_life_days)
        .bind(product.average_daily_sales)
        .bind(product.sales_variability)
        .bind(product.lead_time_days)
        .bind(product.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::DuplicateEntry("sku".to_string())
            }
            other => AppError::DatabaseError(other),
        })?;

        Ok(row.into())
    }
}

// ============================================================================
// Inventory
// ============================================================================

/// Stock records backed by the `inventory` table
#[derive(Clone)]
pub struct PgInventoryRepository {
    db: PgPool,
}

impl PgInventoryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InventoryRepository for PgInventoryRepository {
    async fn find_by_product(&self, product_id: Uuid) -> AppResult<Vec<Inventory>> {
        let sql = format!("SELECT {INVENTORY_COLUMNS} FROM inventory WHERE product_id = $1");
        let rows = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(product_id)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Inventory::from).collect())
    }

    async fn find_by_warehouse(&self, warehouse_id: Uuid) -> AppResult<Vec<Inventory>> {
        let sql = format!("SELECT {INVENTORY_COLUMNS} FROM inventory WHERE warehouse_id = $1");
        let rows = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(warehouse_id)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Inventory::from).collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Inventory>> {
        let sql = format!("SELECT {INVENTORY_COLUMNS} FROM inventory");
        let rows = sqlx::query_as::<_, InventoryRow>(&sql)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Inventory::from).collect())
    }

    async fn total_inventory_value(&self) -> AppResult<Decimal> {
        let value = sqlx::query_scalar::<_, Option<Decimal>>(
            r#"
            SELECT SUM(i.current_stock * p.cost_price)
            FROM inventory i
            JOIN products p ON p.id = i.product_id
            "#,
        )
        .fetch_one(&self.db)
        .await?
        .unwrap_or(Decimal::ZERO);

        Ok(value)
    }

    async fn count_warehouses(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT warehouse_id) FROM inventory")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn adjust_stock(
        &self,
        product_id: Uuid,
        warehouse_id: Uuid,
        delta: i32,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE inventory
            SET current_stock = current_stock + $1,
                available_stock = current_stock + $1 - reserved_stock,
                last_movement = $2,
                updated_at = $2
            WHERE product_id = $3 AND warehouse_id = $4
            "#,
        )
        .bind(delta)
        .bind(at)
        .bind(product_id)
        .bind(warehouse_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Alerts
// ============================================================================

/// Alert log backed by the `alerts` table
#[derive(Clone)]
pub struct PgAlertRepository {
    db: PgPool,
}

impl PgAlertRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlertRepository for PgAlertRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>> {
        let sql = format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE id = $1");
        sqlx::query_as::<_, AlertRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .map(Alert::try_from)
            .transpose()
    }

    async fn find_unresolved(&self) -> AppResult<Vec<Alert>> {
        let sql = format!(
            "SELECT {ALERT_COLUMNS} FROM alerts WHERE resolved = false ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, AlertRow>(&sql)
            .fetch_all(&self.db)
            .await?;
        into_alerts(rows)
    }

    async fn find_unresolved_by_product(&self, product_id: Uuid) -> AppResult<Vec<Alert>> {
        let sql = format!(
            r#"
            SELECT {ALERT_COLUMNS} FROM alerts
            WHERE product_id = $1 AND resolved = false
            ORDER BY created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, AlertRow>(&sql)
            .bind(product_id)
            .fetch_all(&self.db)
            .await?;
        into_alerts(rows)
    }

    async fn find_unresolved_by_severity(&self, severity: AlertSeverity) -> AppResult<Vec<Alert>> {
        let sql = format!(
            r#"
            SELECT {ALERT_COLUMNS} FROM alerts
            WHERE severity = $1 AND resolved = false
            ORDER BY created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, AlertRow>(&sql)
            .bind(severity.as_str())
            .fetch_all(&self.db)
            .await?;
        into_alerts(rows)
    }

    async fn find_recent(&self, since: DateTime<Utc>) -> AppResult<Vec<Alert>> {
        let sql = format!(
            r#"
            SELECT {ALERT_COLUMNS} FROM alerts
            WHERE created_at >= $1
            ORDER BY CASE severity WHEN 'HIGH' THEN 0 WHEN 'MEDIUM' THEN 1 ELSE 2 END,
                     created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, AlertRow>(&sql)
            .bind(since)
            .fetch_all(&self.db)
            .await?;
        into_alerts(rows)
    }

    async fn count_unresolved_by_severity(&self, severity: AlertSeverity) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM alerts WHERE resolved = false AND severity = $1",
        )
        .bind(severity.as_str())
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    async fn find_open(
        &self,
        product_id: Uuid,
        alert_type: AlertType,
        warehouse_id: Option<Uuid>,
    ) -> AppResult<Option<Alert>> {
        let sql = format!(
            r#"
            SELECT {ALERT_COLUMNS} FROM alerts
            WHERE product_id = $1 AND alert_type = $2
            AND warehouse_id IS NOT DISTINCT FROM $3
            AND resolved = false
            ORDER BY created_at DESC
            LIMIT 1
            "#
        );
        sqlx::query_as::<_, AlertRow>(&sql)
            .bind(product_id)
            .bind(alert_type.as_str())
            .bind(warehouse_id)
            .fetch_optional(&self.db)
            .await?
            .map(Alert::try_from)
            .transpose()
    }

    async fn insert(&self, alert: Alert) -> AppResult<Alert> {
        let sql = format!(
            r#"
            INSERT INTO alerts (
                id, product_id, warehouse_id, alert_type, severity, message, recommendation,
                resolved, resolved_at, resolved_by, created_at, last_observed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {ALERT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, AlertRow>(&sql)
            .bind(alert.id)
            .bind(alert.product_id)
            .bind(alert.warehouse_id)
            .bind(alert.alert_type.as_str())
            .bind(alert.severity.as_str())
            .bind(&alert.message)
            .bind(&alert.recommendation)
            .bind(alert.resolved)
            .bind(alert.resolved_at)
            .bind(&alert.resolved_by)
            .bind(alert.created_at)
            .bind(alert.last_observed_at)
            .fetch_one(&self.db)
            .await?;

        row.try_into()
    }

    async fn touch(&self, id: Uuid, observed_at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE alerts SET last_observed_at = $1 WHERE id = $2")
            .bind(observed_at)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn resolve(
        &self,
        id: Uuid,
        resolved_by: &str,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Alert>> {
        let sql = format!(
            r#"
            UPDATE alerts
            SET resolved = true, resolved_at = $1, resolved_by = $2
            WHERE id = $3
            RETURNING {ALERT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, AlertRow>(&sql)
            .bind(at)
            .bind(resolved_by)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .map(Alert::try_from)
            .transpose()
    }
}
