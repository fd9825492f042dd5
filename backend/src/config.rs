//! Configuration management for the Stockcast backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with STOCKCAST_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Demand forecasting configuration
    pub forecast: ForecastConfig,

    /// Scheduled alert generation configuration
    pub alerts: AlertConfig,

    /// Dashboard aggregation limits
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Base URL of the external ML forecasting service
    pub ml_service_url: String,

    /// Ask the ML service first and fall back to the local simulator
    pub remote_enabled: bool,

    /// Per-request timeout for ML service calls, in seconds
    pub request_timeout_secs: u64,

    /// Fixed seed for the local simulator; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl ForecastConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertConfig {
    /// Run the scheduled alert generator
    pub enabled: bool,

    /// Seconds between alert generation cycles
    pub interval_secs: u64,

    /// Inventory expiring within this many days raises an EXPIRING alert
    pub expiring_window_days: i64,

    /// Expiring alerts at or under this many days are HIGH severity
    pub expiring_high_days: i64,

    /// Forecasts below this confidence raise an ANOMALY alert
    pub anomaly_confidence_threshold: f64,

    /// Refresh an open alert for the same condition instead of inserting a new one
    pub deduplicate: bool,

    /// Maximum per-product evaluations in flight within one pass
    pub max_concurrency: usize,
}

impl AlertConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 300,
            expiring_window_days: 7,
            expiring_high_days: 3,
            anomaly_confidence_threshold: 60.0,
            deduplicate: true,
            max_concurrency: 8,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Look-back window for the recent alert list, in hours
    pub recent_alert_hours: i64,

    /// Maximum entries per critical product list
    pub list_limit: usize,

    /// Maximum urgent predictions
    pub urgent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_alert_hours: 24,
            list_limit: 5,
            urgent_limit: 10,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("STOCKCAST_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("forecast.ml_service_url", "http://localhost:5000")?
            .set_default("forecast.remote_enabled", false)?
            .set_default("forecast.request_timeout_secs", 10)?
            .set_default("alerts.enabled", true)?
            .set_default("alerts.interval_secs", 300)?
            .set_default("alerts.expiring_window_days", 7)?
            .set_default("alerts.expiring_high_days", 3)?
            .set_default("alerts.anomaly_confidence_threshold", 60.0)?
            .set_default("alerts.deduplicate", true)?
            .set_default("alerts.max_concurrency", 8)?
            .set_default("dashboard.recent_alert_hours", 24)?
            .set_default("dashboard.list_limit", 5)?
            .set_default("dashboard.urgent_limit", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (STOCKCAST_ prefix)
            .add_source(
                Environment::with_prefix("STOCKCAST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/stockcast".to_string(),
            max_connections: 10,
            min_connections: 2,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            ml_service_url: "http://localhost:5000".to_string(),
            remote_enabled: false,
            request_timeout_secs: 10,
            seed: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            forecast: ForecastConfig::default(),
            alerts: AlertConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}
