//! Stockcast - inventory demand forecasting and replenishment alerting
//!
//! Forecasts product demand, turns forecasts into replenishment urgency,
//! periodically scans stock for alert conditions and serves an aggregated
//! dashboard over a small HTTP API.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod external;
pub mod forecast;
pub mod handlers;
pub mod repositories;
pub mod routes;
pub mod services;

pub use config::Config;

use error::AppResult;
use external::MlServiceClient;
use forecast::ForecastSource;
use repositories::{
    AlertRepository, InMemoryStore, InventoryRepository, PgAlertRepository, PgInventoryRepository,
    PgProductRepository, ProductRepository,
};
use services::{
    AlertScheduler, AlertService, DashboardService, InventoryService, PredictionService,
    ProductService,
};

/// Services wired over one set of repositories
#[derive(Clone)]
pub struct Services {
    pub products: ProductService,
    pub inventory: InventoryService,
    pub predictions: PredictionService,
    pub alerts: AlertService,
    pub dashboard: DashboardService,
}

impl Services {
    pub fn new(
        config: &Config,
        products: Arc<dyn ProductRepository>,
        inventory: Arc<dyn InventoryRepository>,
        alerts: Arc<dyn AlertRepository>,
        forecasts: Arc<ForecastSource>,
    ) -> Self {
        let product_service = ProductService::new(products.clone(), inventory.clone());
        let predictions = PredictionService::new(
            products.clone(),
            inventory.clone(),
            forecasts,
            config.alerts.max_concurrency,
        );
        let alert_service = AlertService::new(
            products,
            inventory.clone(),
            alerts.clone(),
            predictions.clone(),
            config.alerts.clone(),
        );
        let dashboard = DashboardService::new(
            product_service.clone(),
            inventory.clone(),
            alerts,
            predictions.clone(),
            config.dashboard.clone(),
            config.alerts.expiring_window_days,
        );

        Self {
            products: product_service,
            inventory: InventoryService::new(inventory),
            predictions,
            alerts: alert_service,
            dashboard,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub services: Services,
    pub ml_client: MlServiceClient,
    pub scheduler: Arc<AlertScheduler>,
}

impl AppState {
    pub fn new(
        config: Config,
        products: Arc<dyn ProductRepository>,
        inventory: Arc<dyn InventoryRepository>,
        alerts: Arc<dyn AlertRepository>,
    ) -> AppResult<Self> {
        let forecasts = Arc::new(ForecastSource::from_config(&config.forecast)?);
        let ml_client = MlServiceClient::new(
            &config.forecast.ml_service_url,
            config.forecast.request_timeout(),
        )?;

        let services = Services::new(&config, products, inventory, alerts, forecasts);
        let scheduler = Arc::new(AlertScheduler::new(services.alerts.clone()));

        Ok(Self {
            config: Arc::new(config),
            services,
            ml_client,
            scheduler,
        })
    }

    /// State backed by PostgreSQL
    pub fn with_postgres(config: Config, db: PgPool) -> AppResult<Self> {
        Self::new(
            config,
            Arc::new(PgProductRepository::new(db.clone())),
            Arc::new(PgInventoryRepository::new(db.clone())),
            Arc::new(PgAlertRepository::new(db)),
        )
    }

    /// State backed by a single in-memory store
    pub fn in_memory(config: Config, store: Arc<InMemoryStore>) -> AppResult<Self> {
        Self::new(config, store.clone(), store.clone(), store)
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
