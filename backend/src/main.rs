//! Stockcast - Backend Server
//!
//! Demand forecasting and replenishment alerting for multi-warehouse
//! product inventories.

use std::{net::SocketAddr, time::Duration};

use sqlx::postgres::PgPoolOptions;
use stockcast_backend::{create_app, AppState, Config};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "stockcast_server=debug,stockcast_backend=debug,tower_http=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Stockcast Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    if config.forecast.remote_enabled {
        tracing::info!("Forecasting via ML service at {}", config.forecast.ml_service_url);
    } else {
        tracing::info!("Forecasting with the local simulator");
    }

    let state = AppState::with_postgres(config.clone(), db_pool)?;

    // Alert scheduler
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_handle = if config.alerts.enabled {
        Some(state.scheduler.clone().spawn(config.alerts.interval(), shutdown_rx))
    } else {
        tracing::info!("Alert scheduler disabled");
        None
    };

    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received");
        })
        .await?;

    shutdown_tx.send(true).ok();
    if let Some(handle) = scheduler_handle {
        handle.await.ok();
    }

    Ok(())
}
