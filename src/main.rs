//! Wallet Service - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router around the balance service
//! 5. Start server on configured port

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wallet_service::{
    BalanceService, PgWalletStore, UpdateSerialization,
    app::{self, AppState},
    config, db,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let serialization = config.update_serialization();
    if serialization == UpdateSerialization::Global {
        tracing::warn!("Global update lock enabled: balance updates run one at a time");
    }

    let store = PgWalletStore::new(pool, serialization, config.update_timeout());
    let state = AppState {
        service: BalanceService::new(Arc::new(store)),
    };

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app::router(state)).await?;

    Ok(())
}
