use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod models;
mod routes;
mod service;
mod settings;
mod state;

use common::database::{DatabaseConfig, health_check, init_pool, init_schema};
use tokio::net::TcpListener;

use crate::{service::PgUserService, settings::ServerConfig, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Before anything reads the environment, RUST_LOG included
    let env_file = settings::load_env_file();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match env_file {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => info!("No .env file loaded, using process environment: {}", e),
    }

    let server_config = ServerConfig::from_env()?;
    info!("Starting {}", server_config.service_name);

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    health_check(&pool).await?;
    info!("Database connection successful");

    init_schema(&pool).await?;

    let user_service = Arc::new(PgUserService::new(pool));
    let app_state = AppState::new(user_service, server_config.service_name.clone());

    // Start the web server
    let app = routes::create_router(app_state);

    let addr = server_config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    info!("Health check: http://{}/health", addr);
    info!("RPC endpoint: http://{}{}", addr, routes::RPC_PREFIX);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("{} stopped", server_config.service_name);
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
