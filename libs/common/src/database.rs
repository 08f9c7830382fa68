//! Database module for handling PostgreSQL connections and operations
//!
//! This module provides connection pooling, configuration, health checks
//! and idempotent schema setup for the PostgreSQL database.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, postgres::PgConnectOptions, postgres::PgPoolOptions};
use std::{env, time::Duration};
use tracing::{error, info};

/// Schema for the users table. Safe to run on every startup.
pub const USERS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) UNIQUE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
"#;

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `DATABASE_URL`: PostgreSQL connection URL. When unset the URL is built from
    ///   `DB_HOST` (localhost), `DB_PORT` (5432), `DB_USER` (postgres),
    ///   `DB_PASSWORD` (postgres), `DB_NAME` (users_db) and `DB_SSLMODE` (disable)
    /// - `DATABASE_MAX_CONNECTIONS`: Maximum number of connections (default: 10)
    /// - `DATABASE_MIN_CONNECTIONS`: Minimum number of connections (default: 1)
    /// - `DATABASE_CONNECTION_TIMEOUT`: Acquire timeout in seconds (default: 30)
    pub fn from_env() -> DatabaseResult<Self> {
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| url_from_parts());

        let max_connections = env_or("DATABASE_MAX_CONNECTIONS", 10);
        let min_connections = env_or("DATABASE_MIN_CONNECTIONS", 1);
        let connection_timeout = env_or("DATABASE_CONNECTION_TIMEOUT", 30);

        if min_connections > max_connections {
            return Err(DatabaseError::Configuration(format!(
                "DATABASE_MIN_CONNECTIONS ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                min_connections, max_connections
            )));
        }

        Ok(Self {
            database_url,
            max_connections,
            min_connections,
            connection_timeout,
        })
    }
}

fn url_from_parts() -> String {
    let var = |key: &str, default: &str| env::var(key).unwrap_or_else(|_| default.to_string());

    format!(
        "postgresql://{}:{}@{}:{}/{}?sslmode={}",
        var("DB_USER", "postgres"),
        var("DB_PASSWORD", "postgres"),
        var("DB_HOST", "localhost"),
        var("DB_PORT", "5432"),
        var("DB_NAME", "users_db"),
        var("DB_SSLMODE", "disable"),
    )
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Initialize a PostgreSQL connection pool
///
/// # Arguments
///
/// * `config` - Database configuration
///
/// # Returns
///
/// * `DatabaseResult<PgPool>` - PostgreSQL connection pool or error
pub async fn init_pool(config: &DatabaseConfig) -> DatabaseResult<PgPool> {
    info!("Initializing database connection pool");

    let options: PgConnectOptions = config
        .database_url
        .parse()
        .map_err(|e| DatabaseError::Configuration(format!("Invalid database URL: {}", e)))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connection)?;

    info!("Database connection pool initialized successfully");
    Ok(pool)
}

/// Check database connectivity
///
/// # Arguments
///
/// * `pool` - PostgreSQL connection pool
///
/// # Returns
///
/// * `DatabaseResult<bool>` - True if the database answered, `DatabaseError::Query` otherwise
pub async fn health_check(pool: &PgPool) -> DatabaseResult<bool> {
    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        error!("Database health check failed: {}", e);
        DatabaseError::Query(e)
    })?;

    Ok(true)
}

/// Create the users table and its email index if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> DatabaseResult<()> {
    sqlx::raw_sql(USERS_SCHEMA)
        .execute(pool)
        .await
        .map_err(DatabaseError::Migration)?;

    info!("Database schema initialized successfully");
    Ok(())
}
