//! Common library for the users service
//!
//! This crate provides the shared PostgreSQL plumbing used by the service:
//! connection configuration, pooling, health checks and schema setup.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool, init_schema};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     health_check(&pool).await?;
//!     init_schema(&pool).await?;
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
