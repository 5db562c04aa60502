//! PostgreSQL connection
//!
//! Opens the shared pool and brings the schema up to date.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::database::{mask_database_url, DatabaseConfig};
use crate::config::EnvironmentConfig;

pub async fn connect(config: &EnvironmentConfig) -> Result<PgPool> {
    let db_config = DatabaseConfig::from(config);
    info!("Connecting to database {}", mask_database_url(&db_config.url));

    let pool = db_config
        .create_pool()
        .await
        .with_context(|| format!("database unreachable within {:?}", db_config.connect_timeout))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to apply database migrations")?;

    info!("Database ready");
    Ok(pool)
}
