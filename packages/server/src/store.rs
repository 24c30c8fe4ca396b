//! Store selection for the binaries.

use std::sync::Arc;

use anyhow::{Context, Result};
use handle_directory::{MemoryStore, PostgresStore};
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::server::SharedStore;

/// Connect to PostgreSQL when `DATABASE_URL` is set, otherwise fall back to
/// an in-memory store that lives as long as the process.
pub async fn connect_store(config: &Config) -> Result<SharedStore> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    let store = PostgresStore::from_pool(pool)
        .await
        .context("Failed to prepare directory schema")?;
    Ok(Arc::new(store))
}
