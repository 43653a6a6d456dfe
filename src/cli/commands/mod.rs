pub mod database;
pub mod serve;

use anyhow::Context;
use sqlx::PgPool;

use crate::config::{DatabaseConfig, StorageBackend};
use crate::database::{DatabaseManager, Stores};

/// Open the configured backend. Postgres pools are migrated before use.
pub async fn open_stores(config: &DatabaseConfig) -> anyhow::Result<(Stores, Option<PgPool>)> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store, data is lost on shutdown");
            Ok((Stores::in_memory(), None))
        }
        StorageBackend::Postgres => {
            let pool = DatabaseManager::connect(config)
                .await
                .context("failed to connect to the database")?;
            DatabaseManager::migrate(&pool)
                .await
                .context("failed to apply the database schema")?;
            Ok((Stores::postgres(pool.clone()), Some(pool)))
        }
    }
}
