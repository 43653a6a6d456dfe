use anyhow::{bail, Context};
use tracing::info;

use crate::cli::commands::open_stores;
use crate::config::{AppConfig, StorageBackend};
use crate::seed::load_seed_data;

pub async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    require_postgres(config, "migrate")?;
    open_stores(&config.database).await?;
    info!("Database schema is up to date");
    Ok(())
}

pub async fn seed(config: &AppConfig) -> anyhow::Result<()> {
    require_postgres(config, "seed")?;
    let (stores, _) = open_stores(&config.database).await?;
    let ids = load_seed_data(&stores).await.context("failed to load demo data")?;
    println!("Loaded {} demo records", ids.len());
    Ok(())
}

fn require_postgres(config: &AppConfig, command: &str) -> anyhow::Result<()> {
    if config.database.backend == StorageBackend::Memory {
        bail!("`{}` needs STORAGE_BACKEND=postgres, the in-memory store does not outlive the process", command);
    }
    Ok(())
}
