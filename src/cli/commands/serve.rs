use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::cli::commands::open_stores;
use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::routes;
use crate::seed::load_seed_data;

pub async fn handle(config: &AppConfig, port: Option<u16>, seed: bool) -> anyhow::Result<()> {
    let (stores, pool) = open_stores(&config.database).await?;
    if seed {
        load_seed_data(&stores).await.context("failed to load demo data")?;
    }

    let state = AppState::new(stores, config.api.clone(), pool);
    let app = routes::app(state, &config.security);

    let bind_addr = format!("{}:{}", config.server.host, port.unwrap_or(config.server.port));
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
