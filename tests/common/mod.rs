use anyhow::{Context, Result};
use tokio::net::TcpListener;

use protocol_admin_api::config::AppConfig;
use protocol_admin_api::database::Stores;
use protocol_admin_api::handlers::AppState;
use protocol_admin_api::routes;

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve a fresh in-memory application on an unused port.
///
/// The server task lives on the calling test's runtime, so every test gets
/// its own isolated data set.
pub async fn spawn_app() -> Result<TestServer> {
    spawn_with(AppConfig::development()).await
}

pub async fn spawn_with(config: AppConfig) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let state = AppState::new(Stores::in_memory(), config.api.clone(), None);
    let app = routes::app(state, &config.security);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    })
}
