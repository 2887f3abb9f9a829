use anyhow::Result;
use meter_store::SqliteStore;
use meter_web::{config::AppConfig, metrics_server, observability, router, AppState};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    // Opening the store also creates the tables on first run.
    let store = SqliteStore::connect(
        &cfg.database.url,
        cfg.database.max_connections,
        cfg.database.busy_timeout(),
    )
    .await?;
    tracing::info!(url = %cfg.database.url, "meter store ready");

    let addr: SocketAddr = cfg
        .http
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid http.bind_addr: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "meter web listening");

    axum::serve(listener, router(AppState::new(store)).into_make_service()).await?;

    Ok(())
}
