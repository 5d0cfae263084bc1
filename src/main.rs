use anyhow::Context;
use clap::Parser;
use logistics_server::core::config::AppConfig;
use logistics_server::core::logger::init_logger;
use logistics_server::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal in production.
    let _ = dotenvy::dotenv();

    let config = AppConfig::parse();
    let _log_guard = init_logger(config.log_dir.as_deref());

    if let Err(e) = config.validate() {
        tracing::error!("Refusing to start: {}", e);
        anyhow::bail!(e);
    }

    let addr = SocketAddr::new(config.bind_address, config.port);
    let static_dir = config.static_dir.clone();
    tracing::info!(
        "SpotGo upstream: {} (timeout {}s)",
        config.spotgo.base_url,
        config.upstream_timeout_secs
    );

    let state = Arc::new(AppState::new(config).context("Failed to init state")?);
    let app = logistics_server::build_app(state, static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
