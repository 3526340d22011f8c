//! menu-cloud: QR menu ordering service
//!
//! Long-running service that:
//! - Accepts customer orders and waiter calls gated by per-table QR tokens
//! - Advances orders `placed → preparing` (lazily on reads and from a sweeper)
//! - Records item co-occurrence when orders complete
//! - Serves frequently-bought-together / pairing / similar-item recommendations
//! - Provides the owner management API (JWT authenticated)

mod api;
mod auth;
mod config;
mod db;
mod error;
mod services;
mod settings;
mod state;
mod util;

use std::net::SocketAddr;
use std::time::Duration;

use config::Config;
use services::lifecycle::OrderSweeper;
use state::AppState;
use tokio_util::sync::CancellationToken;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "menu_cloud=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting menu-cloud (env: {})", config.environment);

    let state = AppState::new(&config).await?;
    let shutdown = CancellationToken::new();

    // Background: order sweeper
    let sweeper = OrderSweeper::new(state.pool.clone(), state.settings.clone(), shutdown.clone());
    let sweeper_handle = tokio::spawn(sweeper.run());

    // Background: rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    let cleanup_shutdown = shutdown.clone();
    let cleanup_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            tokio::select! {
                _ = cleanup_shutdown.cancelled() => break,
                _ = interval.tick() => rate_limiter.cleanup().await,
            }
        }
    });

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("menu-cloud HTTP listening on {http_addr}");

    let server_shutdown = shutdown.clone();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
        }
        tracing::info!("Shutdown signal received");
        server_shutdown.cancel();
    })
    .await?;

    shutdown.cancel();
    let _ = tokio::join!(sweeper_handle, cleanup_handle);
    tracing::info!("menu-cloud stopped");

    Ok(())
}
