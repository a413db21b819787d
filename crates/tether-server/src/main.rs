mod config;
mod stats;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use tether_api::state::AppStateInner;
use tether_core::{BindingService, MemoryCodeStore};
use tether_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tether=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init storage
    let db = Arc::new(Database::open(&config.db_path)?);
    info!("{} existing bindings", db.count_bindings()?);
    let codes = Arc::new(MemoryCodeStore::new());

    tokio::spawn(stats::run_stats_loop(
        codes.clone(),
        db.clone(),
        stats::STATS_INTERVAL,
    ));

    let service = Arc::new(BindingService::new(codes, db));
    service.add_observer(|binding| {
        info!(
            chat_id = %binding.chat_id,
            game_id = %binding.game_id,
            "Binding created"
        );
    });

    let state = AppStateInner::new(service, config.access_token);

    let app = tether_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Tether server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
