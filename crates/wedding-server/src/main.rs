mod config;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use wedding_api::AppStateInner;
use wedding_api::assets::Frontend;
use wedding_db::Database;

use crate::config::Config;

/// Used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "wedding=debug,wedding_api=debug,wedding_db=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    // Init database; tables are created here if missing
    let db = Database::open(&config.database_url)
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    let frontend = Frontend::discover(&config.frontend_dir);

    if config.cors_origins.is_none() {
        warn!("CORS allows every origin; set WEDDING_CORS_ORIGINS to restrict it");
    }

    let app = wedding_api::router(AppStateInner::new(db), &frontend)
        .layer(config.cors_layer())
        .layer(TraceLayer::new_for_http());

    info!("Wedding server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

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
                warn!("Failed to install SIGTERM handler: {}", e);
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
