use std::net::SocketAddr;

use anyhow::Context;
use newsdesk::{
    app_state::AppState,
    config::{Config, SourcesConfig},
    server, telemetry,
};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = Config::from_env()?;
    let sources = SourcesConfig::load(config.sources_path(), config.default_max_items())
        .with_context(|| format!("loading {}", config.sources_path().display()))?;
    info!(sources = sources.sources().len(), "feed sources loaded");
    if config.admin_token().is_none() {
        warn!("ADMIN_TOKEN not set, admin routes are open");
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(config.database_url())
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState::new(pool, &config, sources)?;
    let app = server::build_app(state, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("binding {}", config.bind_addr()))?;
    info!(addr = %config.bind_addr(), "listening");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
            info!("Received shutdown signal, initiating graceful shutdown...");
            shutdown.cancel();
        }
    });

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { shutdown.cancelled().await })
    .await?;

    info!("server stopped");
    Ok(())
}
