use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use rest_server::config::{ServerConfig, StoreKind};
use rest_server::{telemetry, AppState, BearerToken, MemoryStore, PgStore, Store, ROUTES};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment and flags still apply.
    let _ = dotenv::dotenv();
    telemetry::init();

    let config = ServerConfig::parse();

    let (store, pg): (Arc<dyn Store>, Option<PgStore>) = match config.store {
        StoreKind::Memory => (Arc::new(MemoryStore::new()), None),
        StoreKind::Postgres => {
            let pg = PgStore::connect(
                config.database.connect_options(),
                &config.database.pool_settings(),
            )
            .await
            .context("failed to initialize database")?;
            (Arc::new(pg.clone()), Some(pg))
        }
    };

    let state = AppState::new(store, BearerToken::new(config.bearer_token.as_str()))
        .with_expose_config(config.expose_config);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;

    tracing::info!(addr = %listener.local_addr()?, store = ?config.store, "server started");
    for (method, path, auth) in ROUTES {
        tracing::info!(method, path, auth, "route");
    }
    if config.expose_config {
        tracing::warn!("GET /config exposes the bearer token without authentication");
    }

    rest_server::run(listener, state, shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pg) = pg {
        pg.close().await;
    }
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
