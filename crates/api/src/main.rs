//! Daybook - schedule/calendar sync and forecast service
//!
//! Main entry point for the HTTP server.

use std::sync::Arc;

use daybook_api::{router, AppContext};
use daybook_domain::{DaybookError, Result};
use daybook_infra::config;
use daybook_infra::observability::init_tracing;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading configuration so DAYBOOK_* variables apply
    let dotenv = dotenvy::dotenv();

    let config = config::load()?;
    init_tracing(&config.logging)?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "could not load .env file"),
    }

    let bind_addr = config.server.bind_addr.clone();
    let context = Arc::new(AppContext::new(config)?);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| DaybookError::Config(format!("cannot bind {bind_addr}: {err}")))?;
    info!(%bind_addr, "Daybook listening");

    axum::serve(listener, router(context))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| DaybookError::Internal(format!("server error: {err}")))?;

    info!("Daybook stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
