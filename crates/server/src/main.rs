mod bootstrap;
mod demo;
mod health;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use flack_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use flack_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Logging needs the loaded config, so it is initialized before bootstrap.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;
    let prefix = app.config.flack.normalized_prefix();
    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let drain_timeout = Duration::from_secs(app.config.server.graceful_shutdown_secs);

    let router = routes::router(Arc::new(app.dispatcher), &prefix)
        .merge(health::router(app.deliveries));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        url_prefix = %prefix,
        "flack-server listening"
    );

    axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown()).await?;

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        drain_timeout_secs = drain_timeout.as_secs(),
        "waiting for deferred deliveries to drain"
    );

    // The router owned the last queue handles; the worker finishes what is
    // already queued and then stops.
    match tokio::time::timeout(drain_timeout, app.delivery_worker).await {
        Ok(Ok(stats)) => tracing::info!(
            event_name = "system.server.stopped",
            correlation_id = "shutdown",
            delivered = stats.delivered,
            expired = stats.expired,
            failed = stats.failed,
            "delivery worker drained"
        ),
        Ok(Err(error)) => tracing::error!(
            event_name = "system.server.delivery_worker_failed",
            correlation_id = "shutdown",
            error = %error,
            "delivery worker terminated abnormally"
        ),
        Err(_) => tracing::warn!(
            event_name = "system.server.drain_timeout",
            correlation_id = "shutdown",
            "deferred deliveries still pending at shutdown; abandoning them"
        ),
    }

    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %error,
            "failed to listen for shutdown signal"
        );
        std::future::pending::<()>().await;
    }
}
