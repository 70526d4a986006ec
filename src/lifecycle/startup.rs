//! Startup orchestration.
//!
//! # Responsibilities
//! - Install the metrics recorder when enabled
//! - Build services and the dispatcher from configuration
//! - Sweep idle sessions in the background until shutdown
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Route table problems surface before the listener binds
//! - Draining is bounded by [`DRAIN_TIMEOUT`]

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::app::{bootstrap, AppServices};
use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{Shutdown, DRAIN_TIMEOUT};
use crate::lifecycle::signals::wait_for_signal;
use crate::observability::metrics;
use crate::routing::RouteError;
use crate::session::{sweep_idle, SessionStore};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid route table: {0}")]
    Routes(#[from] RouteError),

    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the server from `config`, without binding anything.
pub fn build_server(config: AppConfig) -> Result<HttpServer, StartupError> {
    let services = Arc::new(AppServices::from_config(&config));
    let dispatcher = bootstrap(&config, services)?;
    tracing::info!(
        routes = dispatcher.routes().len(),
        movies = config.catalog.movies.len(),
        "Route table ready"
    );
    let sessions = Arc::new(SessionStore::with_idle_timeout(Duration::from_secs(
        config.session.idle_timeout_secs,
    )));
    Ok(HttpServer::new(config, dispatcher, sessions))
}

/// Start everything and serve until SIGINT/SIGTERM.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let bind_address = config.listener.bind_address.clone();
    let sweep_every = Duration::from_secs(config.session.sweep_interval_secs);
    let server = build_server(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(wait_for_signal(shutdown.clone()));
    tokio::spawn(sweep_idle(server.sessions(), sweep_every, shutdown.subscribe()));

    let mut drain_rx = shutdown.subscribe();
    let serve = server.run(listener, rx);
    tokio::pin!(serve);

    tokio::select! {
        result = &mut serve => result?,
        _ = drain_rx.recv() => {
            match tokio::time::timeout(DRAIN_TIMEOUT, &mut serve).await {
                Ok(result) => result?,
                Err(_) => tracing::warn!(timeout = ?DRAIN_TIMEOUT, "Drain deadline passed, forcing exit"),
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_idle_timeout_comes_from_config() {
        let mut config = AppConfig::default();
        config.session.idle_timeout_secs = 90;
        let server = build_server(config).unwrap();
        assert_eq!(server.sessions().idle_timeout(), Duration::from_secs(90));
        assert!(server.sessions().is_empty());
    }
}
