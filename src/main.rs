//! Marquee movie catalog server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ http::server (layers, session cookie)
//!                        │
//!                        ▼
//!                    dispatch::Dispatcher
//!                        │  routing::RouteTable (first match wins)
//!                        │  middleware chain (may halt)
//!                        ▼
//!                    app::controllers (Controller@action)
//!                        │
//!     Client Response    ▼
//!     ◀───────────── http::Response
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use marquee::app::{bootstrap, AppServices};
use marquee::config::{load_config, AppConfig};
use marquee::lifecycle;
use marquee::observability::logging;
use marquee::routing::RouteError;

#[derive(Parser)]
#[command(name = "marquee", version, about = "Movie catalog and watchlist server")]
struct Cli {
    /// Path to a TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default).
    Serve,
    /// Print the route table in match order and exit.
    Routes,
}

/// Compile the configured table and print it in match order.
fn print_routes(config: &AppConfig) -> Result<(), RouteError> {
    let services = Arc::new(AppServices::from_config(config));
    let dispatcher = bootstrap(config, services)?;
    for route in dispatcher.routes() {
        println!(
            "{:<6} {:<28} {:<40} {}",
            route.method().as_str(),
            route.pattern(),
            route.handler().to_string(),
            route.middleware().join(",")
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    if let Some(Command::Routes) = cli.command {
        print_routes(&config)?;
        return Ok(());
    }

    logging::init_logging(&config.observability)?;

    tracing::info!(
        name = %config.app.name,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        debug = config.app.debug,
        "marquee v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = lifecycle::run(config).await {
        tracing::error!(error = %e, "Fatal startup error");
        return Err(e.into());
    }
    Ok(())
}
