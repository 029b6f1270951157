//! Parking portal (dev server)
//!
//! Serves the portal's page routes behind the authentication guard, the
//! accounts API, and the development reverse proxy for upstream data sources.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                PARKING PORTAL                │
//!   Browser request        │  ┌────────┐     ┌──────────┐                 │
//!   ───────────────────────┼─▶│  http  │────▶│ /api/*   │──▶ accounts     │
//!                          │  │ server │     └──────────┘    + tokens     │
//!                          │  │        │     ┌──────────┐                 │
//!                          │  │        │────▶│  proxy   │──▶ upstream ────┼──▶ gdex, nominatim,
//!                          │  │        │     └──────────┘                 │    datavic, gmaps
//!                          │  │        │     ┌──────────┐   ┌─────────┐   │
//!                          │  │        │────▶│ routing  │──▶│  guard  │   │
//!                          │  └────────┘     │navigator │◀──│ session │   │
//!                          │                 └────┬─────┘   └─────────┘   │
//!   HTML / 302 / 404       │                      ▼                       │
//!   ◀──────────────────────┼────────────────── views                      │
//!                          │                                              │
//!                          │   config (+ watcher) · observability ·       │
//!                          │   lifecycle (signals, shutdown)              │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use parking_portal::config::{load_config, watcher::ConfigWatcher, PortalConfig};
use parking_portal::lifecycle::{signals, Shutdown};
use parking_portal::observability::{logging, metrics};
use parking_portal::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "parking-portal", version, about = "Parking portal dev server")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PortalConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("parking-portal v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        proxy_rules = config.proxy.len(),
        views_dir = ?config.views.dir,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher stops when dropped, so it lives until main returns.
    let (_watcher, updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), Some(updates))
        }
        None => (None, None),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, updates, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
