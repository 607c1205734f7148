//! REST resource router service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request          ┌──────────────────────────────────────────────┐
//!     ───────────────────────▶│  http server (axum + tower-http middleware)  │
//!                             └──────────────────────┬───────────────────────┘
//!                                                    ▼
//!                             ┌──────────────────────────────────────────────┐
//!                             │  route table (immutable, built at startup)   │
//!                             │   /            → discovery                   │
//!                             │   /{name}/     → list, create                │
//!                             │   /{name}/{id}/→ retrieve, update, delete    │
//!                             └──────────────────────┬───────────────────────┘
//!                                                    ▼
//!     Client Response         ┌──────────────────────────────────────────────┐
//!     ◀───────────────────────│  resource handler (external collaborator)    │
//!                             └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use resource_router::config::{load_config, RouterConfig};
use resource_router::lifecycle::startup::build_route_table;
use resource_router::observability::{logging, metrics};
use resource_router::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "resource-router")]
#[command(about = "Serve registered REST resources behind a generated route table", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the route table and exit.
    #[arg(long)]
    routes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("resource-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        resources = config.api.resources.len(),
        append_slash = config.api.append_slash,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let table = build_route_table(&config)?;

    if args.routes {
        for endpoint in table.endpoints() {
            println!("{endpoint}");
        }
        return Ok(());
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, table);
    server.run(listener, shutdown.signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
