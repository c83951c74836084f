//! segment-router service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────────┐
//!     ────────────────────┼─▶ http::server (axum + tower-http layers)    │
//!                         │        │                                     │
//!                         │        ▼                                     │
//!                         │   routing::SharedRouter (snapshot)           │
//!                         │        │  exact key → segment scan → 404     │
//!                         │        ▼                                     │
//!     Client Response     │   handler writes into RequestContext         │
//!     ◀───────────────────┼── http::response                             │
//!                         │                                              │
//!                         │   config (TOML) ── watcher / SIGHUP ──▶ swap │
//!                         │   observability (tracing, prometheus)        │
//!                         │   lifecycle (startup, signals, shutdown)     │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use segment_router::lifecycle::startup::{self, StartupOptions};
use segment_router::Router;

#[derive(Parser)]
#[command(name = "segment-router")]
#[command(about = "Serve fixed responses from a segment-matching route table", long_about = None)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the config, print the normalized route table and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let options = StartupOptions {
        config_path: cli.config,
        bind_override: cli.bind,
    };

    if cli.check {
        let config = startup::load(&options)?;
        let router = Router::from_config(&config.routes);
        println!("config OK, {} route(s)", router.len());
        for pattern in router.patterns() {
            println!("  {}", pattern);
        }
        return Ok(());
    }

    startup::run(options).await?;
    Ok(())
}
