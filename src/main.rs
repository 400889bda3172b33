//! Any Proxy
//!
//! A minimal HTTP forwarding proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                  ANY PROXY                    │
//!   GET /proxy?url=U      │  ┌─────────┐    ┌──────────┐                  │
//!   ──────────────────────┼─▶│  http   │───▶│ upstream │──────────────────┼──▶ Origin
//!                         │  │handlers │    │ fetcher  │                  │     Server
//!   ◀─ streamed body ─────┼──│         │◀───│plain/TLS │◀─────────────────┼───
//!                         │  └────┬────┘    └──────────┘                  │
//!   GET /rss-proxy?url=U  │       │ buffered text                         │
//!   ◀─ rewritten feed ────┼───────┤                                       │
//!                         │  ┌────▼────┐                                  │
//!                         │  │  feed   │  <link>, <enclosure url=...>     │
//!                         │  │rewriter │  → {HOST}/proxy?url=...          │
//!                         │  └─────────┘                                  │
//!                         │  config · observability · lifecycle           │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use any_proxy::lifecycle::{startup, StartupError};
use any_proxy::observability::init_logging;

#[derive(Parser)]
#[command(name = "any-proxy")]
#[command(about = "HTTP forwarding proxy with feed link rewriting", long_about = None)]
struct Cli {
    /// Optional TOML configuration file. PORT and HOST override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let cli = Cli::parse();
    let config = startup::load(cli.config.as_deref())?;

    init_logging(&config.observability);

    tracing::info!("any-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        listen_address = %config.listen_address(),
        public_base = %config.public_base(),
        upstream_timeout_ms = config.upstream.timeout_ms,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
