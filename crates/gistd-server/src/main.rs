//! gistd - HTTP proxy server for GitHub Gists.
//!
//! Exposes a search endpoint that aggregates over the upstream Gist API
//! (which has no full-text search of its own), plus thin pass-through
//! routes for single-gist CRUD and starring.

mod handlers;
mod server;

use anyhow::Result;
use clap::Parser;
use gistd_core::Settings;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "gistd")]
#[command(about = "Gist proxy server with search aggregation")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "8460")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Gist API base URL (overrides GISTD_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Shared low-privilege token for public search (overrides GISTD_FALLBACK_TOKEN)
    #[arg(long)]
    fallback_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting gistd");

    let mut settings = Settings::from_env();
    if let Some(api_base) = args.api_base {
        settings.api_base = api_base;
    }
    if let Some(token) = args.fallback_token {
        settings.fallback_token = Some(token);
    }
    if settings.fallback_token.is_none() {
        info!("No fallback token configured; public search will be rejected");
    }

    // Start the server
    let addr = server::start_server(settings, &args.host, args.port).await?;

    // Print the bound port for supervisors (intentional stdout)
    println!("GISTD_PORT={}", addr.port());

    info!("gistd running on {}", addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
