//! # Cosmos - Mission Catalog Server
//!
//! The main binary for the Cosmos mission catalog.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for catalog maintenance
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            apps/cosmos (THE BINARY)          │
//! │                                              │
//! │   ┌─────────────┐        ┌─────────────┐     │
//! │   │    CLI      │        │  HTTP API   │     │
//! │   │   (clap)    │        │   (axum)    │     │
//! │   └──────┬──────┘        └──────┬──────┘     │
//! │          └───────────┬──────────┘            │
//! │                      ▼                       │
//! │              ┌──────────────┐                │
//! │              │ cosmos-core  │                │
//! │              │ (THE LOGIC)  │                │
//! │              └──────────────┘                │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! cosmos server --host 0.0.0.0 --port 5555
//!
//! # CLI operations
//! cosmos seed
//! cosmos add-planet --name Mars --distance 140 --star Sun
//! cosmos status --json-mode
//! ```

use clap::Parser;
use cosmos::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // COSMOS_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("COSMOS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "cosmos=debug,cosmos_core=debug,tower_http=debug"
    } else {
        "cosmos=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Cosmos startup banner.
fn print_banner() {
    println!(
        r#"
   ___ ___  ___ _ __ ___   ___  ___
  / __/ _ \/ __| '_ ` _ \ / _ \/ __|
 | (_| (_) \__ \ | | | | | (_) \__ \
  \___\___/|___/_| |_| |_|\___/|___/

  Mission Catalog v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
