//! # Odometer - Cascading Counter CLI
//!
//! The main binary for the odometer-core counter engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │           apps/odometer (THE BINARY)          │
//! │                                               │
//! │  ┌─────────────┐        ┌─────────────────┐   │
//! │  │    CLI      │        │  Layout config  │   │
//! │  │   (clap)    │        │     (toml)      │   │
//! │  └──────┬──────┘        └────────┬────────┘   │
//! │         └───────────┬────────────┘            │
//! │                     ▼                         │
//! │             ┌───────────────┐                 │
//! │             │ odometer-core │                 │
//! │             │  (THE LOGIC)  │                 │
//! │             └───────────────┘                 │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Advance the operating-hours meter
//! odometer run --ticks 2222222
//!
//! # Use a custom layout
//! odometer --config meter.toml layout
//! odometer --config meter.toml run --ticks 100 --every 10
//! ```

use clap::Parser;
use odometer::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // ODOMETER_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("ODOMETER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "odometer=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  Odometer v{}

  Bounded • Cascading • Fail-fast
"#,
        env!("CARGO_PKG_VERSION")
    );
}
