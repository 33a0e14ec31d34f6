//! Bablwatch - Kafka journal log watcher
//!
//! Main entry point for the bablwatch service.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bablwatch::cli::{Cli, Commands};
use bablwatch::config::WatchConfig;
use bablwatch::notify::BablEventsSink;
use bablwatch::watcher::Watcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Watch { brokers, debug } => {
            init_tracing(debug);
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting bablwatch");

            let config = WatchConfig::new(&brokers);
            let sink = Arc::new(BablEventsSink::new(config.notifier.clone()));

            let watcher = Watcher::new(config, sink)?;
            watcher.run().await?;
            Ok(())
        }
    }
}

/// Initialize tracing with JSON output on stderr.
///
/// Structured records go to the standard error stream; `RUST_LOG` takes
/// precedence over the level implied by the `--debug` flag.
fn init_tracing(debug: bool) {
    let default_directive = if debug {
        "bablwatch=debug"
    } else {
        "bablwatch=info"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();
}
