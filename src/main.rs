//! guinea-geo CLI entry point
//!
//! Delivery location toolkit: directory lookups, position and photo GPS

use guinea_geo::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run().await {
        eprintln!("{}", cli::error_message(&e));
        std::process::exit(1);
    }
}
