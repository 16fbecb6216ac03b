//! CLI command handlers
//!
//! Each subcommand group has its own module with handler functions.

pub mod config;
pub mod directory;
pub mod geo;
pub mod locate;

use crate::config::Config;
use crate::directory::{HttpDirectory, LocationDirectoryClient};
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, OutputFormatter};
use clap::{Parser, Subcommand};
use std::sync::Arc;

/// Delivery location toolkit for Guinea
#[derive(Parser)]
#[command(name = "guinea-geo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Great-circle distance between two positions
    Distance(geo::DistanceArgs),

    /// Convert degrees/minutes/seconds to decimal degrees
    Dms(geo::DmsArgs),

    /// Check a position against the delivery area
    Check(geo::CheckArgs),

    /// Search known delivery addresses
    Search(directory::SearchArgs),

    /// Find the address at a position
    Reverse(directory::ReverseArgs),

    /// List the prefectures of a region
    Prefectures(directory::PrefecturesArgs),

    /// List the quartiers of a prefecture
    Quartiers(directory::QuartiersArgs),

    /// Current position (IP geolocation)
    Locate(locate::LocateArgs),

    /// GPS position stored in a photo
    Photo(locate::PhotoArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Distance(args) => geo::distance(args),
        Commands::Dms(args) => geo::dms(args),
        Commands::Check(args) => geo::check(args),
        Commands::Search(args) => directory::search(args).await,
        Commands::Reverse(args) => directory::reverse(args).await,
        Commands::Prefectures(args) => directory::prefectures(args).await,
        Commands::Quartiers(args) => directory::quartiers(args).await,
        Commands::Locate(args) => locate::locate(args).await,
        Commands::Photo(args) => locate::photo(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Message printed when a command fails
///
/// Location failures are shown the way the storefront shows them, with the
/// stable code for scripts.
pub fn error_message(error: &Error) -> String {
    match error {
        Error::Location(kind) => format!("{} ({})", kind.user_message(), kind.code()),
        other => format!("Error: {}", other),
    }
}

/// Look up an output formatter, listing the valid names on failure
pub(crate) fn formatter(name: &str) -> Result<Box<dyn OutputFormatter>> {
    get_formatter(name).ok_or_else(|| {
        let names: Vec<String> = available_formats().into_iter().map(|f| f.name).collect();
        Error::Config(format!(
            "Unknown format: {} (available: {})",
            name,
            names.join(", ")
        ))
    })
}

/// Directory client for the configured store backend
pub(crate) fn directory_client(
    config: &Config,
) -> Result<Arc<LocationDirectoryClient<HttpDirectory>>> {
    let directory = HttpDirectory::from_config(config)?;
    Ok(Arc::new(LocationDirectoryClient::new(directory)))
}
