//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;
use tracing::info;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "directory.base_url")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    #[arg(requires = "key")]
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    // Show path
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Reset config
    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    let Some(key) = args.key else {
        show_all_config(&config);
        return Ok(());
    };

    match args.value {
        None => {
            let value = config.get(&key).ok_or_else(|| {
                Error::Config(format!(
                    "Unknown config key: {} (available: {})",
                    key,
                    Config::available_keys().join(", ")
                ))
            })?;
            println!("{}", value);
        }
        Some(value) => {
            config.set(&key, &value)?;
            config.save()?;
            info!(key = %key, "configuration updated");
            println!("{} = {}", key, value);
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[directory]");
    println!("base_url = \"{}\"", config.directory.base_url);
    println!("user_agent = \"{}\"", config.directory.user_agent);
    println!();

    println!("[autocomplete]");
    println!("debounce_ms = {}", config.autocomplete.debounce_ms);
    println!("min_query_len = {}", config.autocomplete.min_query_len);
    println!();

    println!("[position]");
    println!("timeout_secs = {}", config.position.timeout_secs);
    println!("maximum_age_secs = {}", config.position.maximum_age_secs);
    println!("high_accuracy = {}", config.position.high_accuracy);
    println!();

    println!("[map]");
    println!("center_lat = {}", config.map.center_lat);
    println!("center_lng = {}", config.map.center_lng);
    println!("zoom = {}", config.map.zoom);
    println!("tile_url = \"{}\"", config.map.tile_url);
    println!("max_zoom = {}", config.map.max_zoom);
    println!();

    println!("[url]");
    println!("default = \"{}\"", config.url.default);
    println!();

    println!("[url.providers]");
    let mut providers: Vec<_> = config.url.providers.iter().collect();
    providers.sort();
    for (name, template) in providers {
        println!("{} = \"{}\"", name, template);
    }
}
