//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/guinea-geo/config.toml

pub mod defaults;

use crate::constants::map::{
    DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG, DEFAULT_ZOOM, OSM_MAX_ZOOM, OSM_TILE_URL,
};
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Location directory (store backend) settings
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Address autocomplete settings
    #[serde(default)]
    pub autocomplete: AutocompleteConfig,

    /// Current position settings
    #[serde(default)]
    pub position: PositionConfig,

    /// Map bootstrap settings
    #[serde(default)]
    pub map: MapConfig,

    /// Map link settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Location directory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL of the store backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User agent for outgoing requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Address autocomplete settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutocompleteConfig {
    /// Keystroke pause before searching, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Shortest trimmed query that triggers a search
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

/// Current position settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionConfig {
    #[serde(default = "default_position_timeout")]
    pub timeout_secs: u64,

    /// Oldest cached fix that may be reused
    #[serde(default = "default_position_max_age")]
    pub maximum_age_secs: u64,

    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,
}

/// Map bootstrap settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    #[serde(default = "default_center_lng")]
    pub center_lng: f64,

    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Tile URL template
    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
}

/// Map link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_min_query_len() -> usize {
    DEFAULT_MIN_QUERY_LEN
}
fn default_position_timeout() -> u64 {
    DEFAULT_POSITION_TIMEOUT_SECS
}
fn default_position_max_age() -> u64 {
    DEFAULT_POSITION_MAX_AGE_SECS
}
fn default_high_accuracy() -> bool {
    DEFAULT_HIGH_ACCURACY
}
fn default_center_lat() -> f64 {
    DEFAULT_CENTER_LAT
}
fn default_center_lng() -> f64 {
    DEFAULT_CENTER_LNG
}
fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}
fn default_tile_url() -> String {
    OSM_TILE_URL.to_string()
}
fn default_max_zoom() -> u8 {
    OSM_MAX_ZOOM
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps?q={lat},{lng}".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map=18/{lat}/{lng}".to_string(),
    );
    providers
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

impl AutocompleteConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_position_timeout(),
            maximum_age_secs: default_position_max_age(),
            high_accuracy: default_high_accuracy(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            zoom: default_zoom(),
            tile_url: default_tile_url(),
            max_zoom: default_max_zoom(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["directory", "base_url"] => Some(self.directory.base_url.clone()),
            ["directory", "user_agent"] => Some(self.directory.user_agent.clone()),

            ["autocomplete", "debounce_ms"] => Some(self.autocomplete.debounce_ms.to_string()),
            ["autocomplete", "min_query_len"] => {
                Some(self.autocomplete.min_query_len.to_string())
            }

            ["position", "timeout_secs"] => Some(self.position.timeout_secs.to_string()),
            ["position", "maximum_age_secs"] => Some(self.position.maximum_age_secs.to_string()),
            ["position", "high_accuracy"] => Some(self.position.high_accuracy.to_string()),

            ["map", "center_lat"] => Some(self.map.center_lat.to_string()),
            ["map", "center_lng"] => Some(self.map.center_lng.to_string()),
            ["map", "zoom"] => Some(self.map.zoom.to_string()),
            ["map", "tile_url"] => Some(self.map.tile_url.clone()),
            ["map", "max_zoom"] => Some(self.map.max_zoom.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["directory", "base_url"] => {
                self.directory.base_url = value.trim_end_matches('/').to_string();
            }
            ["directory", "user_agent"] => {
                self.directory.user_agent = value.to_string();
            }

            ["autocomplete", "debounce_ms"] => {
                self.autocomplete.debounce_ms = parse_value(value, "debounce")?;
            }
            ["autocomplete", "min_query_len"] => {
                self.autocomplete.min_query_len = parse_value(value, "query length")?;
            }

            ["position", "timeout_secs"] => {
                self.position.timeout_secs = parse_value(value, "timeout")?;
            }
            ["position", "maximum_age_secs"] => {
                self.position.maximum_age_secs = parse_value(value, "maximum age")?;
            }
            ["position", "high_accuracy"] => {
                self.position.high_accuracy = parse_value(value, "boolean")?;
            }

            ["map", "center_lat"] => {
                self.map.center_lat = parse_value(value, "latitude")?;
            }
            ["map", "center_lng"] => {
                self.map.center_lng = parse_value(value, "longitude")?;
            }
            ["map", "zoom"] => {
                self.map.zoom = parse_value(value, "zoom")?;
            }
            ["map", "tile_url"] => {
                self.map.tile_url = value.to_string();
            }
            ["map", "max_zoom"] => {
                self.map.max_zoom = parse_value(value, "zoom")?;
            }

            ["url", "default"] => {
                if !self.url.providers.contains_key(value) {
                    return Err(Error::Config(format!("Unknown URL provider: {}", value)));
                }
                self.url.default = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "directory.base_url",
            "directory.user_agent",
            "autocomplete.debounce_ms",
            "autocomplete.min_query_len",
            "position.timeout_secs",
            "position.maximum_age_secs",
            "position.high_accuracy",
            "map.center_lat",
            "map.center_lng",
            "map.zoom",
            "map.tile_url",
            "map.max_zoom",
            "url.default",
        ]
    }

    /// Format a map link using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self
            .url
            .providers
            .get(provider_name)
            .ok_or_else(|| Error::Config(format!("Unknown URL provider: {}", provider_name)))?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string()))
    }
}

fn parse_value<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", what, value)))
}
