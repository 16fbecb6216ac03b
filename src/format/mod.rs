//! Output formatters
//!
//! Provides trait-based output formatting for directory and position results.

pub mod json;
pub mod text;

use crate::config::Config;
use crate::coord::Coordinate;
use crate::directory::{AddressRecord, AddressSuggestion, LocationNode};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format an autocomplete result set
    fn format_suggestions(&self, suggestions: &[AddressSuggestion]) -> Result<String>;

    /// Format a prefecture or quartier list
    fn format_nodes(&self, nodes: &[LocationNode]) -> Result<String>;

    /// Format a reverse geocoding result; `None` means no known address
    fn format_address(&self, address: Option<&AddressRecord>) -> Result<String>;

    /// Format a position fix
    ///
    /// # Arguments
    /// * `position` - The fix to format
    /// * `config` - Application config (for the map link provider)
    fn format_position(&self, position: &Coordinate, config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    vec![
        FormatInfo {
            name: "json".to_string(),
            description: "Pretty-printed JSON".to_string(),
        },
        FormatInfo {
            name: "text".to_string(),
            description: "Human-readable text".to_string(),
        },
    ]
}
