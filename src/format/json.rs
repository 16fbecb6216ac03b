//! JSON output formatter

use crate::config::Config;
use crate::coord::Coordinate;
use crate::directory::{AddressRecord, AddressSuggestion, LocationNode};
use crate::error::Result;
use crate::format::OutputFormatter;
use serde::Serialize;

/// JSON formatter - outputs results as pretty-printed JSON
pub struct JsonFormatter;

#[derive(Serialize)]
struct PositionOutput<'a> {
    #[serde(flatten)]
    position: &'a Coordinate,
    in_country: bool,
    map_url: String,
}

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Pretty-printed JSON"
    }

    fn format_suggestions(&self, suggestions: &[AddressSuggestion]) -> Result<String> {
        Ok(serde_json::to_string_pretty(suggestions)?)
    }

    fn format_nodes(&self, nodes: &[LocationNode]) -> Result<String> {
        Ok(serde_json::to_string_pretty(nodes)?)
    }

    fn format_address(&self, address: Option<&AddressRecord>) -> Result<String> {
        Ok(serde_json::to_string_pretty(&address)?)
    }

    fn format_position(&self, position: &Coordinate, config: &Config) -> Result<String> {
        let output = PositionOutput {
            position,
            in_country: position.is_within_country(),
            map_url: config.format_url(None, position.latitude, position.longitude)?,
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }
}
