//! Human-readable text output formatter

use crate::config::Config;
use crate::coord::math::{format_coordinate, DEFAULT_PRECISION};
use crate::coord::Coordinate;
use crate::directory::{AddressRecord, AddressSuggestion, LocationNode};
use crate::error::Result;
use crate::format::OutputFormatter;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format_suggestions(&self, suggestions: &[AddressSuggestion]) -> Result<String> {
        if suggestions.is_empty() {
            return Ok("No matching addresses\n".to_string());
        }

        let mut output = String::new();
        for (i, suggestion) in suggestions.iter().enumerate() {
            output.push_str(&format!("{:>2}. {}\n", i + 1, suggestion.description));
            if !suggestion.text.is_empty() {
                output.push_str(&format!("    {}\n", suggestion.text));
            }
            if suggestion.usage_count > 0 {
                output.push_str(&format!("    used {} times\n", suggestion.usage_count));
            }
        }
        Ok(output)
    }

    fn format_nodes(&self, nodes: &[LocationNode]) -> Result<String> {
        if nodes.is_empty() {
            return Ok("None\n".to_string());
        }

        let width = nodes.iter().map(|n| n.id.as_str().len()).max().unwrap_or(0);
        let mut output = String::new();
        for node in nodes {
            output.push_str(&format!("{:>width$}  {}\n", node.id.as_str(), node.name, width = width));
        }
        Ok(output)
    }

    fn format_address(&self, address: Option<&AddressRecord>) -> Result<String> {
        let Some(address) = address else {
            return Ok("No known address at this position\n".to_string());
        };

        let mut output = String::new();
        output.push_str(&format!("{}\n", address.description));
        if let Some(landmark) = &address.landmark {
            output.push_str(&format!("Landmark: {}\n", landmark));
        }
        let c = &address.coordinate;
        output.push_str(&format!(
            "Position: {}\n",
            format_coordinate(c.latitude, c.longitude, DEFAULT_PRECISION)
        ));
        for node in [&address.region, &address.prefecture, &address.quartier]
            .into_iter()
            .flatten()
        {
            output.push_str(&format!("{}: {}\n", capitalize(&node.kind.to_string()), node.name));
        }
        Ok(output)
    }

    fn format_position(&self, position: &Coordinate, config: &Config) -> Result<String> {
        let mut output = String::new();
        output.push_str(&format!(
            "Position: {}\n",
            format_coordinate(position.latitude, position.longitude, DEFAULT_PRECISION)
        ));
        if let Some(accuracy) = position.accuracy {
            output.push_str(&format!("Accuracy: ±{:.0} m\n", accuracy));
        }
        if !position.is_within_country() {
            output.push_str("Warning: outside the delivery area\n");
        }
        output.push_str(&format!(
            "Map: {}\n",
            config.format_url(None, position.latitude, position.longitude)?
        ));
        Ok(output)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
