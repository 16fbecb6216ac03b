//! Coordinates and coordinate math
//!
//! This module handles:
//! - The `Coordinate` value passed between sensors, the directory and the map
//! - Hemisphere references used by DMS notation
//! - Pure geometry in [`math`]

pub mod math;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate with an optional accuracy radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,

    /// Accuracy radius in metres, when the source reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl Coordinate {
    /// Create new coordinates
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
        }
    }

    /// Attach an accuracy radius in metres
    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = Some(meters);
        self
    }

    /// Validate that coordinates are finite and within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Whether the point falls inside the country bounding box
    pub fn is_within_country(&self) -> bool {
        math::is_within_country_bounds(self.latitude, self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&math::format_coordinate(
            self.latitude,
            self.longitude,
            math::DEFAULT_PRECISION,
        ))
    }
}

impl std::str::FromStr for Coordinate {
    type Err = String;

    /// Parse "lat,lng"
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("Expected \"lat,lng\", got: {}", s))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("Invalid latitude: {}", lat.trim()))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| format!("Invalid longitude: {}", lng.trim()))?;
        let coord = Coordinate::new(lat, lng);
        coord.validate().map_err(|e| e.to_string())?;
        Ok(coord)
    }
}

/// Hemisphere reference of a DMS angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
}

impl Hemisphere {
    /// Parse a single reference letter, case-insensitive
    pub fn from_ref(reference: char) -> Option<Self> {
        match reference.to_ascii_uppercase() {
            'N' => Some(Self::North),
            'S' => Some(Self::South),
            'E' => Some(Self::East),
            'W' => Some(Self::West),
            _ => None,
        }
    }

    /// South and west angles are negative in decimal degrees
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::South | Self::West)
    }
}

impl std::str::FromStr for Hemisphere {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Self::from_ref(c).ok_or_else(|| format!("Unknown hemisphere: {}", s))
            }
            _ => Err(format!("Unknown hemisphere: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Coordinate::new(9.5092, -13.7122).validate().is_ok());
        assert!(Coordinate::new(90.0, 180.0).validate().is_ok());
        assert!(Coordinate::new(90.1, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, -180.5).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        assert!(Coordinate::new(f64::NAN, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_parse_coordinate() {
        let coord: Coordinate = "9.6412, -13.5784".parse().unwrap();
        assert_eq!(coord.latitude, 9.6412);
        assert_eq!(coord.longitude, -13.5784);
        assert!(coord.accuracy.is_none());

        assert!("9.6412".parse::<Coordinate>().is_err());
        assert!("abc,1".parse::<Coordinate>().is_err());
        assert!("95,1".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_display_uses_default_precision() {
        let coord = Coordinate::new(9.50921234, -13.71229876);
        assert_eq!(coord.to_string(), "9.5092, -13.7123");
    }

    #[test]
    fn test_accuracy_is_optional_in_json() {
        let json = serde_json::to_string(&Coordinate::new(9.5, -13.7)).unwrap();
        assert!(!json.contains("accuracy"));

        let parsed: Coordinate =
            serde_json::from_str(r#"{"latitude":9.5,"longitude":-13.7,"accuracy":12.0}"#).unwrap();
        assert_eq!(parsed.accuracy, Some(12.0));
    }

    #[test]
    fn test_hemisphere_parsing() {
        assert_eq!(Hemisphere::from_ref('n'), Some(Hemisphere::North));
        assert_eq!("W".parse::<Hemisphere>(), Ok(Hemisphere::West));
        assert!("NW".parse::<Hemisphere>().is_err());
        assert!(Hemisphere::from_ref('X').is_none());
        assert!(Hemisphere::South.is_negative());
        assert!(!Hemisphere::East.is_negative());
    }
}
