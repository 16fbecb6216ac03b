//! Error types for guinea-geo

use serde::Serialize;
use thiserror::Error;

/// Main error type for guinea-geo plumbing (config, transport, decoding)
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("Controller stopped: {0}")]
    ControllerStopped(&'static str),
}

/// Result type alias for guinea-geo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Typed outcome of a failed location lookup
///
/// Sensor and extractor failures surface as one of these kinds. Callers pick
/// the message to show from the variant, never from the text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("position request timed out")]
    Timeout,

    #[error("geolocation is not supported")]
    Unsupported,

    #[error("metadata extractor not available")]
    MetadataUnavailable,

    #[error("image has no GPS data")]
    NoGpsData,

    #[error("location directory unavailable")]
    DirectoryUnavailable,

    #[error("unknown location error")]
    Unknown,
}

impl LocationError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::PositionUnavailable => "POSITION_UNAVAILABLE",
            Self::Timeout => "TIMEOUT",
            Self::Unsupported => "UNSUPPORTED",
            Self::MetadataUnavailable => "METADATA_UNAVAILABLE",
            Self::NoGpsData => "NO_GPS_DATA",
            Self::DirectoryUnavailable => "DIRECTORY_UNAVAILABLE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Message shown to the end user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Permission de géolocalisation refusée",
            Self::PositionUnavailable => "Position non disponible",
            Self::Timeout => "Délai de géolocalisation dépassé",
            Self::Unsupported => "La géolocalisation n'est pas supportée",
            Self::MetadataUnavailable => "Bibliothèque EXIF non disponible",
            Self::NoGpsData => "Pas de données GPS dans la photo",
            Self::DirectoryUnavailable => "Service d'adresses indisponible",
            Self::Unknown => "Erreur de géolocalisation",
        }
    }
}
