//! Centralized constants for the guinea-geo crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometres
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Rough bounding box of Guinea (latitude)
    pub const COUNTRY_LAT_MIN: f64 = 7.0;
    pub const COUNTRY_LAT_MAX: f64 = 13.0;

    /// Rough bounding box of Guinea (longitude)
    pub const COUNTRY_LNG_MIN: f64 = -15.0;
    pub const COUNTRY_LNG_MAX: f64 = -7.0;

    /// Typical accuracy of an IP-based fix (city level), in metres
    pub const IP_FIX_ACCURACY_METERS: f64 = 5_000.0;
}

/// External API endpoints
pub mod api {
    /// Address search, relative to the directory base URL
    pub const SEARCH_PATH: &str = "/store/location/search/";

    /// Reverse geocoding, relative to the directory base URL
    pub const REVERSE_GEOCODE_PATH: &str = "/store/location/api/reverse-geocode/";

    /// Prefectures of a region
    pub const PREFECTURES_PATH: &str = "/store/location/api/prefectures/";

    /// Quartiers of a prefecture
    pub const QUARTIERS_PATH: &str = "/store/location/api/quartiers/";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";
}

/// Map defaults
pub mod map {
    /// Conakry
    pub const DEFAULT_CENTER_LAT: f64 = 9.5092;
    pub const DEFAULT_CENTER_LNG: f64 = -13.7122;

    pub const DEFAULT_ZOOM: u8 = 10;

    pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

    pub const OSM_ATTRIBUTION: &str =
        "© <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

    pub const OSM_MAX_ZOOM: u8 = 19;

    /// Zoom used when centring on the user's own position
    pub const LOCATE_ZOOM: u8 = 16;
}
