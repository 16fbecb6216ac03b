//! Pure coordinate math
//!
//! Great-circle distance, DMS conversion, display formatting and the
//! country bounding-box check. Nothing here has side effects; malformed
//! input (NaN) propagates as NaN and must be guarded by the caller.

use crate::constants::geo::{
    COUNTRY_LAT_MAX, COUNTRY_LAT_MIN, COUNTRY_LNG_MAX, COUNTRY_LNG_MIN, EARTH_RADIUS_KM,
};
use crate::coord::{Coordinate, Hemisphere};

/// Decimal places used when no precision is requested
pub const DEFAULT_PRECISION: usize = 4;

/// Calculate the distance between two points in kilometres (Haversine formula)
///
/// Uses a spherical Earth of radius 6371 km. Accuracy fields are ignored.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lng = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Convert degrees/minutes/seconds to signed decimal degrees
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, hemisphere: Hemisphere) -> f64 {
    let dd = degrees + minutes / 60.0 + seconds / 3600.0;
    if hemisphere.is_negative() {
        -dd
    } else {
        dd
    }
}

/// Render "lat, lng" with a fixed number of decimals
pub fn format_coordinate(lat: f64, lng: f64, precision: usize) -> String {
    format!("{:.*}, {:.*}", precision, lat, precision, lng)
}

/// Check whether a point lies in the country bounding box
///
/// This is a rectangle around Guinea, not the border polygon: points in
/// neighbouring countries near the border pass, and that is accepted.
pub fn is_within_country_bounds(lat: f64, lng: f64) -> bool {
    (COUNTRY_LAT_MIN..=COUNTRY_LAT_MAX).contains(&lat)
        && (COUNTRY_LNG_MIN..=COUNTRY_LNG_MAX).contains(&lng)
}
