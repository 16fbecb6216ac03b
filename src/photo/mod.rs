//! GPS position from photo metadata
//!
//! Customers can attach a photo of their doorstep; when the camera stored a
//! GPS position, it becomes the delivery coordinate.

pub mod reader;

use crate::coord::math::dms_to_decimal;
use crate::coord::{Coordinate, Hemisphere};
use crate::error::LocationError;
use std::sync::Arc;
use tracing::{debug, warn};

pub use reader::ExifExtractor;

/// Raw GPS tags of an image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsTags {
    /// Degrees, minutes, seconds
    pub latitude: [f64; 3],
    pub latitude_ref: Option<Hemisphere>,
    pub longitude: [f64; 3],
    pub longitude_ref: Option<Hemisphere>,
}

impl GpsTags {
    /// Convert to decimal degrees; a missing reference counts as N / E
    pub fn to_coordinate(&self) -> Coordinate {
        let [d, m, s] = self.latitude;
        let latitude = dms_to_decimal(d, m, s, self.latitude_ref.unwrap_or(Hemisphere::North));
        let [d, m, s] = self.longitude;
        let longitude = dms_to_decimal(d, m, s, self.longitude_ref.unwrap_or(Hemisphere::East));
        Coordinate::new(latitude, longitude)
    }
}

/// Trait for image metadata readers
pub trait MetadataExtractor: Send + Sync + 'static {
    /// Read the GPS tags, or `None` when the image has no position
    fn gps_tags(&self, image: &[u8]) -> Option<GpsTags>;
}

/// Image → coordinate
pub struct PhotoGeoExtractor<E> {
    extractor: Option<Arc<E>>,
}

impl<E: MetadataExtractor> PhotoGeoExtractor<E> {
    pub fn new(extractor: E) -> Self {
        Self {
            extractor: Some(Arc::new(extractor)),
        }
    }

    /// An extractor for hosts without a metadata reader
    pub fn unavailable() -> Self {
        Self { extractor: None }
    }

    /// Extract the GPS position of an image
    pub async fn extract(&self, image: Vec<u8>) -> Result<Coordinate, LocationError> {
        let Some(extractor) = self.extractor.clone() else {
            return Err(LocationError::MetadataUnavailable);
        };

        let tags = tokio::task::spawn_blocking(move || extractor.gps_tags(&image))
            .await
            .map_err(|e| {
                warn!(error = %e, "metadata extraction task failed");
                LocationError::Unknown
            })?
            .ok_or(LocationError::NoGpsData)?;

        let coordinate = tags.to_coordinate();
        if coordinate.validate().is_err() {
            debug!(?tags, "GPS tags out of range");
            return Err(LocationError::NoGpsData);
        }
        Ok(coordinate)
    }
}
