//! EXIF GPS reader backed by `kamadak-exif`

use super::{GpsTags, MetadataExtractor};
use crate::coord::Hemisphere;
use exif::{Exif, In, Tag, Value};
use std::io::Cursor;
use tracing::debug;

/// Reads GPS tags from JPEG, TIFF, HEIF, PNG and WebP containers
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifExtractor;

impl ExifExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataExtractor for ExifExtractor {
    fn gps_tags(&self, image: &[u8]) -> Option<GpsTags> {
        let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(image)) {
            Ok(exif) => exif,
            Err(e) => {
                debug!(error = %e, "no readable EXIF block");
                return None;
            }
        };

        Some(GpsTags {
            latitude: dms(&exif, Tag::GPSLatitude)?,
            latitude_ref: hemisphere(&exif, Tag::GPSLatitudeRef),
            longitude: dms(&exif, Tag::GPSLongitude)?,
            longitude_ref: hemisphere(&exif, Tag::GPSLongitudeRef),
        })
    }
}

fn dms(exif: &Exif, tag: Tag) -> Option<[f64; 3]> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Rational(parts) if parts.len() >= 3 => {
            Some([parts[0].to_f64(), parts[1].to_f64(), parts[2].to_f64()])
        }
        other => {
            debug!(%tag, value = ?other, "unexpected GPS value type");
            None
        }
    }
}

fn hemisphere(exif: &Exif, tag: Tag) -> Option<Hemisphere> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(strings) => strings
            .first()
            .and_then(|s| s.first())
            .and_then(|b| Hemisphere::from_ref(*b as char)),
        _ => None,
    }
}
