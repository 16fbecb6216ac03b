//! Position commands

use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::photo::{ExifExtractor, PhotoGeoExtractor};
use crate::position::{IpSensor, PositionOptions, PositionSource};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Also look up the address at the position
    #[arg(long, short = 'a')]
    pub address: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

/// Photo command arguments
#[derive(Args)]
pub struct PhotoArgs {
    /// Image file (JPEG, TIFF, HEIF, PNG, WebP)
    pub path: PathBuf,

    /// Also look up the address at the position
    #[arg(long, short = 'a')]
    pub address: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

pub async fn locate(args: LocateArgs) -> Result<()> {
    let formatter = super::formatter(&args.format)?;
    let config = Config::load()?;

    let sensor = IpSensor::new(&config.directory.user_agent)?;
    let source = PositionSource::new(sensor, PositionOptions::from(&config.position));

    let position = source.current_position().await?;
    report(position, args.address, &config, formatter.as_ref()).await
}

pub async fn photo(args: PhotoArgs) -> Result<()> {
    let formatter = super::formatter(&args.format)?;
    let config = Config::load()?;

    let position = photo_position(&args.path).await?;
    report(position, args.address, &config, formatter.as_ref()).await
}

/// GPS position stored in an image file
async fn photo_position(path: &Path) -> Result<Coordinate> {
    let image = tokio::fs::read(path).await?;
    info!(path = %path.display(), bytes = image.len(), "reading photo metadata");

    let extractor = PhotoGeoExtractor::new(ExifExtractor::new());
    Ok(extractor.extract(image).await?)
}

async fn report(
    position: Coordinate,
    with_address: bool,
    config: &Config,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    print!("{}", formatter.format_position(&position, config)?);

    if with_address {
        let client = super::directory_client(config)?;
        let address = client.reverse_geocode(position).await;
        print!("{}", formatter.format_address(address.as_ref())?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, LocationError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_photo_without_gps_is_location_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a JPEG").unwrap();

        let result = photo_position(file.path()).await;
        assert!(
            matches!(result, Err(Error::Location(LocationError::NoGpsData))),
            "expected NoGpsData, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn test_missing_photo_is_io_error() {
        let result = photo_position(Path::new("/nonexistent/photo.jpg")).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
