//! Delivery map
//!
//! [`MapController`] drives an opaque [`MapSurface`]: it sets the initial
//! view and tile layer, keeps at most one delivery marker on the map, and
//! turns marker drags into reverse-geocoded addresses.

use crate::config::MapConfig;
use crate::constants::map::{LOCATE_ZOOM, OSM_ATTRIBUTION};
use crate::coord::Coordinate;
use crate::directory::{AddressRecord, LocationDirectory, LocationDirectoryClient};
use crate::error::{LocationError, Result};
use crate::position::{PositionSensor, PositionSource};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// A raster tile source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

/// Something that can display a map
pub trait MapSurface {
    /// Handle to a marker placed on the surface
    type Marker;

    fn set_view(&mut self, center: Coordinate, zoom: u8);

    fn add_tile_layer(&mut self, layer: &TileLayer);

    fn add_marker(&mut self, at: Coordinate, draggable: bool) -> Self::Marker;

    fn remove_marker(&mut self, marker: Self::Marker);
}

/// Initial view and tiles
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub center: Coordinate,
    pub zoom: u8,
    pub tiles: TileLayer,
}

impl From<&MapConfig> for MapSettings {
    fn from(config: &MapConfig) -> Self {
        Self {
            center: Coordinate::new(config.center_lat, config.center_lng),
            zoom: config.zoom,
            tiles: TileLayer {
                url_template: config.tile_url.clone(),
                attribution: OSM_ATTRIBUTION.to_string(),
                max_zoom: config.max_zoom,
            },
        }
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self::from(&MapConfig::default())
    }
}

/// Outcome of dragging the delivery marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerMove {
    pub coordinate: Coordinate,
    pub in_country: bool,
    pub address: Option<AddressRecord>,
}

/// Owns the map surface and its single delivery marker
pub struct MapController<M: MapSurface, D> {
    surface: M,
    marker: Option<M::Marker>,
    position: Option<Coordinate>,
    client: Arc<LocationDirectoryClient<D>>,
    settings: MapSettings,
}

impl<M: MapSurface, D: LocationDirectory> MapController<M, D> {
    pub fn new(surface: M, client: Arc<LocationDirectoryClient<D>>, settings: MapSettings) -> Self {
        Self {
            surface,
            marker: None,
            position: None,
            client,
            settings,
        }
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    /// Where the marker currently is
    pub fn marker_position(&self) -> Option<Coordinate> {
        self.position
    }

    /// Centre on the default view and add the tile layer
    pub fn init(&mut self) {
        self.surface.set_view(self.settings.center, self.settings.zoom);
        self.surface.add_tile_layer(&self.settings.tiles);
    }

    /// Put the delivery marker at `at`, removing the previous one
    pub fn place_marker(&mut self, at: Coordinate, draggable: bool) {
        if let Some(previous) = self.marker.take() {
            self.surface.remove_marker(previous);
        }
        self.marker = Some(self.surface.add_marker(at, draggable));
        self.position = Some(at);
    }

    /// The user dropped the marker at `at`
    pub async fn marker_moved(&mut self, at: Coordinate) -> Result<MarkerMove> {
        at.validate()?;
        self.position = Some(at);

        let in_country = at.is_within_country();
        if !in_country {
            debug!(lat = at.latitude, lng = at.longitude, "marker dropped outside the country");
        }

        let address = self.client.reverse_geocode(at).await;
        Ok(MarkerMove {
            coordinate: at,
            in_country,
            address,
        })
    }

    /// Move the marker and the view to the user's current position
    pub async fn locate<S: PositionSensor>(
        &mut self,
        source: &PositionSource<S>,
    ) -> std::result::Result<Coordinate, LocationError> {
        let fix = source.current_position().await?;
        info!(lat = fix.latitude, lng = fix.longitude, "centring on current position");

        self.place_marker(fix, true);
        self.surface
            .set_view(fix, LOCATE_ZOOM.min(self.settings.tiles.max_zoom));
        Ok(fix)
    }
}
