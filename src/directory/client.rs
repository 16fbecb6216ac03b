//! Failure-absorbing directory façade
//!
//! UI controllers must stay responsive, so every directory failure is logged
//! here and turned into an empty result.

use crate::coord::Coordinate;
use crate::directory::{AddressRecord, AddressSuggestion, LocationDirectory, LocationNode, NodeId};
use tracing::{debug, warn};

/// Non-failing wrapper over a [`LocationDirectory`]
#[derive(Debug, Clone)]
pub struct LocationDirectoryClient<D> {
    directory: D,
}

impl<D: LocationDirectory> LocationDirectoryClient<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Search addresses; failures yield no suggestions
    pub async fn search(&self, query: &str, region: Option<&NodeId>) -> Vec<AddressSuggestion> {
        match self.directory.search(query, region).await {
            Ok(results) => {
                debug!(query, count = results.len(), "address search");
                results
            }
            Err(e) => {
                warn!(query, error = %e, "address search failed");
                Vec::new()
            }
        }
    }

    /// Reverse geocode; invalid coordinates and failures yield `None`
    pub async fn reverse_geocode(&self, at: Coordinate) -> Option<AddressRecord> {
        if let Err(e) = at.validate() {
            warn!(error = %e, "reverse geocode skipped");
            return None;
        }

        match self.directory.reverse_geocode(at).await {
            Ok(record) => record,
            Err(e) => {
                warn!(lat = at.latitude, lng = at.longitude, error = %e, "reverse geocode failed");
                None
            }
        }
    }

    /// Prefectures of a region; failures yield an empty list
    pub async fn list_prefectures(&self, region: &NodeId) -> Vec<LocationNode> {
        match self.directory.list_prefectures(region).await {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!(region = %region, error = %e, "loading prefectures failed");
                Vec::new()
            }
        }
    }

    /// Quartiers of a prefecture; failures yield an empty list
    pub async fn list_quartiers(&self, prefecture: &NodeId) -> Vec<LocationNode> {
        match self.directory.list_quartiers(prefecture).await {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!(prefecture = %prefecture, error = %e, "loading quartiers failed");
                Vec::new()
            }
        }
    }
}
