//! HTTP location directory (store backend)
//!
//! Speaks the store's location endpoints:
//! - `GET  /store/location/search/?q=..&region=..`
//! - `POST /store/location/api/reverse-geocode/`
//! - `GET  /store/location/api/prefectures/?region_id=..`
//! - `GET  /store/location/api/quartiers/?prefecture_id=..`

use crate::config::Config;
use crate::constants::api::{PREFECTURES_PATH, QUARTIERS_PATH, REVERSE_GEOCODE_PATH, SEARCH_PATH};
use crate::coord::Coordinate;
use crate::directory::{
    AddressRecord, AddressSuggestion, LocationDirectory, LocationNode, NodeId, NodeKind,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Directory backed by the store's HTTP API
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: reqwest::Client,
    base_url: String,
}

/// Search response body
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<AddressSuggestion>,
}

/// Prefecture list response body
#[derive(Debug, Deserialize)]
struct PrefecturesResponse {
    #[serde(default)]
    prefectures: Vec<NodeRecord>,
}

/// Quartier list response body
#[derive(Debug, Deserialize)]
struct QuartiersResponse {
    #[serde(default)]
    quartiers: Vec<NodeRecord>,
}

/// A node as sent by the backend (the level is implied by the endpoint)
#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: NodeId,
    name: String,
}

impl NodeRecord {
    fn into_node(self, kind: NodeKind) -> LocationNode {
        LocationNode {
            id: self.id,
            name: self.name,
            kind,
        }
    }
}

#[derive(Debug, Serialize)]
struct ReverseGeocodeRequest {
    latitude: f64,
    longitude: f64,
}

/// Reverse geocoding response body
#[derive(Debug, Deserialize)]
struct AddressResponse {
    description: String,
    #[serde(default)]
    landmark: Option<String>,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    region: Option<NodeRecord>,
    #[serde(default)]
    prefecture: Option<NodeRecord>,
    #[serde(default)]
    quartier: Option<NodeRecord>,
}

impl From<AddressResponse> for AddressRecord {
    fn from(raw: AddressResponse) -> Self {
        AddressRecord {
            description: raw.description,
            landmark: raw.landmark.filter(|l| !l.is_empty()),
            coordinate: Coordinate::new(raw.latitude, raw.longitude),
            region: raw.region.map(|n| n.into_node(NodeKind::Region)),
            prefecture: raw.prefecture.map(|n| n.into_node(NodeKind::Prefecture)),
            quartier: raw.quartier.map(|n| n.into_node(NodeKind::Quartier)),
        }
    }
}

impl HttpDirectory {
    /// Create a directory client for the given base URL
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Directory(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a directory client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.directory.base_url, &config.directory.user_agent)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Directory(format!("Directory request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Directory(format!(
                "Directory returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Directory(format!("Failed to parse directory response: {}", e)))
    }
}

impl LocationDirectory for HttpDirectory {
    async fn search(&self, query: &str, region: Option<&NodeId>) -> Result<Vec<AddressSuggestion>> {
        let mut url = format!("{}?q={}", self.url(SEARCH_PATH), urlencoding::encode(query));
        if let Some(region) = region {
            url.push_str(&format!("&region={}", urlencoding::encode(region.as_str())));
        }

        let body: SearchResponse = self.get_json(&url).await?;
        Ok(body.results)
    }

    async fn reverse_geocode(&self, at: Coordinate) -> Result<Option<AddressRecord>> {
        let response = self
            .client
            .post(self.url(REVERSE_GEOCODE_PATH))
            .json(&ReverseGeocodeRequest {
                latitude: at.latitude,
                longitude: at.longitude,
            })
            .send()
            .await
            .map_err(|e| Error::Directory(format!("Directory request failed: {}", e)))?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            return Err(Error::Directory(format!(
                "Directory returned status: {}",
                response.status()
            )));
        }

        let body: Option<AddressResponse> = response
            .json()
            .await
            .map_err(|e| Error::Directory(format!("Failed to parse directory response: {}", e)))?;

        Ok(body.map(AddressRecord::from))
    }

    async fn list_prefectures(&self, region: &NodeId) -> Result<Vec<LocationNode>> {
        let url = format!(
            "{}?region_id={}",
            self.url(PREFECTURES_PATH),
            urlencoding::encode(region.as_str())
        );

        let body: PrefecturesResponse = self.get_json(&url).await?;
        Ok(body
            .prefectures
            .into_iter()
            .map(|n| n.into_node(NodeKind::Prefecture))
            .collect())
    }

    async fn list_quartiers(&self, prefecture: &NodeId) -> Result<Vec<LocationNode>> {
        let url = format!(
            "{}?prefecture_id={}",
            self.url(QUARTIERS_PATH),
            urlencoding::encode(prefecture.as_str())
        );

        let body: QuartiersResponse = self.get_json(&url).await?;
        Ok(body
            .quartiers
            .into_iter()
            .map(|n| n.into_node(NodeKind::Quartier))
            .collect())
    }
}
