//! Location directory
//!
//! The store backend knows every region, prefecture, quartier and the
//! collaboratively maintained address list. This module defines its data
//! model and the `LocationDirectory` trait; [`http`] speaks to the real
//! backend and [`client`] wraps any implementation so that failures never
//! reach the UI controllers.

pub mod client;
pub mod http;

use crate::coord::Coordinate;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub use client::LocationDirectoryClient;
pub use http::HttpDirectory;

/// Opaque identifier of a region, prefecture or quartier
///
/// The backend sends database keys as JSON numbers; string ids are accepted
/// too. Either way the id is carried as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawNodeId")]
pub struct NodeId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNodeId {
    Number(u64),
    Text(String),
}

impl From<RawNodeId> for NodeId {
    fn from(raw: RawNodeId) -> Self {
        match raw {
            RawNodeId::Number(n) => Self(n.to_string()),
            RawNodeId::Text(s) => Self(s),
        }
    }
}

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Level of a node in the administrative tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Region,
    Prefecture,
    Quartier,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Region => write!(f, "region"),
            Self::Prefecture => write!(f, "prefecture"),
            Self::Quartier => write!(f, "quartier"),
        }
    }
}

/// A region, prefecture or quartier
///
/// Every prefecture has one parent region and every quartier one parent
/// prefecture. Only one level of children is ever held at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
}

impl LocationNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// One entry of an autocomplete result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSuggestion {
    /// Local description, e.g. "près de la mosquée, en face du marché"
    pub description: String,
    /// Secondary line (quartier, prefecture)
    pub text: String,
    /// How many orders already used this address
    #[serde(default)]
    pub usage_count: u32,
}

/// An address annotated with its place in the administrative tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    pub coordinate: Coordinate,
    pub region: Option<LocationNode>,
    pub prefecture: Option<LocationNode>,
    pub quartier: Option<LocationNode>,
}

/// Trait for location directory backends
///
/// Implementations report transport and protocol failures as errors;
/// [`LocationDirectoryClient`] decides what the UI sees.
pub trait LocationDirectory: Send + Sync {
    /// Search known addresses, optionally within one region
    fn search(
        &self,
        query: &str,
        region: Option<&NodeId>,
    ) -> impl Future<Output = Result<Vec<AddressSuggestion>>> + Send;

    /// Find the address at a coordinate
    fn reverse_geocode(
        &self,
        at: Coordinate,
    ) -> impl Future<Output = Result<Option<AddressRecord>>> + Send;

    /// Prefectures of a region, in backend order
    fn list_prefectures(
        &self,
        region: &NodeId,
    ) -> impl Future<Output = Result<Vec<LocationNode>>> + Send;

    /// Quartiers of a prefecture, in backend order
    fn list_quartiers(
        &self,
        prefecture: &NodeId,
    ) -> impl Future<Output = Result<Vec<LocationNode>>> + Send;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory directory with scripted latency for controller tests

    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// A recorded call, for asserting what reached the backend
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Search(String, Option<NodeId>),
        ReverseGeocode,
        Prefectures(NodeId),
        Quartiers(NodeId),
    }

    #[derive(Default)]
    pub struct StubDirectory {
        pub suggestions: HashMap<String, Vec<AddressSuggestion>>,
        pub prefectures: HashMap<NodeId, Vec<LocationNode>>,
        pub quartiers: HashMap<NodeId, Vec<LocationNode>>,
        pub address: Option<AddressRecord>,
        /// Latency per query or parent id; missing keys answer immediately
        pub delays: HashMap<String, Duration>,
        pub fail: bool,
        pub calls: Arc<Mutex<Vec<Call>>>,
    }

    impl StubDirectory {
        pub fn calls(&self) -> Arc<Mutex<Vec<Call>>> {
            Arc::clone(&self.calls)
        }

        pub fn with_suggestions(mut self, query: &str, descriptions: &[&str]) -> Self {
            let results = descriptions
                .iter()
                .map(|d| AddressSuggestion {
                    description: d.to_string(),
                    text: format!("{} (Conakry)", d),
                    usage_count: 1,
                })
                .collect();
            self.suggestions.insert(query.to_string(), results);
            self
        }

        pub fn with_prefectures(mut self, region: &str, names: &[(&str, &str)]) -> Self {
            let nodes = names
                .iter()
                .map(|(id, name)| LocationNode::new(*id, *name, NodeKind::Prefecture))
                .collect();
            self.prefectures.insert(NodeId::from(region), nodes);
            self
        }

        pub fn with_quartiers(mut self, prefecture: &str, names: &[(&str, &str)]) -> Self {
            let nodes = names
                .iter()
                .map(|(id, name)| LocationNode::new(*id, *name, NodeKind::Quartier))
                .collect();
            self.quartiers.insert(NodeId::from(prefecture), nodes);
            self
        }

        pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
            self.delays.insert(key.to_string(), delay);
            self
        }

        pub fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        async fn respond(&self, key: &str, call: Call) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if let Some(delay) = self.delays.get(key) {
                tokio::time::sleep(*delay).await;
            }
            if self.fail {
                return Err(Error::Directory("stub failure".to_string()));
            }
            Ok(())
        }
    }

    impl LocationDirectory for StubDirectory {
        async fn search(
            &self,
            query: &str,
            region: Option<&NodeId>,
        ) -> Result<Vec<AddressSuggestion>> {
            self.respond(query, Call::Search(query.to_string(), region.cloned()))
                .await?;
            Ok(self.suggestions.get(query).cloned().unwrap_or_default())
        }

        async fn reverse_geocode(&self, _at: Coordinate) -> Result<Option<AddressRecord>> {
            self.respond("", Call::ReverseGeocode).await?;
            Ok(self.address.clone())
        }

        async fn list_prefectures(&self, region: &NodeId) -> Result<Vec<LocationNode>> {
            self.respond(region.as_str(), Call::Prefectures(region.clone()))
                .await?;
            Ok(self.prefectures.get(region).cloned().unwrap_or_default())
        }

        async fn list_quartiers(&self, prefecture: &NodeId) -> Result<Vec<LocationNode>> {
            self.respond(prefecture.as_str(), Call::Quartiers(prefecture.clone()))
                .await?;
            Ok(self.quartiers.get(prefecture).cloned().unwrap_or_default())
        }
    }
}
