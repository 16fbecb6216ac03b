//! Region / prefecture / quartier selection state
//!
//! Changing a level clears everything below it before any request goes out.
//! Each dependent level carries a generation number that moves on every
//! change of its parent; a list response is applied only if it was issued
//! for the current generation, so rapid changes never leave children of a
//! superseded parent on screen.

use crate::directory::{LocationNode, NodeId};
use serde::Serialize;
use tracing::{debug, warn};

/// A dependent level of the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Prefecture,
    Quartier,
}

/// A list request to issue for a newly selected parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub level: Level,
    pub parent: NodeId,
    pub generation: u64,
}

/// State of one cascading selector
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectorState {
    pub selected_region: Option<NodeId>,
    pub selected_prefecture: Option<NodeId>,
    pub selected_quartier: Option<NodeId>,
    pub prefecture_options: Vec<LocationNode>,
    pub quartier_options: Vec<LocationNode>,
    #[serde(skip)]
    prefecture_generation: u64,
    #[serde(skip)]
    quartier_generation: u64,
}

impl SelectorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the region; returns the prefecture load to issue, if any
    pub fn select_region(&mut self, region: Option<NodeId>) -> Option<LoadRequest> {
        self.selected_region = region.clone();
        self.clear_prefectures();
        self.clear_quartiers();

        let parent = region?;
        Some(LoadRequest {
            level: Level::Prefecture,
            parent,
            generation: self.prefecture_generation,
        })
    }

    /// Change the prefecture; returns the quartier load to issue, if any
    ///
    /// A prefecture that is not among the current options is rejected and
    /// leaves the state untouched.
    pub fn select_prefecture(&mut self, prefecture: Option<NodeId>) -> Option<LoadRequest> {
        if let Some(id) = &prefecture {
            if !self.prefecture_options.iter().any(|p| &p.id == id) {
                warn!(prefecture = %id, "ignoring prefecture outside current options");
                return None;
            }
        }

        self.selected_prefecture = prefecture.clone();
        self.clear_quartiers();

        let parent = prefecture?;
        Some(LoadRequest {
            level: Level::Quartier,
            parent,
            generation: self.quartier_generation,
        })
    }

    /// Change the quartier; returns whether the selection was accepted
    pub fn select_quartier(&mut self, quartier: Option<NodeId>) -> bool {
        if let Some(id) = &quartier {
            if !self.quartier_options.iter().any(|q| &q.id == id) {
                warn!(quartier = %id, "ignoring quartier outside current options");
                return false;
            }
        }

        self.selected_quartier = quartier;
        true
    }

    /// Apply a list response; returns whether it was still current
    pub fn apply(&mut self, request: &LoadRequest, options: Vec<LocationNode>) -> bool {
        let (generation, selected) = match request.level {
            Level::Prefecture => (self.prefecture_generation, &self.selected_region),
            Level::Quartier => (self.quartier_generation, &self.selected_prefecture),
        };

        if request.generation != generation || selected.as_ref() != Some(&request.parent) {
            debug!(
                level = ?request.level,
                parent = %request.parent,
                "discarding stale option list"
            );
            return false;
        }

        match request.level {
            Level::Prefecture => self.prefecture_options = options,
            Level::Quartier => self.quartier_options = options,
        }
        true
    }

    fn clear_prefectures(&mut self) {
        self.selected_prefecture = None;
        self.prefecture_options.clear();
        self.prefecture_generation += 1;
    }

    fn clear_quartiers(&mut self) {
        self.selected_quartier = None;
        self.quartier_options.clear();
        self.quartier_generation += 1;
    }
}
