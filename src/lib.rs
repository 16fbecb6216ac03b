//! guinea-geo: delivery location toolkit for Guinea
//!
//! A library and CLI tool for capturing delivery positions in an e-commerce
//! checkout, where street addresses are rare and customers describe places
//! by landmark.
//!
//! ## Features
//!
//! - Debounced, race-safe address autocomplete ([`autocomplete`])
//! - Region → prefecture → quartier cascading selector ([`selector`])
//! - Current position with timeout and fix cache ([`position`])
//! - GPS position from photo EXIF metadata ([`photo`])
//! - Delivery map with a single draggable marker ([`map`])
//! - Haversine distance, DMS conversion and country bounds ([`coord::math`])
//!
//! ## Quick Start
//!
//! ```rust
//! use guinea_geo::coord::math::distance_km;
//! use guinea_geo::Coordinate;
//!
//! let kaloum = Coordinate::new(9.5092, -13.7122);
//! let matoto = Coordinate::new(9.5850, -13.6170);
//!
//! assert!(kaloum.is_within_country());
//! println!("{:.1} km", distance_km(kaloum, matoto));
//! ```

pub mod autocomplete;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod directory;
pub mod error;
pub mod format;
pub mod map;
pub mod photo;
pub mod position;
pub mod selector;

// Re-export commonly used types
pub use config::Config;
pub use coord::{Coordinate, Hemisphere};
pub use directory::{AddressRecord, AddressSuggestion, LocationDirectory, LocationNode, NodeId};
pub use error::{Error, LocationError, Result};
