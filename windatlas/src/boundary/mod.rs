//! Boundary datasets and the country / offshore resolver.
//!
//! Two layers are used: land (country borders) and EEZ (maritime zones).
//! Both are loaded once per run and shared read-only between workers.

mod layer;
mod loader;
mod polygon;
mod resolver;

use std::path::PathBuf;

use thiserror::Error;

pub use layer::{BoundaryFeature, BoundaryLayer};
pub use loader::load_layer;
pub use polygon::{Polygon, Ring};
pub use resolver::{CountryOffshoreResolver, Resolution};

/// Fatal problems with a boundary dataset.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("Boundary file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read boundary file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in boundary file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Boundary file {0} is not a GeoJSON FeatureCollection")]
    NotFeatureCollection(PathBuf),

    #[error("Invalid geometry in {path}, feature {feature}: {reason}")]
    InvalidGeometry {
        path: PathBuf,
        feature: usize,
        reason: String,
    },

    #[error("Boundary file {0} has no named polygon features")]
    NoFeatures(PathBuf),
}
