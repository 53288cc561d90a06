//! Catalog file loading.

use std::path::Path;

use tracing::{debug, info};

use crate::io::read_input;

use super::entry::{EntryData, SpecCatalogEntry};
use super::{CatalogError, SpecCatalog};

impl SpecCatalog {
    /// Load a catalog from a JSON array of entries (optionally `.gz`).
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }
        let bytes = read_input(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: Vec<EntryData> =
            serde_json::from_slice(&bytes).map_err(|source| CatalogError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let catalog = Self::from_data(raw)?;
        let synthesized = catalog
            .entries()
            .iter()
            .filter(|e| e.curve.synthesized)
            .count();
        debug!(synthesized, "Completed missing power curves");
        info!(path = %path.display(), entries = catalog.len(), "Loaded turbine catalog");
        Ok(catalog)
    }

    /// Validate raw entries and build the catalog.
    pub fn from_data(raw: Vec<EntryData>) -> Result<Self, CatalogError> {
        let entries = raw
            .into_iter()
            .map(|data| {
                let designation = data.designation.clone();
                SpecCatalogEntry::from_data(data)
                    .map_err(|reason| CatalogError::InvalidEntry { designation, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }
}
