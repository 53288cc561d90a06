//! The loaded catalog with designation lookup and dimension ranges.

use std::collections::HashMap;

use regex::Regex;
use tracing::debug;

use super::entry::SpecCatalogEntry;
use super::CatalogError;

/// Observed `[min, max]` of one dimension across the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        values.fold(
            Range {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |r, v| Range {
                min: r.min.min(v),
                max: r.max.max(v),
            },
        )
    }

    /// Normalization scale: the span, or the maximum for a single-valued
    /// catalog, or 1.
    pub fn scale(&self) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            span
        } else if self.max > 0.0 {
            self.max
        } else {
            1.0
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Dimension ranges used to normalize matching distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionRanges {
    pub rotor_diameter: Range,
    pub hub_height: Range,
    pub rated_power: Range,
}

/// An immutable, validated set of turbine models.
#[derive(Debug)]
pub struct SpecCatalog {
    entries: Vec<SpecCatalogEntry>,
    lookup: HashMap<String, usize>,
    ranges: DimensionRanges,
    separators: Regex,
}

impl SpecCatalog {
    /// Build a catalog. Empty catalogs and repeated designations are errors.
    pub fn new(entries: Vec<SpecCatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let separators = Regex::new(r"[^0-9a-z]+")?;

        let mut lookup = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            let key = normalize_with(&separators, &entry.designation);
            if lookup.insert(key, i).is_some() {
                return Err(CatalogError::DuplicateDesignation(entry.designation.clone()));
            }
        }

        // Aliases and manufacturer-prefixed names never shadow designations;
        // among themselves the first entry wins.
        for (i, entry) in entries.iter().enumerate() {
            let mut names: Vec<String> = entry.aliases.clone();
            if let Some(manufacturer) = &entry.manufacturer {
                names.push(format!("{} {}", manufacturer, entry.designation));
                names.extend(
                    entry
                        .aliases
                        .iter()
                        .map(|alias| format!("{} {}", manufacturer, alias)),
                );
            }
            for name in names {
                let key = normalize_with(&separators, &name);
                if key.is_empty() {
                    continue;
                }
                if let Some(&other) = lookup.get(&key) {
                    if other != i {
                        debug!(alias = %name, kept = %entries[other].designation, "Ignoring ambiguous alias");
                    }
                    continue;
                }
                lookup.insert(key, i);
            }
        }

        let ranges = DimensionRanges {
            rotor_diameter: Range::of(entries.iter().map(|e| e.rotor_diameter_m)),
            hub_height: Range::of(entries.iter().map(|e| e.hub_height_m)),
            rated_power: Range::of(entries.iter().map(|e| e.rated_power_kw)),
        };

        Ok(Self {
            entries,
            lookup,
            ranges,
            separators,
        })
    }

    pub fn entries(&self) -> &[SpecCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ranges(&self) -> &DimensionRanges {
        &self.ranges
    }

    /// Lowercase and strip everything but letters and digits.
    pub fn normalize(&self, text: &str) -> String {
        normalize_with(&self.separators, text)
    }

    /// Find an entry by designation, alias or manufacturer-prefixed name.
    pub fn lookup(&self, name: &str) -> Option<&SpecCatalogEntry> {
        let key = self.normalize(name);
        if key.is_empty() {
            return None;
        }
        self.lookup.get(&key).map(|&i| &self.entries[i])
    }

    /// Exact designation lookup.
    pub fn get(&self, designation: &str) -> Option<&SpecCatalogEntry> {
        self.entries.iter().find(|e| e.designation == designation)
    }
}

fn normalize_with(separators: &Regex, text: &str) -> String {
    separators.replace_all(&text.to_lowercase(), "").into_owned()
}
