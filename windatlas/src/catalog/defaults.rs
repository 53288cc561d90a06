//! Region default table.
//!
//! Maps normalized `(country, offshore)` keys to catalog designations. Keys
//! are written `global`, `global.onshore`, `global.offshore`, `DE`,
//! `DE.onshore` or `DE.offshore`.

use std::collections::BTreeMap;
use std::fmt;

use super::{CatalogError, SpecCatalog, SpecCatalogEntry};

/// A region key; `None` parts are wildcards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionKey {
    pub country: Option<String>,
    pub offshore: Option<bool>,
}

impl RegionKey {
    pub fn new(country: Option<&str>, offshore: Option<bool>) -> Self {
        Self {
            country: country.map(normalize_country),
            offshore,
        }
    }

    /// The catch-all `(*, *)` key.
    pub fn global() -> Self {
        Self::new(None, None)
    }

    /// Parse a key as written in configuration.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (region, split) = match text.rsplit_once('.') {
            Some((region, split)) => (region, Some(split)),
            None => (text, None),
        };
        let offshore = match split.map(|s| s.to_ascii_lowercase()) {
            None => None,
            Some(s) if s == "offshore" => Some(true),
            Some(s) if s == "onshore" => Some(false),
            Some(_) => return None,
        };
        if region.is_empty() {
            return None;
        }
        let country = if region.eq_ignore_ascii_case("global") || region == "*" {
            None
        } else {
            Some(region)
        };
        Some(Self::new(country, offshore))
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.country.as_deref().unwrap_or("global"))?;
        match self.offshore {
            Some(true) => f.write_str(".offshore"),
            Some(false) => f.write_str(".onshore"),
            None => Ok(()),
        }
    }
}

fn normalize_country(country: &str) -> String {
    country.trim().to_uppercase()
}

/// Explicit fallback table from region to catalog entry.
#[derive(Debug, Clone, Default)]
pub struct RegionDefaults {
    table: BTreeMap<RegionKey, usize>,
}

impl RegionDefaults {
    /// A table without any defaults.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the table; every designation must exist in the catalog.
    pub fn new(
        entries: impl IntoIterator<Item = (RegionKey, String)>,
        catalog: &SpecCatalog,
    ) -> Result<Self, CatalogError> {
        let mut table = BTreeMap::new();
        for (key, designation) in entries {
            let index = catalog
                .entries()
                .iter()
                .position(|e| e.designation == designation)
                .ok_or_else(|| CatalogError::UnknownDefault {
                    region: key.to_string(),
                    designation: designation.clone(),
                })?;
            table.insert(key, index);
        }
        Ok(Self { table })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Most specific default for a region.
    ///
    /// Tried in order: `(country, offshore)`, `(country, *)`,
    /// `(*, offshore)`, `(*, *)`. Missing tags skip the keys that need them.
    pub fn lookup<'c>(
        &self,
        catalog: &'c SpecCatalog,
        country: Option<&str>,
        offshore: Option<bool>,
    ) -> Option<(RegionKey, &'c SpecCatalogEntry)> {
        let mut keys = Vec::with_capacity(4);
        if country.is_some() {
            if offshore.is_some() {
                keys.push(RegionKey::new(country, offshore));
            }
            keys.push(RegionKey::new(country, None));
        }
        if offshore.is_some() {
            keys.push(RegionKey::new(None, offshore));
        }
        keys.push(RegionKey::global());

        keys.into_iter().find_map(|key| {
            let index = *self.table.get(&key)?;
            catalog.entries().get(index).map(|entry| (key, entry))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!(RegionKey::parse("global"), Some(RegionKey::global()));
        assert_eq!(
            RegionKey::parse("global.offshore"),
            Some(RegionKey::new(None, Some(true)))
        );
        assert_eq!(RegionKey::parse("de"), Some(RegionKey::new(Some("DE"), None)));
        assert_eq!(
            RegionKey::parse("DE.Onshore"),
            Some(RegionKey::new(Some("de"), Some(false)))
        );
        assert_eq!(RegionKey::parse("DE.sideways"), None);
        assert_eq!(RegionKey::parse(""), None);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for text in ["global", "global.onshore", "NL.offshore", "FR"] {
            let key = RegionKey::parse(text).unwrap();
            assert_eq!(key.to_string(), text);
        }
    }
}
