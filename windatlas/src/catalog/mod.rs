//! Turbine specification catalog.
//!
//! Reference data loaded once per run: named turbine models with their
//! dimensions and power curves, plus the region default table used when no
//! catalog entry matches a record confidently.

mod curve;
mod defaults;
mod entry;
mod index;
mod loader;

use std::path::PathBuf;

use thiserror::Error;

pub use curve::{
    default_wind_speeds, linear_ramp, power_from_cp, CurveData, PowerCurve, AIR_DENSITY,
    RAMP_CUT_IN, RAMP_RATED_SPEED,
};
pub use defaults::{RegionDefaults, RegionKey};
pub use entry::{is_plausible, EntryData, SpecCatalogEntry};
pub use index::{DimensionRanges, Range, SpecCatalog};

/// Fatal catalog problems. Matching never starts without a valid catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog has no entries")]
    Empty,

    #[error("Duplicate catalog designation: {0}")]
    DuplicateDesignation(String),

    #[error("Invalid catalog entry '{designation}': {reason}")]
    InvalidEntry { designation: String, reason: String },

    #[error("Default for region {region} names unknown designation '{designation}'")]
    UnknownDefault { region: String, designation: String },

    #[error("Invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(designation: &str, d: f64, h: f64, p: f64) -> SpecCatalogEntry {
        SpecCatalogEntry::simple(designation, d, h, p).unwrap()
    }

    fn catalog() -> SpecCatalog {
        let mut v112 = entry("V112-3.0", 112.0, 94.0, 3_000.0);
        v112.aliases = vec!["V112".into()];
        v112.manufacturer = Some("Vestas".into());
        SpecCatalog::new(vec![
            v112,
            entry("E-82", 82.0, 98.0, 2_300.0),
            entry("SWT-6.0-154", 154.0, 120.0, 6_000.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_catalog_is_fatal() {
        assert!(matches!(SpecCatalog::new(vec![]), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_duplicate_designation_is_fatal() {
        let result = SpecCatalog::new(vec![
            entry("E-82", 82.0, 98.0, 2_300.0),
            entry("e82", 82.0, 108.0, 2_300.0),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateDesignation(_))));
    }

    #[test]
    fn test_lookup_by_designation_alias_and_manufacturer() {
        let c = catalog();
        assert_eq!(c.lookup("e 82").unwrap().designation, "E-82");
        assert_eq!(c.lookup("v112").unwrap().designation, "V112-3.0");
        assert_eq!(c.lookup("Vestas V112").unwrap().designation, "V112-3.0");
        assert!(c.lookup("N117").is_none());
        assert!(c.lookup("  ").is_none());
    }

    #[test]
    fn test_ranges() {
        let r = *catalog().ranges();
        assert_eq!(r.rotor_diameter.min, 82.0);
        assert_eq!(r.rotor_diameter.max, 154.0);
        assert_eq!(r.rotor_diameter.scale(), 72.0);
        assert!(r.hub_height.contains(100.0));
        assert!(!r.hub_height.contains(130.0));
    }

    #[test]
    fn test_single_entry_scale_uses_max() {
        let c = SpecCatalog::new(vec![entry("E-82", 82.0, 98.0, 2_300.0)]).unwrap();
        assert_eq!(c.ranges().rotor_diameter.scale(), 82.0);
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(SpecCatalogEntry::simple("X", -1.0, 90.0, 1_000.0).is_err());
        assert!(SpecCatalogEntry::simple("X", 80.0, f64::NAN, 1_000.0).is_err());
    }

    #[test]
    fn test_plausibility() {
        let e = entry("E-82", 82.0, 98.0, 2_300.0);
        assert!(is_plausible(None, None, &e));
        assert!(!is_plausible(None, Some(40.0), &e));
        assert!(is_plausible(Some(60.0), Some(40.0), &e));
    }

    #[test]
    fn test_region_defaults_lookup_order() {
        let c = catalog();
        let defaults = RegionDefaults::new(
            [
                (RegionKey::parse("global").unwrap(), "E-82".to_string()),
                (RegionKey::parse("global.offshore").unwrap(), "SWT-6.0-154".to_string()),
                (RegionKey::parse("DE").unwrap(), "V112-3.0".to_string()),
            ],
            &c,
        )
        .unwrap();

        let pick = |country, offshore| {
            defaults
                .lookup(&c, country, offshore)
                .map(|(_, e)| e.designation.clone())
        };
        assert_eq!(pick(Some("de"), Some(false)).as_deref(), Some("V112-3.0"));
        assert_eq!(pick(Some("DE"), Some(true)).as_deref(), Some("V112-3.0"));
        assert_eq!(pick(Some("NL"), Some(true)).as_deref(), Some("SWT-6.0-154"));
        assert_eq!(pick(Some("NL"), Some(false)).as_deref(), Some("E-82"));
        assert_eq!(pick(None, None).as_deref(), Some("E-82"));
        assert!(RegionDefaults::empty().lookup(&c, Some("DE"), None).is_none());
    }

    #[test]
    fn test_region_default_must_exist() {
        let result = RegionDefaults::new(
            [(RegionKey::global(), "N149".to_string())],
            &catalog(),
        );
        assert!(matches!(result, Err(CatalogError::UnknownDefault { .. })));
    }

    #[test]
    fn test_load_catalog_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[
                {"designation": "E-82", "rotor_diameter_m": 82, "hub_height_m": 98, "rated_power_kw": 2300,
                 "curve": {"wind_speed": [4, 8, 14], "cp": [0.4, 0.45, 0.45]}},
                {"designation": "V90", "aliases": ["V90-2.0"], "manufacturer": "Vestas",
                 "rotor_diameter_m": 90, "hub_height_m": 80, "rated_power_kw": 2000}
            ]"#,
        )
        .unwrap();
        let catalog = SpecCatalog::from_path(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        let e82 = catalog.get("E-82").unwrap();
        assert!(e82.curve.synthesized);
        assert_eq!(e82.curve.power_kw[2], 2300.0);
        assert!(catalog.lookup("Vestas V90-2.0").is_some());
    }

    #[test]
    fn test_load_catalog_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            SpecCatalog::from_path(&dir.path().join("none.json")),
            Err(CatalogError::NotFound(_))
        ));
        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, "[]").unwrap();
        assert!(matches!(SpecCatalog::from_path(&empty), Err(CatalogError::Empty)));
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"[{"designation": "X", "rotor_diameter_m": 0, "hub_height_m": 1, "rated_power_kw": 1}]"#).unwrap();
        assert!(matches!(
            SpecCatalog::from_path(&bad),
            Err(CatalogError::InvalidEntry { .. })
        ));
    }
}
