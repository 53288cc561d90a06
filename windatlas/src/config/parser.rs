//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use crate::catalog::RegionKey;
use crate::filter::{BoundingBox, SituationDate, SpatialSubset};

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [boundaries] section
    if let Some(section) = ini.section(Some("boundaries")) {
        config.boundaries.land = path_value(section, "land");
        config.boundaries.eez = path_value(section, "eez");
        if let Some(fields) = list_value(section, "land_name_fields", &[',']) {
            config.boundaries.land_name_fields = fields;
        }
        if let Some(fields) = list_value(section, "eez_name_fields", &[',']) {
            config.boundaries.eez_name_fields = fields;
        }
    }

    // [catalog] section
    if let Some(section) = ini.section(Some("catalog")) {
        config.catalog.path = path_value(section, "path");
    }

    // [defaults] section
    if let Some(section) = ini.section(Some("defaults")) {
        for (key, value) in section.iter() {
            let designation = value.trim();
            if designation.is_empty() {
                continue;
            }
            let region = RegionKey::parse(key).ok_or_else(|| ConfigFileError::InvalidValue {
                section: "defaults".to_string(),
                key: key.to_string(),
                value: value.to_string(),
                reason: "key must be global, <COUNTRY>, optionally with .onshore or .offshore"
                    .to_string(),
            })?;
            config.defaults.push((region, designation.to_string()));
        }
    }

    // [dedupe] section
    if let Some(section) = ini.section(Some("dedupe")) {
        if let Some(v) = non_negative(section, "dedupe", "min_distance")? {
            config.dedupe.min_distance = v;
        }
        if let Some(list) = list_value(section, "source_priority", &[',']) {
            config.dedupe.source_priority = list;
        }
        if let Some(v) = parsed::<bool>(section, "dedupe", "enrich_survivor", "expected true or false")? {
            config.dedupe.enrich_survivor = v;
        }
    }

    // [merge] section
    if let Some(section) = ini.section(Some("merge")) {
        if let Some(v) = non_negative(section, "merge", "max_distance")? {
            config.merge.max_distance = v;
        }
    }

    // [subset] section
    if let Some(section) = ini.section(Some("subset")) {
        let method = section
            .get("method")
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();
        config.subset.spatial = match method.as_str() {
            "" | "all" | "true" => SpatialSubset::All,
            "bbox" => {
                let value = section.get("bbox").unwrap_or_default();
                let bbox = value
                    .parse::<BoundingBox>()
                    .map_err(|e| invalid("subset", "bbox", value, &e.to_string()))?;
                SpatialSubset::BoundingBox(bbox)
            }
            "country" => {
                SpatialSubset::Countries(list_value(section, "countries", &[',']).unwrap_or_default())
            }
            "domain" => {
                return Err(invalid(
                    "subset",
                    "method",
                    &method,
                    "projected model domains are not supported; use bbox",
                ))
            }
            other => {
                return Err(invalid(
                    "subset",
                    "method",
                    other,
                    "expected all, bbox or country",
                ))
            }
        };
        if let Some(value) = section.get("situation_date") {
            config.subset.situation_date = value
                .parse::<SituationDate>()
                .map_err(|e| invalid("subset", "situation_date", value, &e.to_string()))?;
        }
    }

    // [matcher] section
    if let Some(section) = ini.section(Some("matcher")) {
        let m = &mut config.matcher;
        for (key, slot) in [
            ("weight_rotor_diameter", &mut m.weight_rotor_diameter),
            ("weight_hub_height", &mut m.weight_hub_height),
            ("weight_rated_power", &mut m.weight_rated_power),
            ("acceptance_threshold", &mut m.acceptance_threshold),
        ] {
            if let Some(v) = non_negative(section, "matcher", key)? {
                *slot = v;
            }
        }
        if let Some(v) = non_negative(section, "matcher", "review_confidence")? {
            if v > 1.0 {
                return Err(invalid(
                    "matcher",
                    "review_confidence",
                    &v.to_string(),
                    "must be between 0 and 1",
                ));
            }
            m.review_confidence = v;
        }
        if let Some(list) = list_value(section, "forbidden_types", &[';', ',']) {
            m.forbidden_types = list;
        }
        if let Some(v) =
            parsed::<bool>(section, "matcher", "allow_extrapolation", "expected true or false")?
        {
            m.allow_extrapolation = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        config.logging.directory = path_value(section, "directory");
        config.logging.file = section
            .get("file")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parsed<T: FromStr>(
    section: &Properties,
    name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    match section.get(key).map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .to_lowercase()
            .parse()
            .map(Some)
            .map_err(|_| invalid(name, key, v, reason)),
        None => Ok(None),
    }
}

fn non_negative(section: &Properties, name: &str, key: &str) -> Result<Option<f64>, ConfigFileError> {
    let value = parsed::<f64>(section, name, key, "expected a number")?;
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(invalid(
            name,
            key,
            &v.to_string(),
            "must be a finite, non-negative number",
        )),
        other => Ok(other),
    }
}

fn path_value(section: &Properties, key: &str) -> Option<PathBuf> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(expand_tilde)
}

fn list_value(section: &Properties, key: &str, separators: &[char]) -> Option<Vec<String>> {
    section.get(key).map(|v| {
        v.split(separators)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
